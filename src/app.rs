pub mod events;
pub mod input;
pub mod report;
pub mod settings;
pub mod state;
