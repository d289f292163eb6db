pub mod activities;
pub mod forecast;
pub mod weather;
