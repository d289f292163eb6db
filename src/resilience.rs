pub mod backoff;
pub mod freshness;
