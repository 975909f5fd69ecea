pub mod metrics;
pub mod query;
pub mod record;
pub mod resource;
