pub mod debounce;
pub mod export_service;
pub mod query_service;
pub mod request_tracker;
