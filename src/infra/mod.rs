pub mod export;
pub mod http;
pub mod proxy;
