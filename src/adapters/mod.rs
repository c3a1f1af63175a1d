// Adapters layer: concrete implementations of the domain ports (http, error log).

pub mod error_log;
pub mod http;
