//! Port traits implemented by adapters.

pub mod config_port;
pub mod record_source;
