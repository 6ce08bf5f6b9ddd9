mod behavior;
mod config;
mod connection;

pub use behavior::{BehaviorConfig, CreateVerb};
pub use config::Config;
pub use connection::ConnectionConfig;
