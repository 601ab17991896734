//! Infrastructure layer: configuration and storage backends.

pub mod config;
pub mod credential_store;
pub mod employee_store;
pub mod stores;

pub use config::{AppConfig, BootstrapAdmin, ConfigError};
pub use stores::Stores;
