//! Error types for the cluster host.
//!
//! The simulator itself cannot fail; only configuration and snapshot
//! publication have error paths.

use thiserror::Error;

/// Invalid host configuration read from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be an unsigned integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to serialize snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
