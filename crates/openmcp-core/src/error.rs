//! Error types for openmcp

use thiserror::Error;

/// Main error type for core operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
