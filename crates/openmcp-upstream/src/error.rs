//! Error types for provider access

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered, but reported a failure
    #[error("{0}")]
    Provider(String),

    /// The provider's answer could not be understood
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Caller input the provider cannot serve
    #[error("{0}")]
    InvalidInput(String),

    /// A local session or record does not exist (or has expired)
    #[error("{0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, UpstreamError>;

impl UpstreamError {
    pub fn provider(msg: impl Into<String>) -> Self {
        UpstreamError::Provider(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        UpstreamError::InvalidResponse(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        UpstreamError::InvalidInput(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        UpstreamError::NotFound(msg.into())
    }
}
