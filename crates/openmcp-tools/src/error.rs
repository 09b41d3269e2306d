//! Error types for capability registration and invocation

use serde_json::{json, Value};
use thiserror::Error;

/// Failure of a single capability invocation.
///
/// Each variant maps to one HTTP status so both transports report the same
/// class of failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CallError {
    /// Missing or mistyped parameters
    #[error("{0}")]
    InvalidArgument(String),

    /// Well-formed but unacceptable input (e.g. an unsupported login type)
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// A provider call failed in a way the handler could not turn into data
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl CallError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        CallError::InvalidArgument(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        CallError::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        CallError::NotFound(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        CallError::Upstream(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        CallError::Internal(msg.into())
    }

    /// HTTP status code for this failure
    pub fn status_code(&self) -> u16 {
        match self {
            CallError::InvalidArgument(_) => 422,
            CallError::BadRequest(_) => 400,
            CallError::NotFound(_) => 404,
            CallError::Upstream(_) | CallError::Internal(_) => 500,
        }
    }

    /// `{code, message}` body shared by HTTP error responses and MCP error results
    pub fn body(&self) -> Value {
        json!({
            "code": self.status_code(),
            "message": self.to_string(),
        })
    }
}

/// Invalid capability definitions, detected when building the registry
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("capability at '{0}' has no name")]
    MissingName(String),

    #[error("capability '{0}' has no handler")]
    MissingHandler(String),

    #[error("capability '{name}' has invalid path '{path}'")]
    InvalidPath { name: String, path: String },

    #[error("capability '{name}': path parameter '{param}' is not declared")]
    UndeclaredPathParam { name: String, param: String },

    #[error("capability '{name}': declared path parameter '{param}' is not in the path")]
    UnusedPathParam { name: String, param: String },

    #[error("duplicate capability name '{0}'")]
    DuplicateName(String),

    #[error("duplicate route {method} {path}")]
    DuplicateRoute { method: String, path: String },
}
