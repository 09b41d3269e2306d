//! Capability handlers
//!
//! A handler receives the bound arguments of one invocation as a JSON object
//! and answers with a JSON value. Both transports feed it the same shape:
//! path, query and body fields merged for HTTP, `arguments` for MCP.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;

use crate::error::CallError;

/// Named arguments of one invocation
pub type Arguments = Map<String, Value>;

#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, args: Arguments) -> Result<Value, CallError>;
}

pub type BoxedHandler = Arc<dyn Handler>;

struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, CallError>> + Send + 'static,
{
    async fn call(&self, args: Arguments) -> Result<Value, CallError> {
        (self.f)(args).await
    }
}

/// Wrap an async closure as a handler
pub fn handler_fn<F, Fut>(f: F) -> BoxedHandler
where
    F: Fn(Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, CallError>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}

/// Serialize a handler's typed response
pub fn reply<T: Serialize>(value: &T) -> Result<Value, CallError> {
    serde_json::to_value(value)
        .map_err(|e| CallError::internal(format!("failed to serialize response: {}", e)))
}
