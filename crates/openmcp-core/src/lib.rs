//! Core types and utilities for openmcp
//!
//! # Modules
//!
//! - `envelope`: the normalized response envelope and its items
//! - `normalize`: best-effort mapping from upstream JSON to an envelope
//! - `config`: settings loading (defaults, optional TOML file, environment)
//! - `error`: error types and Result alias

pub mod config;
pub mod envelope;
pub mod error;
pub mod normalize;

// Re-exports
pub use config::Settings;
pub use envelope::{Envelope, HotValue, Item, FAILURE_CODE, SUCCESS_CODE};
pub use error::{Error, Result};
pub use normalize::{normalize, normalize_item};
