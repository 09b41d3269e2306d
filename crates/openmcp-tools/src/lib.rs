//! openmcp-tools: Capability Model
//!
//! A capability is one invokable operation of the facade: an HTTP path and
//! method, a name, descriptive text, tags, declared parameters and a handler.
//! Capabilities are built explicitly at startup and handed to a
//! [`CapabilityRegistry`], which is immutable afterwards.
//!
//! The registry serves both transports:
//! - the HTTP dispatcher routes `(method, path)` to [`CapabilityRegistry::invoke`]
//! - the MCP server lists the [`Catalog`] and invokes by name
//!
//! Only tagged capabilities appear in the catalog; untagged ones (health
//! checks and similar plumbing) stay reachable over HTTP but are hidden from
//! discovery and from tool invocation.

pub mod binding;
pub mod capability;
pub mod catalog;
pub mod error;
pub mod handler;
pub mod param;
pub mod registry;

pub use binding::{bind_arguments, from_arguments};
pub use capability::{Capability, CapabilityBuilder, HttpMethod};
pub use catalog::{Catalog, CapabilityEntry, ParameterEntry};
pub use error::{CallError, RegistryError};
pub use handler::{handler_fn, reply, Arguments, BoxedHandler, Handler};
pub use param::{ParamDescriptor, ParamLocation, ParamType};
pub use registry::CapabilityRegistry;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        from_arguments, handler_fn, reply, Arguments, CallError, Capability, CapabilityRegistry,
        HttpMethod, ParamDescriptor, ParamType,
    };
}
