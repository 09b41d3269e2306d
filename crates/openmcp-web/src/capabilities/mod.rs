//! Capability wiring
//!
//! Every facade operation is declared here, in registration order: hot lists,
//! weather, then music. The list is handed to the registry once at startup.

pub mod hotlist;
pub mod music;
pub mod weather;

use openmcp_tools::{CallError, Capability, RegistryError};
use openmcp_upstream::UpstreamError;

use crate::state::Providers;

pub fn all(providers: &Providers) -> Result<Vec<Capability>, RegistryError> {
    let mut capabilities = hotlist::capabilities(&providers.dailyhot)?;
    capabilities.extend(weather::capabilities(&providers.weather)?);
    capabilities.extend(music::capabilities(&providers.music)?);
    Ok(capabilities)
}

/// Map a provider failure onto the caller-facing error class
pub fn call_error(error: UpstreamError) -> CallError {
    match error {
        UpstreamError::InvalidInput(msg) => CallError::BadRequest(msg),
        UpstreamError::NotFound(msg) => CallError::NotFound(msg),
        other => CallError::upstream(other.to_string()),
    }
}
