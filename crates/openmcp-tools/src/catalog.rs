//! Capability Catalog
//!
//! Wire shape of `GET /api-registry/apis`. Always derived from the registry on
//! request and never stored.

use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::param::{ParamDescriptor, ParamLocation, ParamType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub required: bool,
    pub location: ParamLocation,
}

impl From<&ParamDescriptor> for ParameterEntry {
    fn from(param: &ParamDescriptor) -> Self {
        Self {
            name: param.name().to_string(),
            param_type: param.param_type(),
            required: param.is_required(),
            location: param.location(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityEntry {
    pub path: String,
    pub methods: Vec<String>,
    pub name: String,
    pub description: String,
    pub summary: String,
    pub tags: Vec<String>,
    /// First tag, used for grouping
    pub category: String,
    pub parameters: Vec<ParameterEntry>,
}

impl CapabilityEntry {
    /// Entry for a capability, or `None` if it is untagged
    pub fn from_capability(capability: &Capability) -> Option<Self> {
        let category = capability.tags().first()?.clone();
        Some(Self {
            path: capability.path().to_string(),
            methods: vec![capability.method().to_string()],
            name: capability.name().to_string(),
            description: capability.description().to_string(),
            summary: capability.summary().to_string(),
            tags: capability.tags().to_vec(),
            category,
            parameters: capability.params().iter().map(ParameterEntry::from).collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub total: usize,
    pub apis: Vec<CapabilityEntry>,
}

impl Catalog {
    pub fn new(apis: Vec<CapabilityEntry>) -> Self {
        Self {
            total: apis.len(),
            apis,
        }
    }

    pub fn get(&self, name: &str) -> Option<&CapabilityEntry> {
        self.apis.iter().find(|entry| entry.name == name)
    }
}
