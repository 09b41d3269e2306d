//! Capability Registry
//!
//! Holds every capability of the process. Built once from the full list and
//! read-only afterwards, so it is shared as a plain `Arc` without locking.

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::capability::Capability;
use crate::catalog::{Catalog, CapabilityEntry};
use crate::error::{CallError, RegistryError};
use crate::handler::Arguments;

pub struct CapabilityRegistry {
    capabilities: Vec<Capability>,
    by_name: HashMap<String, usize>,
}

impl CapabilityRegistry {
    /// Build the registry, rejecting duplicate names and duplicate routes
    pub fn new(capabilities: Vec<Capability>) -> Result<Self, RegistryError> {
        let mut by_name = HashMap::with_capacity(capabilities.len());
        let mut routes = HashSet::with_capacity(capabilities.len());

        for (index, capability) in capabilities.iter().enumerate() {
            if by_name.insert(capability.name().to_string(), index).is_some() {
                return Err(RegistryError::DuplicateName(capability.name().to_string()));
            }
            if !routes.insert((capability.method(), capability.path())) {
                return Err(RegistryError::DuplicateRoute {
                    method: capability.method().to_string(),
                    path: capability.path().to_string(),
                });
            }
        }

        let discoverable = capabilities.iter().filter(|c| c.is_discoverable()).count();
        info!(
            total = capabilities.len(),
            discoverable,
            "Capability registry built"
        );

        Ok(Self {
            capabilities,
            by_name,
        })
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// All capabilities in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.by_name.get(name).map(|&i| &self.capabilities[i])
    }

    /// Tagged capabilities, which are the ones exposed as MCP tools
    pub fn discoverable(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter().filter(|c| c.is_discoverable())
    }

    /// Derive the catalog from the current registrations
    pub fn catalog(&self) -> Catalog {
        Catalog::new(
            self.capabilities
                .iter()
                .filter_map(CapabilityEntry::from_capability)
                .collect(),
        )
    }

    /// Invoke a capability by name
    pub async fn invoke(&self, name: &str, args: Arguments) -> Result<Value, CallError> {
        let capability = self
            .get(name)
            .ok_or_else(|| CallError::not_found(format!("unknown capability '{}'", name)))?;

        debug!(capability = name, "Invoking capability");
        capability.invoke(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use crate::param::{ParamDescriptor, ParamType};
    use serde_json::json;

    fn capability(name: &str, path: &str, tags: &[&str]) -> Capability {
        let mut builder = Capability::get(path).name(name);
        for tag in tags {
            builder = builder.tag(*tag);
        }
        builder
            .handler(handler_fn(|_| async { Ok(json!({"code": 200})) }))
            .build()
            .unwrap()
    }

    #[test]
    fn test_catalog_excludes_untagged() {
        let registry = CapabilityRegistry::new(vec![
            capability("get_zhihu_hot", "/zhihu", &["知乎"]),
            capability("health_check", "/health", &[]),
            capability("get_news", "/news", &["新闻", "聚合"]),
        ])
        .unwrap();

        let catalog = registry.catalog();
        assert_eq!(registry.len(), 3);
        assert_eq!(catalog.total, 2);
        assert!(catalog.get("health_check").is_none());
        assert_eq!(catalog.get("get_news").unwrap().tags, vec!["新闻", "聚合"]);
    }

    #[test]
    fn test_duplicates_rejected() {
        let err = CapabilityRegistry::new(vec![
            capability("a", "/a", &["x"]),
            capability("a", "/b", &["x"]),
        ])
        .err()
        .unwrap();
        assert_eq!(err, RegistryError::DuplicateName("a".into()));

        let err = CapabilityRegistry::new(vec![
            capability("a", "/a", &["x"]),
            capability("b", "/a", &["x"]),
        ])
        .err()
        .unwrap();
        assert!(matches!(err, RegistryError::DuplicateRoute { .. }));
    }

    #[tokio::test]
    async fn test_invoke_by_name() {
        let weather = Capability::get("/weather")
            .name("get_weather")
            .tag("天气")
            .param(ParamDescriptor::query("city", ParamType::String))
            .handler(handler_fn(|args: Arguments| async move {
                Ok(json!({"city": args["city"]}))
            }))
            .build()
            .unwrap();
        let registry = CapabilityRegistry::new(vec![weather]).unwrap();

        let mut args = Arguments::new();
        args.insert("city".into(), json!("北京"));
        assert_eq!(registry.invoke("get_weather", args).await.unwrap(), json!({"city": "北京"}));

        let err = registry.invoke("get_rain", Arguments::new()).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
