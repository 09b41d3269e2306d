//! Capability definitions
//!
//! A [`Capability`] is built once at startup with [`CapabilityBuilder`] and is
//! immutable afterwards. `build()` checks that the path template and the
//! declared path parameters agree, so a capability that cannot be routed is
//! rejected before the server starts.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::fmt;

use crate::binding::bind_arguments;
use crate::error::{CallError, RegistryError};
use crate::handler::{Arguments, BoxedHandler};
use crate::param::{ParamDescriptor, ParamLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invokable operation
#[derive(Clone)]
pub struct Capability {
    method: HttpMethod,
    path: String,
    name: String,
    summary: String,
    description: String,
    tags: Vec<String>,
    params: Vec<ParamDescriptor>,
    handler: BoxedHandler,
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Capability {
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> CapabilityBuilder {
        CapabilityBuilder::new(method, path)
    }

    pub fn get(path: impl Into<String>) -> CapabilityBuilder {
        CapabilityBuilder::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> CapabilityBuilder {
        CapabilityBuilder::new(HttpMethod::Post, path)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Path template, with parameters written as `{name}`
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Untagged capabilities are hidden from the catalog and from MCP
    pub fn is_discoverable(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    /// JSON Schema of the arguments object, as advertised by `tools/list`
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name().to_string(), p.schema()))
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.is_required())
            .map(|p| p.name())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Bind `args` against the declared parameters and run the handler
    pub async fn invoke(&self, args: Arguments) -> Result<Value, CallError> {
        let bound = bind_arguments(&self.params, args)?;
        self.handler.call(bound).await
    }
}

/// Builder for [`Capability`]
pub struct CapabilityBuilder {
    method: HttpMethod,
    path: String,
    name: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    params: Vec<ParamDescriptor>,
    handler: Option<BoxedHandler>,
}

impl CapabilityBuilder {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            name: None,
            summary: None,
            description: None,
            tags: Vec::new(),
            params: Vec::new(),
            handler: None,
        }
    }

    /// Unique operation name, also the MCP tool name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    pub fn handler(mut self, handler: BoxedHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn build(self) -> Result<Capability, RegistryError> {
        let name = self
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| RegistryError::MissingName(self.path.clone()))?;
        let handler = self
            .handler
            .ok_or_else(|| RegistryError::MissingHandler(name.clone()))?;

        let segments = path_params(&self.path).ok_or_else(|| RegistryError::InvalidPath {
            name: name.clone(),
            path: self.path.clone(),
        })?;

        let declared: HashSet<&str> = self
            .params
            .iter()
            .filter(|p| p.location() == ParamLocation::Path)
            .map(|p| p.name())
            .collect();

        if let Some(param) = segments.iter().find(|s| !declared.contains(s.as_str())) {
            return Err(RegistryError::UndeclaredPathParam {
                name,
                param: param.clone(),
            });
        }
        if let Some(param) = declared.iter().find(|d| !segments.iter().any(|s| s == *d)) {
            return Err(RegistryError::UnusedPathParam {
                name,
                param: param.to_string(),
            });
        }

        // Summary falls back to the description's first line
        let description = self.description.unwrap_or_default();
        let summary = self.summary.unwrap_or_else(|| {
            description.lines().next().unwrap_or_default().trim().to_string()
        });

        Ok(Capability {
            method: self.method,
            path: self.path,
            name,
            summary,
            description,
            tags: self.tags,
            params: self.params,
            handler,
        })
    }
}

/// Names of the `{param}` segments of a path template, or `None` if the
/// template is malformed
fn path_params(path: &str) -> Option<Vec<String>> {
    if !path.starts_with('/') {
        return None;
    }

    let mut params = Vec::new();
    for segment in path.split('/').skip(1) {
        if let Some(inner) = segment.strip_prefix('{') {
            let name = inner.strip_suffix('}')?;
            let valid = !name.is_empty()
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid {
                return None;
            }
            params.push(name.to_string());
        } else if segment.contains('{') || segment.contains('}') {
            return None;
        }
    }
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use crate::param::ParamType;

    fn echo() -> BoxedHandler {
        handler_fn(|args: Arguments| async move { Ok(Value::Object(args)) })
    }

    #[test]
    fn test_path_params() {
        assert_eq!(path_params("/hot/{platform}"), Some(vec!["platform".to_string()]));
        assert_eq!(path_params("/news"), Some(vec![]));
        assert_eq!(path_params("hot"), None);
        assert_eq!(path_params("/hot/{plat-form}"), None);
        assert_eq!(path_params("/hot/x{platform}"), None);
    }

    #[test]
    fn test_build_validates_path_params() {
        let err = Capability::get("/hot/{platform}")
            .name("get_hot")
            .handler(echo())
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::UndeclaredPathParam { .. }));

        let err = Capability::get("/news")
            .name("get_news")
            .param(ParamDescriptor::path("platform"))
            .handler(echo())
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnusedPathParam { .. }));

        let err = Capability::get("/news").handler(echo()).build().unwrap_err();
        assert!(matches!(err, RegistryError::MissingName(_)));

        let err = Capability::get("/news").name("get_news").build().unwrap_err();
        assert!(matches!(err, RegistryError::MissingHandler(_)));
    }

    #[test]
    fn test_summary_defaults_to_first_description_line() {
        let capability = Capability::get("/news")
            .name("get_news")
            .description("获取新闻热榜\n\n依次尝试多个新闻源")
            .handler(echo())
            .build()
            .unwrap();
        assert_eq!(capability.summary(), "获取新闻热榜");
        assert!(!capability.is_discoverable());
    }

    #[test]
    fn test_input_schema() {
        let capability = Capability::get("/weather")
            .name("get_weather")
            .tag("天气")
            .param(ParamDescriptor::query("city", ParamType::String).describe("城市名称"))
            .param(ParamDescriptor::query("lang", ParamType::String).default_value("zh_cn"))
            .handler(echo())
            .build()
            .unwrap();

        assert_eq!(
            capability.input_schema(),
            json!({
                "type": "object",
                "properties": {
                    "city": {"type": "string", "description": "城市名称"},
                    "lang": {"type": "string", "default": "zh_cn"}
                },
                "required": ["city"]
            })
        );
    }

    #[tokio::test]
    async fn test_invoke_binds_arguments() {
        let capability = Capability::get("/hot/{platform}")
            .name("get_hot")
            .tag("热榜")
            .param(ParamDescriptor::path("platform"))
            .handler(echo())
            .build()
            .unwrap();

        let mut args = Arguments::new();
        args.insert("platform".into(), json!("zhihu"));
        args.insert("ignored".into(), json!(true));
        assert_eq!(capability.invoke(args).await.unwrap(), json!({"platform": "zhihu"}));

        let err = capability.invoke(Arguments::new()).await.unwrap_err();
        assert_eq!(err.status_code(), 422);
    }
}
