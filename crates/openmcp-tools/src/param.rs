//! Parameter Descriptors
//!
//! Declared at registration time instead of discovered by inspecting handler
//! signatures. A descriptor drives three things: argument binding and
//! validation, the catalog's parameter list, and the MCP input schema.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Type tag of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    /// JSON Schema type name
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }

    /// Coerce a raw value to this type.
    ///
    /// Path and query values arrive as strings; MCP arguments usually arrive
    /// typed. Both are accepted.
    pub fn coerce(&self, value: Value) -> Result<Value, String> {
        match (self, value) {
            (ParamType::String, Value::String(s)) => Ok(Value::String(s)),
            (ParamType::String, Value::Number(n)) => Ok(Value::String(n.to_string())),
            (ParamType::String, Value::Bool(b)) => Ok(Value::String(b.to_string())),

            (ParamType::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => {
                Ok(Value::Number(n))
            }
            (ParamType::Integer, Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| format!("expected an integer, got '{}'", s)),

            (ParamType::Number, Value::Number(n)) => Ok(Value::Number(n)),
            (ParamType::Number, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("expected a number, got '{}'", s)),

            (ParamType::Boolean, Value::Bool(b)) => Ok(Value::Bool(b)),
            (ParamType::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
                _ => Err(format!("expected a boolean, got '{}'", s)),
            },

            (ty, other) => Err(format!("expected {}, got {}", ty.as_str(), other)),
        }
    }
}

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    /// Outside the URL: a field of the JSON request body
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    name: String,
    location: ParamLocation,
    ty: ParamType,
    required: bool,
    default: Option<Value>,
    description: Option<String>,
    allowed: Option<Vec<String>>,
    minimum: Option<i64>,
    maximum: Option<i64>,
}

impl ParamDescriptor {
    fn new(name: impl Into<String>, location: ParamLocation, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            location,
            ty,
            required: true,
            default: None,
            description: None,
            allowed: None,
            minimum: None,
            maximum: None,
        }
    }

    /// Required string segment of the path template
    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, ParamLocation::Path, ParamType::String)
    }

    /// Required query parameter
    pub fn query(name: impl Into<String>, ty: ParamType) -> Self {
        Self::new(name, ParamLocation::Query, ty)
    }

    /// Required field of the JSON request body
    pub fn body(name: impl Into<String>, ty: ParamType) -> Self {
        Self::new(name, ParamLocation::Other, ty)
    }

    /// Make the parameter optional without a default
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Make the parameter optional, filling `value` when absent
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.required = false;
        self.default = Some(value.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restrict a string parameter to a fixed set of values
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Inclusive bounds for an integer parameter
    pub fn range(mut self, minimum: Option<i64>, maximum: Option<i64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> ParamLocation {
        self.location
    }

    pub fn param_type(&self) -> ParamType {
        self.ty
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn allowed(&self) -> Option<&[String]> {
        self.allowed.as_deref()
    }

    /// Coerce and check one supplied value
    pub fn validate(&self, value: Value) -> Result<Value, String> {
        let value = self
            .ty
            .coerce(value)
            .map_err(|e| format!("parameter '{}': {}", self.name, e))?;

        if let (Some(allowed), Some(s)) = (&self.allowed, value.as_str()) {
            if !allowed.iter().any(|a| a == s) {
                return Err(format!(
                    "parameter '{}': '{}' is not one of {}",
                    self.name,
                    s,
                    allowed.join(", ")
                ));
            }
        }

        if let Some(n) = value.as_i64() {
            if self.minimum.is_some_and(|min| n < min) || self.maximum.is_some_and(|max| n > max) {
                return Err(format!(
                    "parameter '{}': {} is out of range{}{}",
                    self.name,
                    n,
                    self.minimum.map(|m| format!(" (min {})", m)).unwrap_or_default(),
                    self.maximum.map(|m| format!(" (max {})", m)).unwrap_or_default(),
                ));
            }
        }

        Ok(value)
    }

    /// JSON Schema fragment for this parameter
    pub fn schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".into(), json!(self.ty.as_str()));
        if let Some(description) = &self.description {
            schema.insert("description".into(), json!(description));
        }
        if let Some(allowed) = &self.allowed {
            schema.insert("enum".into(), json!(allowed));
        }
        if let Some(default) = &self.default {
            schema.insert("default".into(), default.clone());
        }
        if let Some(minimum) = self.minimum {
            schema.insert("minimum".into(), json!(minimum));
        }
        if let Some(maximum) = self.maximum {
            schema.insert("maximum".into(), json!(maximum));
        }
        Value::Object(schema)
    }
}
