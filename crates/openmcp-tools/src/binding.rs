//! Argument binding
//!
//! Turns the raw arguments of one invocation into the validated set a handler
//! sees: values coerced to their declared type, defaults filled, required
//! parameters enforced. Undeclared arguments are dropped.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CallError;
use crate::handler::Arguments;
use crate::param::ParamDescriptor;

/// Bind raw arguments against a parameter list
pub fn bind_arguments(params: &[ParamDescriptor], raw: Arguments) -> Result<Arguments, CallError> {
    let mut raw = raw;
    let mut bound = Arguments::new();
    let mut missing = Vec::new();

    for param in params {
        match raw.remove(param.name()) {
            Some(Value::Null) | None => {
                if let Some(default) = param.default() {
                    bound.insert(param.name().to_string(), default.clone());
                } else if param.is_required() {
                    missing.push(param.name());
                }
            }
            Some(value) => {
                let value = param.validate(value).map_err(CallError::InvalidArgument)?;
                bound.insert(param.name().to_string(), value);
            }
        }
    }

    if !missing.is_empty() {
        return Err(CallError::invalid_argument(format!(
            "missing required parameter(s): {}",
            missing.join(", ")
        )));
    }

    if !raw.is_empty() {
        tracing::trace!(ignored = ?raw.keys().collect::<Vec<_>>(), "Ignoring undeclared arguments");
    }

    Ok(bound)
}

/// Deserialize bound arguments into a typed parameter struct
pub fn from_arguments<T: DeserializeOwned>(args: Arguments) -> Result<T, CallError> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| CallError::invalid_argument(format!("invalid arguments: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamType;
    use serde::Deserialize;
    use serde_json::json;

    fn search_params() -> Vec<ParamDescriptor> {
        vec![
            ParamDescriptor::query("keyword", ParamType::String),
            ParamDescriptor::query("page", ParamType::Integer)
                .default_value(1)
                .range(Some(1), None),
            ParamDescriptor::query("num", ParamType::Integer)
                .default_value(20)
                .range(Some(1), Some(100)),
            ParamDescriptor::query("highlight", ParamType::Boolean).optional(),
        ]
    }

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => map,
            _ => panic!("test arguments must be an object"),
        }
    }

    #[test]
    fn test_defaults_and_coercion() {
        let raw = args(json!({"keyword": "周杰伦", "num": "5"}));
        let bound = bind_arguments(&search_params(), raw).unwrap();
        assert_eq!(
            Value::Object(bound),
            json!({"keyword": "周杰伦", "page": 1, "num": 5})
        );
    }

    #[test]
    fn test_missing_required() {
        let err = bind_arguments(&search_params(), Arguments::new()).unwrap_err();
        assert_eq!(err.status_code(), 422);
        assert!(err.to_string().contains("keyword"));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let raw = args(json!({"keyword": "x", "page": null}));
        let bound = bind_arguments(&search_params(), raw).unwrap();
        assert_eq!(bound["page"], json!(1));
    }

    #[test]
    fn test_invalid_value_rejected() {
        let raw = args(json!({"keyword": "x", "page": "0"}));
        let err = bind_arguments(&search_params(), raw).unwrap_err();
        assert!(matches!(err, CallError::InvalidArgument(_)));
    }

    #[test]
    fn test_undeclared_arguments_dropped() {
        let raw = args(json!({"keyword": "x", "extra": 1}));
        let bound = bind_arguments(&search_params(), raw).unwrap();
        assert!(!bound.contains_key("extra"));
    }

    #[test]
    fn test_from_arguments() {
        #[derive(Deserialize)]
        struct Search {
            keyword: String,
            page: u32,
            num: u32,
            highlight: Option<bool>,
        }

        let raw = args(json!({"keyword": "x", "highlight": "false"}));
        let bound = bind_arguments(&search_params(), raw).unwrap();
        let search: Search = from_arguments(bound).unwrap();
        assert_eq!(search.keyword, "x");
        assert_eq!(search.page, 1);
        assert_eq!(search.num, 20);
        assert_eq!(search.highlight, Some(false));
    }
}
