//! Parameter schemas and validation.
//!
//! Two layers, applied in a fixed fallback order before every dispatch:
//! a structured validator ([`StructuredSchema`], preferred when a tool
//! declares one) and basic checks against the declared JSON-Schema-like
//! [`InputSchema`] (required names present, primitive types match).
//! Unknown extra parameters are permitted by the declared-schema path and
//! passed through unchanged; the structured path rejects them.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// =============================================================================
// Declared schema (wire format)
// =============================================================================

/// JSON-Schema-like declaration of a tool's accepted parameters.
///
/// This is the shape advertised to callers and received from the remote
/// tools endpoint; it is data, not a compiled validator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, SchemaProperty>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

/// A single declared property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaProperty {
    #[serde(rename = "type")]
    pub prop_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl InputSchema {
    /// An object schema with the given properties and required names.
    pub fn object(
        properties: impl IntoIterator<Item = (&'static str, SchemaProperty)>,
        required: &[&str],
    ) -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            required: required.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SchemaProperty {
    pub fn new(prop_type: &str, description: &str) -> Self {
        Self {
            prop_type: prop_type.to_string(),
            description: Some(description.to_string()),
            default: None,
            enum_values: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

// =============================================================================
// Structured schema (preferred validator)
// =============================================================================

/// Parameter type for the structured validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Number,
    Bool,
    Object,
    StringList,
    Enum(Vec<String>),
    Optional(Box<ParamType>),
}

impl ParamType {
    /// Validate a JSON value against this parameter type.
    pub fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match self {
            ParamType::String => {
                if value.is_string() {
                    Ok(())
                } else {
                    Err(format!("expected string, got {}", value_type_name(value)))
                }
            }
            ParamType::Number => {
                if value.is_number() {
                    Ok(())
                } else {
                    Err(format!("expected number, got {}", value_type_name(value)))
                }
            }
            ParamType::Bool => {
                if value.is_boolean() {
                    Ok(())
                } else {
                    Err(format!("expected boolean, got {}", value_type_name(value)))
                }
            }
            ParamType::Object => {
                if value.is_object() {
                    Ok(())
                } else {
                    Err(format!("expected object, got {}", value_type_name(value)))
                }
            }
            ParamType::StringList => {
                if let Some(arr) = value.as_array() {
                    for (i, item) in arr.iter().enumerate() {
                        if !item.is_string() {
                            return Err(format!(
                                "expected string at index {}, got {}",
                                i,
                                value_type_name(item)
                            ));
                        }
                    }
                    Ok(())
                } else {
                    Err(format!("expected array, got {}", value_type_name(value)))
                }
            }
            ParamType::Enum(variants) => {
                if let Some(s) = value.as_str() {
                    if variants.iter().any(|v| v == s) {
                        Ok(())
                    } else {
                        Err(format!(
                            "invalid enum value '{}', expected one of: {}",
                            s,
                            variants.join(", ")
                        ))
                    }
                } else {
                    Err(format!(
                        "expected string for enum, got {}",
                        value_type_name(value)
                    ))
                }
            }
            ParamType::Optional(inner) => {
                if value.is_null() {
                    Ok(())
                } else {
                    inner.validate(value)
                }
            }
        }
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A single parameter specification in a structured schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub param_type: ParamType,
    pub required: bool,
}

impl ParamSpec {
    pub fn required(name: &str, param_type: ParamType) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            required: true,
        }
    }

    pub fn optional(name: &str, param_type: ParamType) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            required: false,
        }
    }
}

/// Stricter, composable validator preferred over declared-schema checks.
///
/// Collects every issue as `field: message`; unlike the declared-schema
/// fallback it also rejects parameters the tool never declared.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredSchema {
    pub params: Vec<ParamSpec>,
}

impl StructuredSchema {
    pub fn new(params: Vec<ParamSpec>) -> Self {
        Self { params }
    }

    /// Validate a parameter object, returning a list of issues (empty = valid).
    pub fn validate(&self, params: &serde_json::Map<String, Value>) -> Vec<String> {
        let mut issues = Vec::new();

        for spec in &self.params {
            if spec.required && !params.contains_key(&spec.name) {
                issues.push(format!("{}: missing required parameter", spec.name));
            }
        }

        let known: HashMap<&str, &ParamSpec> = self
            .params
            .iter()
            .map(|p| (p.name.as_str(), p))
            .collect();

        for (key, value) in params {
            match known.get(key.as_str()) {
                Some(spec) => {
                    if let Err(e) = spec.param_type.validate(value) {
                        issues.push(format!("{}: {}", key, e));
                    }
                }
                None => issues.push(format!("{}: unknown parameter", key)),
            }
        }

        issues
    }
}

// =============================================================================
// Validation entry point
// =============================================================================

/// Validate call parameters before dispatch.
///
/// Runs the structured schema when the tool carries one, otherwise falls
/// back to declared-schema checks in a fixed order: required names first,
/// then primitive type matches for string/number/boolean/object properties.
pub fn validate_parameters(
    structured: Option<&StructuredSchema>,
    schema: &InputSchema,
    parameters: &Value,
) -> Result<()> {
    let params = parameters
        .as_object()
        .ok_or_else(|| Error::validation("parameters must be a JSON object"))?;

    if let Some(structured) = structured {
        let issues = structured.validate(params);
        if issues.is_empty() {
            return Ok(());
        }
        return Err(Error::validation(issues.join(", ")));
    }

    for name in &schema.required {
        if !params.contains_key(name) {
            return Err(Error::validation(format!(
                "required parameter '{}' is missing",
                name
            )));
        }
    }

    for (key, value) in params {
        let Some(prop) = schema.properties.get(key) else {
            // Undeclared extras pass through unchanged.
            continue;
        };
        let ok = match prop.prop_type.as_str() {
            "string" => value.is_string(),
            "number" => value.is_number(),
            "boolean" => value.is_boolean(),
            "object" => value.is_object(),
            // Other declared types are not checked by the fallback path.
            _ => true,
        };
        if !ok {
            return Err(Error::validation(format!(
                "parameter '{}' must be a {}",
                key, prop.prop_type
            )));
        }
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_schema() -> InputSchema {
        InputSchema::object(
            [
                ("url", SchemaProperty::new("string", "Target URL")),
                ("data", SchemaProperty::new("object", "JSON body")),
                (
                    "timeout",
                    SchemaProperty::new("number", "Request timeout in milliseconds")
                        .with_default(json!(5000)),
                ),
            ],
            &["url", "data"],
        )
    }

    #[test]
    fn test_required_missing_names_field() {
        let err = validate_parameters(None, &post_schema(), &json!({"url": "http://x"}))
            .unwrap_err();
        assert!(err.to_string().contains("data"), "got: {}", err);
    }

    #[test]
    fn test_required_present_and_typed_passes() {
        validate_parameters(
            None,
            &post_schema(),
            &json!({"url": "http://x", "data": {"a": 1}}),
        )
        .unwrap();
    }

    #[test]
    fn test_type_mismatch_names_parameter() {
        let err = validate_parameters(
            None,
            &post_schema(),
            &json!({"url": 42, "data": {}}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("'url'"), "got: {}", err);
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn test_unknown_extras_pass_through() {
        validate_parameters(
            None,
            &post_schema(),
            &json!({"url": "http://x", "data": {}, "bogus": true}),
        )
        .unwrap();
    }

    #[test]
    fn test_non_object_parameters_rejected() {
        let err = validate_parameters(None, &post_schema(), &json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_structured_preferred_over_declared() {
        // Declared schema would accept this, the structured one must not.
        let structured = StructuredSchema::new(vec![ParamSpec::required(
            "msg",
            ParamType::String,
        )]);
        let schema = InputSchema::object([], &[]);
        let err =
            validate_parameters(Some(&structured), &schema, &json!({"msg": 7})).unwrap_err();
        assert!(err.to_string().contains("msg"));
    }

    #[test]
    fn test_structured_collects_all_issues() {
        let structured = StructuredSchema::new(vec![
            ParamSpec::required("title", ParamType::String),
            ParamSpec::required("body", ParamType::String),
        ]);
        let issues = structured.validate(json!({"stray": 1}).as_object().unwrap());
        assert_eq!(issues.len(), 3, "got: {:?}", issues);
    }

    #[test]
    fn test_structured_rejects_unknown() {
        let structured =
            StructuredSchema::new(vec![ParamSpec::optional("msg", ParamType::String)]);
        let issues = structured.validate(json!({"other": "x"}).as_object().unwrap());
        assert_eq!(issues, vec!["other: unknown parameter"]);
    }

    #[test]
    fn test_param_type_enum_validation() {
        let pt = ParamType::Enum(vec!["metric".to_string(), "imperial".to_string()]);
        assert!(pt.validate(&json!("metric")).is_ok());
        assert!(pt.validate(&json!("kelvins")).is_err());
        assert!(pt.validate(&json!(42)).is_err());
    }

    #[test]
    fn test_param_type_optional_accepts_null() {
        let pt = ParamType::Optional(Box::new(ParamType::Number));
        assert!(pt.validate(&json!(null)).is_ok());
        assert!(pt.validate(&json!(3)).is_ok());
        assert!(pt.validate(&json!("3")).is_err());
    }

    #[test]
    fn test_param_type_string_list_validation() {
        let pt = ParamType::StringList;
        assert!(pt.validate(&json!(["a", "b"])).is_ok());
        assert!(pt.validate(&json!([1, 2])).is_err());
        assert!(pt.validate(&json!("not array")).is_err());
    }

    #[test]
    fn test_schema_wire_format() {
        let schema = post_schema();
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["url"]["type"], "string");
        assert!(value["required"]
            .as_array()
            .unwrap()
            .contains(&json!("url")));
    }
}
