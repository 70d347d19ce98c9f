//! Parameter schemas for tool input validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConductorError;
use crate::tool::ToolParams;

/// The declared type of a single parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    /// A string restricted to one of a closed set of values.
    Enum(Vec<String>),
}

/// Describes one named parameter: its type, whether it is required, and a
/// free-text description planners can key off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub param_type: ParamType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: false,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Describes the named parameters a tool accepts, with types, required
/// flags, and enumerations where applicable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSchema {
    pub params: Vec<ParamSpec>,
}

impl InputSchema {
    pub fn new(params: Vec<ParamSpec>) -> Self {
        Self { params }
    }

    /// Validate a tool's incoming parameter map against the declared schema.
    /// Only checks presence of required fields and, where declared, basic
    /// type/enum membership; an agent's own `Invoke` is still free to apply
    /// domain-specific validation on top.
    pub fn validate(&self, input: &ToolParams) -> Result<(), ConductorError> {
        for spec in &self.params {
            match input.get(&spec.name) {
                None if spec.required => {
                    return Err(ConductorError::invalid_argument(format!(
                        "missing required parameter '{}'",
                        spec.name
                    )));
                }
                None => continue,
                Some(value) => validate_type(&spec.name, value, &spec.param_type)?,
            }
        }
        Ok(())
    }

    /// Render as a JSON Schema object, for embedding in a model-planner
    /// prompt or an external tool catalogue.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for spec in &self.params {
            let mut prop = serde_json::Map::new();
            match &spec.param_type {
                ParamType::String => {
                    prop.insert("type".into(), Value::String("string".into()));
                }
                ParamType::Number => {
                    prop.insert("type".into(), Value::String("number".into()));
                }
                ParamType::Boolean => {
                    prop.insert("type".into(), Value::String("boolean".into()));
                }
                ParamType::Object => {
                    prop.insert("type".into(), Value::String("object".into()));
                }
                ParamType::Array => {
                    prop.insert("type".into(), Value::String("array".into()));
                }
                ParamType::Enum(values) => {
                    prop.insert("type".into(), Value::String("string".into()));
                    prop.insert(
                        "enum".into(),
                        Value::Array(values.iter().cloned().map(Value::String).collect()),
                    );
                }
            }
            if let Some(desc) = &spec.description {
                prop.insert("description".into(), Value::String(desc.clone()));
            }
            properties.insert(spec.name.clone(), Value::Object(prop));
            if spec.required {
                required.push(Value::String(spec.name.clone()));
            }
        }
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn validate_type(name: &str, value: &Value, expected: &ParamType) -> Result<(), ConductorError> {
    let ok = match expected {
        ParamType::String => value.is_string(),
        ParamType::Number => value.is_number(),
        ParamType::Boolean => value.is_boolean(),
        ParamType::Object => value.is_object(),
        ParamType::Array => value.is_array(),
        ParamType::Enum(values) => value
            .as_str()
            .map(|s| values.iter().any(|v| v == s))
            .unwrap_or(false),
    };
    if ok {
        Ok(())
    } else {
        Err(ConductorError::invalid_argument(format!(
            "parameter '{}' does not match declared type",
            name
        )))
    }
}
