//! Operation and parameter specs, the single source of truth for tools.
//!
//! Every plugin describes its operations as explicit [`OperationDef`]
//! values registered at construction time. The provider schema builders
//! and the dispatch map both derive from this one list, so the four wire
//! formats can never drift apart on tool names or requiredness.

use crate::schema::SchemaBuilder;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Semantic type of a tool parameter.
///
/// This is a closed vocabulary that maps 1:1 onto the JSON-schema types
/// every supported provider understands. Adding a variant here forces the
/// mapping below to be extended, so an unmappable type is a compile error
/// rather than a silent coercion at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    /// JSON-schema type name
    pub fn schema_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// A single formal parameter of an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub description: String,
    pub param_type: ParamType,
    /// Required parameters have no default; optional ones may carry one
    pub required: bool,
    /// Default applied by the dispatcher when the model omits the argument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Closed value set for enum-like string parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<String>>,
}

impl ParamSpec {
    /// A required parameter
    pub fn required(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type,
            required: true,
            default: None,
            one_of: None,
        }
    }

    /// An optional parameter with no default
    pub fn optional(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type,
            required: false,
            default: None,
            one_of: None,
        }
    }

    /// Attach a default value (marks the parameter optional)
    pub fn with_default(mut self, default: Value) -> Self {
        self.required = false;
        self.default = Some(default);
        self
    }

    /// Restrict a string parameter to a closed value set
    pub fn with_one_of(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.one_of = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// JSON-schema fragment for this parameter
    pub fn schema(&self) -> Value {
        let mut schema = json!({
            "type": self.param_type.schema_type(),
            "description": self.description,
        });
        if let Some(values) = &self.one_of {
            schema["enum"] = json!(values);
        }
        schema
    }
}

/// A callable operation exposed to the model as a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDef {
    /// Tool name; must be unique across all capabilities in a tool set
    pub name: String,
    /// Human description surfaced to the model
    pub description: String,
    /// Ordered formal parameter list
    pub params: Vec<ParamSpec>,
}

impl OperationDef {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Names of all required parameters
    pub fn required_params(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// JSON schema for the arguments object
    pub fn input_schema(&self) -> Value {
        let mut builder = SchemaBuilder::new();
        for param in &self.params {
            builder = builder.property(&param.name, param.schema());
            if param.required {
                builder = builder.required(&param.name);
            }
        }
        builder.build()
    }

    /// Strict-mode schema (OpenAI): every property required, no extras.
    ///
    /// This is a serialization-format variant only; the dispatcher still
    /// applies declared defaults for optional parameters.
    pub fn strict_input_schema(&self) -> Value {
        let mut builder = SchemaBuilder::new().additional_properties(false);
        for param in &self.params {
            builder = builder.property(&param.name, param.schema());
            builder = builder.required(&param.name);
        }
        builder.build()
    }

    /// A `{"arg": <type>}` template used in retry messages to the model
    pub fn arguments_template(&self) -> String {
        let fields: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("\"{}\": <{}>", p.name, p.param_type.schema_type()))
            .collect();
        format!("{{{}}}", fields.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_op() -> OperationDef {
        OperationDef::new("search_notes", "Search notes by keyword")
            .param(ParamSpec::required(
                "query",
                ParamType::String,
                "Search query",
            ))
            .param(
                ParamSpec::optional("top_k", ParamType::Integer, "Max results")
                    .with_default(json!(5)),
            )
    }

    #[test]
    fn test_input_schema_required_set() {
        let schema = sample_op().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["properties"]["top_k"]["type"], "integer");

        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "query");
    }

    #[test]
    fn test_strict_schema_marks_everything_required() {
        let schema = sample_op().strict_input_schema();
        assert_eq!(schema["additionalProperties"], false);
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
    }

    #[test]
    fn test_with_default_clears_required() {
        let param = ParamSpec::required("limit", ParamType::Integer, "Cap").with_default(json!(10));
        assert!(!param.required);
        assert_eq!(param.default, Some(json!(10)));
    }

    #[test]
    fn test_one_of_emits_enum() {
        let param = ParamSpec::required("order", ParamType::String, "Sort order")
            .with_one_of(["asc", "desc"]);
        let schema = param.schema();
        assert_eq!(schema["enum"][0], "asc");
        assert_eq!(schema["enum"][1], "desc");
    }

    #[test]
    fn test_arguments_template() {
        let template = sample_op().arguments_template();
        assert_eq!(template, "{\"query\": <string>, \"top_k\": <integer>}");
    }

    #[test]
    fn test_required_params() {
        assert_eq!(sample_op().required_params(), vec!["query"]);
    }
}
