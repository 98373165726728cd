//! Shared JSON schema helpers for tool definitions.

use serde_json::{json, Map, Value};

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    properties: Map<String, Value>,
    required: Vec<String>,
    additional_properties: Option<bool>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Set `additionalProperties` explicitly (strict-mode schemas set false)
    pub fn additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    pub fn build(self) -> Value {
        let mut schema = json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        });
        if let Some(allowed) = self.additional_properties {
            schema["additionalProperties"] = Value::Bool(allowed);
        }
        schema
    }
}

pub fn empty_object_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": [],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_shape() {
        let schema = SchemaBuilder::new()
            .property("query", json!({"type": "string"}))
            .required("query")
            .build();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["query"]["type"], "string");
        assert_eq!(schema["required"][0], "query");
        assert!(schema.get("additionalProperties").is_none());
    }

    #[test]
    fn test_builder_additional_properties() {
        let schema = SchemaBuilder::new().additional_properties(false).build();
        assert_eq!(schema["additionalProperties"], false);
    }

    #[test]
    fn test_empty_object_schema() {
        let schema = empty_object_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"].as_object().unwrap().is_empty());
        assert!(schema["required"].as_array().unwrap().is_empty());
    }
}
