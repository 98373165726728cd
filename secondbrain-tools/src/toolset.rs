//! Provider tool sets: declarations plus the matching dispatch map.
//!
//! A tool set is built per request from the enabled capability subset and
//! lowered to one provider's wire format. Declarations and the dispatch
//! map are derived in the same pass from the same [`OperationDef`] list,
//! which is what makes name collisions a hard build error instead of a
//! runtime misroute.

use crate::dispatch::DispatchMap;
use crate::error::ToolSetError;
use crate::registry::PluginRegistry;
use secondbrain_core::{OperationDef, Provider, ToolDef};
use serde_json::{json, Value};
use tracing::debug;

/// Provider-agnostic declaration plus the strict-mode schema variant
struct DeclaredOp {
    def: ToolDef,
    strict_schema: Value,
}

/// Builds a [`ToolSet`] from an enabled subset of registry capabilities
pub struct ToolSetBuilder<'a> {
    registry: &'a PluginRegistry,
    enabled: Vec<String>,
    strict: bool,
}

impl<'a> ToolSetBuilder<'a> {
    pub fn new(registry: &'a PluginRegistry) -> Self {
        Self {
            registry,
            enabled: Vec::new(),
            strict: false,
        }
    }

    /// Enable a capability by id.
    ///
    /// Unknown ids are skipped at build time; a deployment may enable
    /// capabilities whose plugins are not wired in this process.
    pub fn capability(mut self, capability_id: impl Into<String>) -> Self {
        self.enabled.push(capability_id.into());
        self
    }

    /// Enable several capabilities at once
    pub fn capabilities(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.enabled.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Request strict function schemas where the provider supports them.
    ///
    /// Only affects OpenAI: strict mode marks every property required and
    /// forbids extras. Other providers ignore the flag.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Lower the enabled capabilities to `provider`'s wire format.
    ///
    /// # Errors
    /// Returns `ToolSetError::NameCollision` when two enabled capabilities
    /// declare the same tool name.
    pub fn build(self, provider: Provider) -> Result<ToolSet, ToolSetError> {
        let mut dispatch = DispatchMap::new();
        let mut declared: Vec<DeclaredOp> = Vec::new();

        for id in self.registry.capability_ids() {
            if !self.enabled.iter().any(|e| e == id) {
                continue;
            }
            let Some(plugin) = self.registry.get(id) else {
                continue;
            };
            for op in plugin.operations() {
                declared.push(DeclaredOp {
                    def: ToolDef {
                        name: op.name.clone(),
                        description: op.description.clone(),
                        input_schema: op.input_schema(),
                    },
                    strict_schema: op.strict_input_schema(),
                });
                dispatch.register(plugin.clone(), op)?;
            }
        }

        for id in &self.enabled {
            if !self.registry.contains(id) {
                debug!(capability = %id, "enabled capability is not registered, skipping");
            }
        }

        let declarations = lower(provider, self.strict, &declared);
        Ok(ToolSet {
            provider,
            declarations,
            dispatch,
        })
    }
}

/// Tool declarations for one provider plus the dispatch map routing the
/// resulting tool calls back to plugin operations
pub struct ToolSet {
    pub provider: Provider,
    /// Provider-shaped declarations, ready to embed in a request body
    pub declarations: Value,
    pub dispatch: DispatchMap,
}

impl ToolSet {
    /// Tool names in declaration order
    pub fn tool_names(&self) -> Vec<&str> {
        self.dispatch.tool_names()
    }
}

impl std::fmt::Debug for ToolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSet")
            .field("provider", &self.provider)
            .field("declarations", &self.declarations)
            .field("tool_names", &self.tool_names())
            .finish()
    }
}

fn lower(provider: Provider, strict: bool, ops: &[DeclaredOp]) -> Value {
    match provider {
        Provider::Anthropic => Value::Array(
            ops.iter()
                .map(|op| {
                    json!({
                        "name": op.def.name,
                        "description": op.def.description,
                        "input_schema": op.def.input_schema,
                    })
                })
                .collect(),
        ),
        Provider::OpenAi => Value::Array(
            ops.iter()
                .map(|op| {
                    let mut function = json!({
                        "name": op.def.name,
                        "description": op.def.description,
                        "parameters": if strict { &op.strict_schema } else { &op.def.input_schema },
                    });
                    if strict {
                        function["strict"] = json!(true);
                    }
                    json!({
                        "type": "function",
                        "function": function,
                    })
                })
                .collect(),
        ),
        Provider::Gemini => {
            let declarations: Vec<Value> = ops
                .iter()
                .map(|op| {
                    json!({
                        "name": op.def.name,
                        "description": op.def.description,
                        "parameters": op.def.input_schema,
                    })
                })
                .collect();
            json!([{ "functionDeclarations": declarations }])
        }
        Provider::Ollama => Value::Array(
            ops.iter()
                .map(|op| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": op.def.name,
                            "description": op.def.description,
                            "parameters": op.def.input_schema,
                        }
                    })
                })
                .collect(),
        ),
    }
}
