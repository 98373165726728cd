//! Tool call dispatch: route model tool calls back to plugin operations.
//!
//! The dispatch map is built alongside the provider declarations from the
//! same [`OperationDef`] list, so every advertised tool is routable and
//! every routable tool was advertised. Argument problems (unknown tool,
//! missing required arguments, schema violations) never fail the agent
//! turn; they are raised as [`ToolError`] internally and rendered into
//! descriptive `"Error ..."` strings the model can react to by retrying
//! with corrected arguments.

use crate::capability::CapabilityPlugin;
use crate::error::ToolSetError;
use futures::future::join_all;
use jsonschema::Validator;
use secondbrain_core::{OperationDef, RequestContext, ToolCall, ToolError, ToolResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

struct DispatchEntry {
    plugin: Arc<dyn CapabilityPlugin>,
    op: OperationDef,
}

/// Flat map from tool name to the plugin operation that implements it
#[derive(Default)]
pub struct DispatchMap {
    entries: HashMap<String, DispatchEntry>,
    validators: HashMap<String, Validator>,
    order: Vec<String>,
}

impl DispatchMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one operation under its tool name.
    ///
    /// # Errors
    /// Returns `ToolSetError::NameCollision` if the name is already taken.
    pub fn register(
        &mut self,
        plugin: Arc<dyn CapabilityPlugin>,
        op: OperationDef,
    ) -> Result<(), ToolSetError> {
        let name = op.name.clone();
        if self.entries.contains_key(&name) {
            return Err(ToolSetError::NameCollision(name));
        }

        let validator =
            Validator::new(&op.input_schema()).map_err(|e| ToolSetError::InvalidSchema {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        self.validators.insert(name.clone(), validator);
        self.entries.insert(name.clone(), DispatchEntry { plugin, op });
        self.order.push(name);
        Ok(())
    }

    /// Tool names in registration order
    pub fn tool_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dispatch a single tool call by name.
    ///
    /// Declared defaults are filled in for omitted optional arguments
    /// before validation, so plugins always see a complete argument
    /// object.
    pub async fn dispatch(&self, ctx: &RequestContext, name: &str, args: Value) -> String {
        let args = match self.prepare(name, args) {
            Ok(args) => args,
            Err(err) => return self.render_retry(&err),
        };

        debug!(tool = name, "dispatching tool call");
        // prepare() only succeeds for registered names
        let entry = &self.entries[name];
        entry.plugin.invoke(name, ctx, args).await
    }

    /// Resolve the tool, apply defaults, and validate the arguments
    fn prepare(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ToolError::not_found(name))?;

        let mut map = match args {
            Value::Object(map) => map,
            Value::Null => serde_json::Map::new(),
            other => {
                return Err(ToolError::invalid_arguments(
                    name,
                    format!("arguments must be a JSON object, got {}", json_type_name(&other)),
                ));
            }
        };

        for param in &entry.op.params {
            if let Some(default) = &param.default {
                map.entry(param.name.clone()).or_insert_with(|| default.clone());
            }
        }

        let missing: Vec<String> = entry
            .op
            .required_params()
            .into_iter()
            .filter(|p| map.get(*p).map_or(true, Value::is_null))
            .map(|p| format!("'{p}'"))
            .collect();
        if !missing.is_empty() {
            return Err(ToolError::missing_arguments(name, missing.join(", ")));
        }

        let args = Value::Object(map);
        if let Some(validator) = self.validators.get(name) {
            if !validator.is_valid(&args) {
                let problems: Vec<String> = validator
                    .iter_errors(&args)
                    .map(|e| e.to_string())
                    .collect();
                return Err(ToolError::invalid_arguments(name, problems.join("; ")));
            }
        }
        Ok(args)
    }

    /// Render a dispatch error as a message the model can act on.
    ///
    /// Argument errors carry the operation's argument template so a retry
    /// does not have to guess the expected shape.
    fn render_retry(&self, err: &ToolError) -> String {
        let template = |name: &str| {
            self.entries
                .get(name)
                .map(|e| e.op.arguments_template())
                .unwrap_or_default()
        };
        match err {
            ToolError::NotFound { name } => format!(
                "Error: unknown tool '{}'. Available tools: {}.",
                name,
                self.order.join(", ")
            ),
            ToolError::MissingArguments { name, missing } => format!(
                "Error: missing required argument(s) {missing} for '{name}'. \
                 Please retry with {}",
                template(name)
            ),
            ToolError::InvalidArguments { name, reason } => format!(
                "Error: invalid arguments for '{name}': {reason}. Please retry with {}",
                template(name)
            ),
            ToolError::ExecutionFailed { message } => format!("Error: {message}"),
        }
    }

    /// Dispatch a model tool call and wrap the output as a [`ToolResult`]
    pub async fn dispatch_call(&self, ctx: &RequestContext, call: &ToolCall) -> ToolResult {
        let content = self.dispatch(ctx, &call.name, call.args.clone()).await;
        let is_error = content.starts_with("Error");
        ToolResult::from_tool_call(call, content, is_error)
    }

    /// Dispatch a batch of tool calls concurrently.
    ///
    /// Results come back in call order regardless of completion order.
    pub async fn dispatch_parallel(
        &self,
        ctx: &RequestContext,
        calls: &[ToolCall],
    ) -> Vec<ToolResult> {
        join_all(calls.iter().map(|call| self.dispatch_call(ctx, call))).await
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
