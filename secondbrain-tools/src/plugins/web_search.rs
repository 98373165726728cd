//! Web search capability.
//!
//! The only built-in capability that does not touch the note store, and
//! the only one usable without a user context.

use crate::capability::CapabilityPlugin;
use crate::envelope::ToolPayload;
use crate::plugins::require_str;
use async_trait::async_trait;
use secondbrain_core::{OperationDef, ParamSpec, ParamType, RequestContext};
use secondbrain_notes::SearchService;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct WebSearchPlugin {
    search: Option<Arc<dyn SearchService>>,
}

impl WebSearchPlugin {
    pub fn new(search: Option<Arc<dyn SearchService>>) -> Self {
        Self { search }
    }

    async fn web_search(&self, args: &Value) -> Result<String, String> {
        let query = require_str(args, "query")?;
        let Some(search) = &self.search else {
            return Err(
                "Error: Web search is not available. The search service is not configured."
                    .to_string(),
            );
        };

        let max_results = args
            .get("max_results")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(5);

        let results = search
            .search(query, max_results)
            .await
            .map_err(|e| format!("Error searching the web: {e}"))?;

        Ok(ToolPayload::WebResults {
            message: match results.len() {
                0 => format!("No web results for '{query}'."),
                1 => format!("Found 1 web result for '{query}'."),
                n => format!("Found {n} web results for '{query}'."),
            },
            results,
        }
        .to_json())
    }
}

#[async_trait]
impl CapabilityPlugin for WebSearchPlugin {
    fn capability_id(&self) -> &'static str {
        "web-search"
    }

    fn display_name(&self) -> &'static str {
        "Web Search"
    }

    fn description(&self) -> &'static str {
        "Search the web for current information"
    }

    fn operations(&self) -> Vec<OperationDef> {
        vec![OperationDef::new(
            "web_search",
            "Search the web and return titles, links, and snippets",
        )
        .param(ParamSpec::required("query", ParamType::String, "Search query"))
        .param(
            ParamSpec::optional("max_results", ParamType::Integer, "Maximum number of results")
                .with_default(json!(5)),
        )]
    }

    fn system_prompt_addition(&self, _ctx: &RequestContext) -> String {
        "You can search the web for current information with web_search. Cite \
         the result URLs when you use what you found."
            .to_string()
    }

    async fn invoke(&self, operation: &str, _ctx: &RequestContext, args: Value) -> String {
        let result = match operation {
            "web_search" => self.web_search(&args).await,
            other => Err(format!(
                "Error: unknown operation '{other}' for capability 'web-search'."
            )),
        };
        result.unwrap_or_else(|e| e)
    }
}
