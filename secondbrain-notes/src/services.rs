//! Optional external service abstractions consumed by plugins.
//!
//! Both services here are optional dependencies: plugins that use them
//! degrade to an explanatory error string when the service is absent
//! instead of failing the agent turn.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors from optional external services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Service call failed: {0}")]
    CallFailed(String),
    #[error("Service returned malformed output: {0}")]
    MalformedOutput(String),
}

/// Prompts a model and parses its response into a JSON value that
/// conforms to the supplied schema.
#[async_trait]
pub trait StructuredOutputService: Send + Sync {
    async fn generate(&self, prompt: &str, schema: Value) -> Result<Value, ServiceError>;
}

/// A single web search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Web search backend
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ServiceError>;
}
