//! Per-request context threaded through every tool invocation.
//!
//! Plugin instances are shared, process-wide singletons. All per-request
//! state (current user, retrieval toggles) lives in [`RequestContext`],
//! which is constructed once per request and passed by reference to every
//! operation. Plugins hold no interior mutability, so concurrent requests
//! can never observe each other's context.

use serde::{Deserialize, Serialize};

/// Retrieval options for semantic search over note chunks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct RagOptions {
    /// Number of chunks to retrieve
    pub top_k: usize,
    /// Minimum similarity score for a chunk to be considered
    pub similarity_threshold: f32,
}

impl Default for RagOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            similarity_threshold: 0.7,
        }
    }
}

/// Context for a single agent turn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestContext {
    /// The authenticated user, if any. Operations on user-owned resources
    /// refuse to run when this is unset.
    pub user_id: Option<String>,
    /// Whether retrieval-augmented search is enabled for this request
    pub rag_enabled: bool,
    /// Retrieval options applied to semantic search operations
    pub rag: RagOptions,
}

impl RequestContext {
    /// Create a context for an authenticated user with RAG enabled
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            rag_enabled: true,
            rag: RagOptions::default(),
        }
    }

    /// Create a context with no user set
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Disable retrieval-augmented search for this request
    pub fn without_rag(mut self) -> Self {
        self.rag_enabled = false;
        self
    }

    /// Override the retrieval options
    pub fn with_rag_options(mut self, rag: RagOptions) -> Self {
        self.rag = rag;
        self
    }

    /// Get the user id, if set
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}
