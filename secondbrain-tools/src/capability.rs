//! The capability plugin contract.
//!
//! A capability is a named group of related tools exposed to the agent.
//! The registry, the schema builders, and the dispatch map all treat
//! heterogeneous tool providers through this one trait.
//!
//! Plugins are shared, process-wide singletons. All per-request state is
//! carried in the [`RequestContext`] argument; plugins must not hold
//! mutable request state, so concurrent requests can never leak context
//! across users.

use async_trait::async_trait;
use secondbrain_core::{OperationDef, RequestContext};
use serde_json::Value;

/// Trait implemented by every tool-providing module
#[async_trait]
pub trait CapabilityPlugin: Send + Sync {
    /// Unique capability identifier (e.g. "notes-crud")
    fn capability_id(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Human-readable description of the capability
    fn description(&self) -> &'static str;

    /// The operations this capability exposes as tools.
    ///
    /// This list is the single source of truth: the provider schema
    /// builders and the dispatch map both derive from it.
    fn operations(&self) -> Vec<OperationDef>;

    /// Natural-language guidance for the system prompt.
    ///
    /// A pure function of static capability metadata plus the request's
    /// RAG-enabled flag; it must never fail, it runs before every
    /// provider request.
    fn system_prompt_addition(&self, ctx: &RequestContext) -> String;

    /// Invoke one of this capability's operations.
    ///
    /// Always returns a string for the conversation: a confirmation, a
    /// JSON envelope, or a descriptive `"Error ..."` message. Operations
    /// never propagate errors to the dispatcher.
    async fn invoke(&self, operation: &str, ctx: &RequestContext, args: Value) -> String;
}
