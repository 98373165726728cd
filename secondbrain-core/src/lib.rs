//! secondbrain-core - Core types for the SecondBrain agent tool layer
//!
//! These types form the representation boundary between the plugin layer,
//! the provider schema builders, and the dispatch map. Everything a plugin
//! exposes to a model is described by an [`OperationDef`], the single
//! source of truth from which every provider wire format derives.

pub mod context;
pub mod error;
pub mod operation;
pub mod provider;
pub mod schema;
pub mod types;

pub use context::{RagOptions, RequestContext};
pub use error::ToolError;
pub use operation::{OperationDef, ParamSpec, ParamType};
pub use provider::Provider;
pub use schema::{empty_object_schema, SchemaBuilder};
pub use types::{ToolCall, ToolDef, ToolResult};
