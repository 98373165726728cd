//! secondbrain-tools - Capability plugins and tool dispatch for SecondBrain
//!
//! This crate provides the agent-facing tool layer:
//!
//! - the [`CapabilityPlugin`] contract every tool provider implements,
//! - the note plugins (CRUD, search, organization, analysis) and web search,
//! - the process-wide [`PluginRegistry`] assembled once at startup,
//! - the [`ToolSetBuilder`] that lowers an enabled capability set to one of
//!   four provider wire formats while simultaneously building the
//!   [`DispatchMap`] that routes model tool calls back to plugin operations.
//!
//! ```ignore
//! use secondbrain_tools::{PluginRegistry, ToolSetBuilder};
//! use secondbrain_core::{Provider, RequestContext};
//!
//! let registry = PluginRegistry::with_note_plugins(store, None, None, None);
//! let tool_set = ToolSetBuilder::new(&registry)
//!     .capability("notes-crud")
//!     .capability("notes-search")
//!     .build(Provider::Anthropic)?;
//!
//! let ctx = RequestContext::for_user("user-1");
//! let result = tool_set.dispatch.dispatch(&ctx, "list_all_notes", args).await;
//! ```

pub mod capability;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod plugins;
pub mod registry;
pub mod toolset;

pub use capability::CapabilityPlugin;
pub use dispatch::DispatchMap;
pub use envelope::{NotePreview, NoteView, SemanticHit, ToolPayload};
pub use error::ToolSetError;
pub use plugins::{
    NotesAnalysisPlugin, NotesCrudPlugin, NotesOrganizationPlugin, NotesSearchPlugin,
    WebSearchPlugin,
};
pub use registry::PluginRegistry;
pub use toolset::{ToolSet, ToolSetBuilder};
