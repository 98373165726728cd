//! Process-wide plugin registry.
//!
//! The registry is assembled once at startup and shared read-only across
//! requests. Per-request selection (which capabilities a given agent turn
//! may use) happens later, in the tool set builder; the registry itself
//! only maps capability ids to plugin instances.

use crate::capability::CapabilityPlugin;
use crate::plugins::{
    NotesAnalysisPlugin, NotesCrudPlugin, NotesOrganizationPlugin, NotesSearchPlugin,
    WebSearchPlugin,
};
use secondbrain_core::RequestContext;
use secondbrain_notes::{NoteStore, RagService, SearchService, StructuredOutputService};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Registry of capability plugins keyed by capability id.
///
/// Registration order is preserved; schema builders and the composed
/// system prompt both iterate capabilities in that order so tool listings
/// are stable across requests.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn CapabilityPlugin>>,
    order: Vec<String>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry with the full note plugin set.
    ///
    /// The retrieval, structured-output, and web search services are
    /// optional; plugins that need an absent service stay registered and
    /// answer invocations with an explanatory error string.
    pub fn with_note_plugins(
        store: Arc<dyn NoteStore>,
        rag: Option<Arc<dyn RagService>>,
        structured: Option<Arc<dyn StructuredOutputService>>,
        search: Option<Arc<dyn SearchService>>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(NotesCrudPlugin::new(store.clone())));
        registry.register(Arc::new(NotesSearchPlugin::new(store.clone(), rag)));
        registry.register(Arc::new(NotesOrganizationPlugin::new(store.clone())));
        registry.register(Arc::new(NotesAnalysisPlugin::new(store, structured)));
        registry.register(Arc::new(WebSearchPlugin::new(search)));
        registry
    }

    /// Register a plugin under its capability id.
    ///
    /// Re-registering an id replaces the previous plugin. That is normal
    /// during test setup but almost certainly a bug in production wiring,
    /// so it is logged.
    pub fn register(&mut self, plugin: Arc<dyn CapabilityPlugin>) {
        let id = plugin.capability_id().to_string();
        if self.plugins.insert(id.clone(), plugin).is_some() {
            warn!(capability = %id, "replacing already-registered capability plugin");
        } else {
            self.order.push(id);
        }
    }

    pub fn get(&self, capability_id: &str) -> Option<Arc<dyn CapabilityPlugin>> {
        self.plugins.get(capability_id).cloned()
    }

    pub fn contains(&self, capability_id: &str) -> bool {
        self.plugins.contains_key(capability_id)
    }

    /// Capability ids in registration order
    pub fn capability_ids(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Compose the system prompt additions of the enabled capabilities.
    ///
    /// Non-empty additions are joined with blank lines, in registration
    /// order. Ids that are not registered are skipped; prompt composition
    /// runs on every request and an unknown id there is a configuration
    /// issue, not a turn-stopping failure.
    pub fn compose_system_prompt(&self, enabled: &[&str], ctx: &RequestContext) -> String {
        self.order
            .iter()
            .filter(|id| enabled.contains(&id.as_str()))
            .filter_map(|id| self.plugins.get(id))
            .map(|plugin| plugin.system_prompt_addition(ctx))
            .filter(|addition| !addition.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use secondbrain_core::OperationDef;
    use serde_json::Value;

    struct StubPlugin {
        id: &'static str,
        prompt: &'static str,
    }

    #[async_trait]
    impl CapabilityPlugin for StubPlugin {
        fn capability_id(&self) -> &'static str {
            self.id
        }

        fn display_name(&self) -> &'static str {
            "Stub"
        }

        fn description(&self) -> &'static str {
            "Stub plugin for registry tests"
        }

        fn operations(&self) -> Vec<OperationDef> {
            vec![]
        }

        fn system_prompt_addition(&self, _ctx: &RequestContext) -> String {
            self.prompt.to_string()
        }

        async fn invoke(&self, _operation: &str, _ctx: &RequestContext, _args: Value) -> String {
            String::new()
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(StubPlugin { id: "alpha", prompt: "" }));

        assert!(registry.contains("alpha"));
        assert!(!registry.contains("beta"));
        assert_eq!(registry.get("alpha").unwrap().capability_id(), "alpha");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_capability_ids_preserve_registration_order() {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(StubPlugin { id: "zeta", prompt: "" }));
        registry.register(Arc::new(StubPlugin { id: "alpha", prompt: "" }));

        assert_eq!(registry.capability_ids(), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_reregistration_replaces_without_duplicating_order() {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(StubPlugin { id: "alpha", prompt: "first" }));
        registry.register(Arc::new(StubPlugin { id: "alpha", prompt: "second" }));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.capability_ids(), vec!["alpha"]);
        let ctx = RequestContext::anonymous();
        assert_eq!(registry.compose_system_prompt(&["alpha"], &ctx), "second");
    }

    #[test]
    fn test_compose_system_prompt_joins_enabled_in_order() {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(StubPlugin { id: "a", prompt: "First guidance." }));
        registry.register(Arc::new(StubPlugin { id: "b", prompt: "" }));
        registry.register(Arc::new(StubPlugin { id: "c", prompt: "Third guidance." }));

        let ctx = RequestContext::anonymous();
        let prompt = registry.compose_system_prompt(&["c", "a", "b"], &ctx);
        assert_eq!(prompt, "First guidance.\n\nThird guidance.");
    }

    #[test]
    fn test_compose_system_prompt_skips_unknown_ids() {
        let mut registry = PluginRegistry::new();
        registry.register(Arc::new(StubPlugin { id: "a", prompt: "Only guidance." }));

        let ctx = RequestContext::anonymous();
        assert_eq!(
            registry.compose_system_prompt(&["missing", "a"], &ctx),
            "Only guidance."
        );
    }

    #[test]
    fn test_with_note_plugins_registers_all_capabilities() {
        let store = Arc::new(secondbrain_notes::MemoryNoteStore::new());
        let registry = PluginRegistry::with_note_plugins(store, None, None, None);

        assert_eq!(
            registry.capability_ids(),
            vec![
                "notes-crud",
                "notes-search",
                "notes-organization",
                "notes-analysis",
                "web-search",
            ]
        );
    }
}
