//! End-to-end flow: build a tool set from the full plugin registry and
//! drive it the way an agent loop would, through model-shaped tool calls.

use async_trait::async_trait;
use secondbrain_core::{Provider, RequestContext, ToolCall};
use secondbrain_notes::{MemoryNoteStore, RagError, RagService, ScoredChunk};
use secondbrain_tools::{PluginRegistry, ToolSet, ToolSetBuilder};
use serde_json::{json, Value};
use std::sync::Arc;

/// Retrieval backend that never finds anything
struct EmptyRag;

#[async_trait]
impl RagService for EmptyRag {
    async fn retrieve_context(
        &self,
        _query: &str,
        _user_id: &str,
        _top_k: usize,
        _similarity_threshold: f32,
    ) -> Result<Vec<ScoredChunk>, RagError> {
        Ok(vec![])
    }
}

fn registry() -> PluginRegistry {
    PluginRegistry::with_note_plugins(Arc::new(MemoryNoteStore::new()), None, None, None)
}

fn tool_set(registry: &PluginRegistry, provider: Provider) -> ToolSet {
    ToolSetBuilder::new(registry)
        .capabilities([
            "notes-crud",
            "notes-search",
            "notes-organization",
            "notes-analysis",
            "web-search",
        ])
        .build(provider)
        .expect("tool names are collision-free")
}

fn extract_id(confirmation: &str) -> String {
    let start = confirmation.find("(id: ").unwrap() + 5;
    let end = confirmation.rfind(')').unwrap();
    confirmation[start..end].to_string()
}

#[tokio::test]
async fn test_grocery_note_conversation() {
    let registry = registry();
    let set = tool_set(&registry, Provider::Anthropic);
    let ctx = RequestContext::for_user("user-1");

    // "Create a note called Groceries with milk in it"
    let out = set
        .dispatch
        .dispatch(&ctx, "create_note", json!({"title": "Groceries", "content": "milk"}))
        .await;
    assert!(out.starts_with("Created note 'Groceries'"));
    let id = extract_id(&out);

    // "Add eggs to my groceries note"
    let out = set
        .dispatch
        .dispatch(&ctx, "append_to_note", json!({"note_id": id, "content": "eggs"}))
        .await;
    assert!(out.starts_with("Appended to note 'Groceries'"));

    // "What's on my grocery list?"
    let out = set
        .dispatch
        .dispatch(&ctx, "get_note", json!({"note_id": id}))
        .await;
    let payload: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(payload["note"]["content"], "milk\neggs");

    // "Show me all my notes" - the preview is the first paragraph, no ellipsis
    let out = set.dispatch.dispatch(&ctx, "list_all_notes", json!({})).await;
    let payload: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(payload["notes"][0]["preview"], "milk");
}

#[tokio::test]
async fn test_tool_call_batch_round_trip() {
    let registry = registry();
    let set = tool_set(&registry, Provider::OpenAi);
    let ctx = RequestContext::for_user("user-1");

    let out = set
        .dispatch
        .dispatch(&ctx, "create_note", json!({"title": "Ideas", "tags": "brainstorm"}))
        .await;
    let id = extract_id(&out);

    let calls = vec![
        ToolCall::new("call_1".to_string(), "list_tags".to_string(), json!({})),
        ToolCall::new(
            "call_2".to_string(),
            "find_notes_by_tag".to_string(),
            json!({"tag": "brainstorm"}),
        ),
        ToolCall::new(
            "call_3".to_string(),
            "get_note".to_string(),
            json!({"note_id": id}),
        ),
    ];
    let results = set.dispatch.dispatch_parallel(&ctx, &calls).await;

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| !r.is_error));
    let tags: Value = serde_json::from_str(&results[0].content).unwrap();
    assert_eq!(tags["tags"], json!(["brainstorm"]));
    let by_tag: Value = serde_json::from_str(&results[1].content).unwrap();
    assert_eq!(by_tag["notes"][0]["title"], "Ideas");
}

#[tokio::test]
async fn test_model_mistakes_become_retryable_messages() {
    let registry = registry();
    let set = tool_set(&registry, Provider::Gemini);
    let ctx = RequestContext::for_user("user-1");

    // Hallucinated tool name
    let out = set.dispatch.dispatch(&ctx, "make_note", json!({})).await;
    assert!(out.starts_with("Error: unknown tool 'make_note'"));
    assert!(out.contains("create_note"));

    // Forgotten required argument, with the template to retry with
    let out = set.dispatch.dispatch(&ctx, "create_note", json!({})).await;
    assert!(out.starts_with("Error: missing required argument(s) 'title'"));
    assert!(out.contains("\"title\": <string>"));

    // Wrong argument type
    let out = set
        .dispatch
        .dispatch(&ctx, "create_note", json!({"title": 42}))
        .await;
    assert!(out.starts_with("Error: invalid arguments for 'create_note'"));
}

#[tokio::test]
async fn test_unconfigured_services_degrade_per_operation() {
    // Registry built with no retrieval, analysis, or web services
    let registry = registry();
    let set = tool_set(&registry, Provider::Ollama);
    let ctx = RequestContext::for_user("user-1");

    let out = set
        .dispatch
        .dispatch(&ctx, "semantic_search_notes", json!({"query": "anything"}))
        .await;
    assert!(out.contains("Use search_notes instead"));

    let out = set
        .dispatch
        .dispatch(&ctx, "web_search", json!({"query": "anything"}))
        .await;
    assert!(out.contains("Web search is not available"));

    // Keyword search still works
    let out = set
        .dispatch
        .dispatch(&ctx, "search_notes", json!({"query": "anything"}))
        .await;
    assert!(!out.starts_with("Error"));
}

#[test]
fn test_every_provider_advertises_exactly_the_dispatchable_tools() {
    let registry = registry();
    for provider in Provider::all() {
        let set = tool_set(&registry, provider);

        let declared: Vec<String> = match provider {
            Provider::Gemini => set.declarations[0]["functionDeclarations"]
                .as_array()
                .unwrap()
                .iter()
                .map(|d| d["name"].as_str().unwrap().to_string())
                .collect(),
            Provider::Anthropic => set
                .declarations
                .as_array()
                .unwrap()
                .iter()
                .map(|d| d["name"].as_str().unwrap().to_string())
                .collect(),
            Provider::OpenAi | Provider::Ollama => set
                .declarations
                .as_array()
                .unwrap()
                .iter()
                .map(|d| d["function"]["name"].as_str().unwrap().to_string())
                .collect(),
        };

        let routable: Vec<String> = set.tool_names().into_iter().map(String::from).collect();
        assert_eq!(declared, routable, "mismatch for {provider}");
    }
}

#[test]
fn test_system_prompt_reflects_rag_toggle() {
    let registry = PluginRegistry::with_note_plugins(
        Arc::new(MemoryNoteStore::new()),
        Some(Arc::new(EmptyRag)),
        None,
        None,
    );
    let enabled = ["notes-crud", "notes-search"];

    let with_rag = registry.compose_system_prompt(&enabled, &RequestContext::for_user("u1"));
    let without_rag = registry.compose_system_prompt(
        &enabled,
        &RequestContext::for_user("u1").without_rag(),
    );

    assert!(with_rag.contains("manage the user's personal notes"));
    assert_ne!(with_rag, without_rag);
}

#[tokio::test]
async fn test_users_cannot_reach_each_others_notes() {
    let registry = registry();
    let set = tool_set(&registry, Provider::Anthropic);

    let alice = RequestContext::for_user("alice");
    let bob = RequestContext::for_user("bob");

    let out = set
        .dispatch
        .dispatch(&alice, "create_note", json!({"title": "Diary", "content": "private"}))
        .await;
    let id = extract_id(&out);

    let out = set
        .dispatch
        .dispatch(&bob, "get_note", json!({"note_id": id}))
        .await;
    assert!(out.starts_with("Error: Permission denied"));

    let out = set.dispatch.dispatch(&bob, "list_all_notes", json!({})).await;
    let payload: Value = serde_json::from_str(&out).unwrap();
    assert!(payload["notes"].as_array().unwrap().is_empty());
}
