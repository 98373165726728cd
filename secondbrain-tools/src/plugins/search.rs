//! Note search capability: keyword, semantic, tag, and date search.

use crate::capability::CapabilityPlugin;
use crate::envelope::{NotePreview, SemanticHit, ToolPayload};
use crate::plugins::{opt_str, require_str, require_user};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secondbrain_core::{OperationDef, ParamSpec, ParamType, RequestContext};
use secondbrain_notes::{
    dedupe_by_note, parse_relative_date, tags_contain, Note, NoteStore, RagService,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Search over the user's notes.
///
/// Semantic search needs a retrieval backend; when none is wired in, the
/// operation stays declared and answers with a pointer to keyword search.
pub struct NotesSearchPlugin {
    store: Arc<dyn NoteStore>,
    rag: Option<Arc<dyn RagService>>,
}

impl NotesSearchPlugin {
    pub fn new(store: Arc<dyn NoteStore>, rag: Option<Arc<dyn RagService>>) -> Self {
        Self { store, rag }
    }

    async fn user_notes(&self, user_id: &str) -> Result<Vec<Note>, String> {
        self.store
            .list_for_user(user_id)
            .await
            .map_err(|e| format!("Error listing notes: {e}"))
    }

    async fn search_notes(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "search notes")?;
        let query = require_str(args, "query")?;
        let needle = query.to_lowercase();

        let matches: Vec<NotePreview> = self
            .user_notes(user_id)
            .await?
            .iter()
            .filter(|note| {
                note.title.to_lowercase().contains(&needle)
                    || note.content.to_lowercase().contains(&needle)
                    || note.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .map(NotePreview::from_note)
            .collect();

        Ok(ToolPayload::Notes {
            message: match matches.len() {
                0 => format!("No notes match '{query}'."),
                1 => format!("Found 1 note matching '{query}'."),
                n => format!("Found {n} notes matching '{query}'."),
            },
            notes: matches,
        }
        .to_json())
    }

    async fn semantic_search_notes(
        &self,
        ctx: &RequestContext,
        args: &Value,
    ) -> Result<String, String> {
        let user_id = require_user(ctx, "search notes")?;
        let query = require_str(args, "query")?;

        let Some(rag) = &self.rag else {
            return Err(
                "Error: Semantic search is not available. Use search_notes instead.".to_string(),
            );
        };
        if !ctx.rag_enabled {
            return Err(
                "Error: Semantic search is disabled for this request. Use search_notes instead."
                    .to_string(),
            );
        }

        let top_k = args
            .get("top_k")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(ctx.rag.top_k);
        let min_similarity = args
            .get("min_similarity")
            .and_then(Value::as_f64)
            .map(|n| n as f32)
            .unwrap_or(ctx.rag.similarity_threshold);

        let chunks = rag
            .retrieve_context(query, user_id, top_k, min_similarity)
            .await
            .map_err(|e| format!("Error during semantic search: {e}"))?;

        let mut hits = Vec::new();
        for chunk in dedupe_by_note(chunks) {
            match self.store.get(&chunk.note_id).await {
                Ok(Some(note)) if note.user_id == user_id => hits.push(SemanticHit {
                    note: NotePreview::from_note(&note),
                    score: chunk.score,
                }),
                Ok(_) => {
                    // Stale index entry; the note is gone or changed owner
                    warn!(note_id = %chunk.note_id, "retrieval returned an inaccessible note");
                }
                Err(e) => return Err(format!("Error fetching note {}: {e}", chunk.note_id)),
            }
        }

        Ok(ToolPayload::SearchResults {
            message: match hits.len() {
                0 => format!("No notes are semantically similar to '{query}'."),
                1 => format!("Found 1 relevant note for '{query}'."),
                n => format!("Found {n} relevant notes for '{query}'."),
            },
            results: hits,
        }
        .to_json())
    }

    async fn find_notes_by_tag(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "search notes")?;
        let tag = require_str(args, "tag")?;

        let matches: Vec<NotePreview> = self
            .user_notes(user_id)
            .await?
            .iter()
            .filter(|note| tags_contain(&note.tags, tag))
            .map(NotePreview::from_note)
            .collect();

        Ok(ToolPayload::Notes {
            message: match matches.len() {
                0 => format!("No notes are tagged '{tag}'."),
                1 => format!("Found 1 note tagged '{tag}'."),
                n => format!("Found {n} notes tagged '{tag}'."),
            },
            notes: matches,
        }
        .to_json())
    }

    async fn find_notes_by_date(
        &self,
        ctx: &RequestContext,
        args: &Value,
    ) -> Result<String, String> {
        let user_id = require_user(ctx, "search notes")?;

        let now = Utc::now();
        let after = opt_str(args, "created_after").map(|s| parse_relative_date(s, now));
        let before = opt_str(args, "created_before").map(|s| parse_relative_date(s, now));
        if after.is_none() && before.is_none() {
            return Err(
                "Error: find_notes_by_date needs 'created_after', 'created_before', or both."
                    .to_string(),
            );
        }

        let matches: Vec<NotePreview> = self
            .user_notes(user_id)
            .await?
            .iter()
            .filter(|note| {
                let Ok(created) = DateTime::parse_from_rfc3339(&note.created_at) else {
                    return false;
                };
                let created = created.with_timezone(&Utc);
                after.map_or(true, |bound| created >= bound)
                    && before.map_or(true, |bound| created <= bound)
            })
            .map(NotePreview::from_note)
            .collect();

        Ok(ToolPayload::Notes {
            message: match matches.len() {
                0 => "No notes were created in that period.".to_string(),
                1 => "Found 1 note created in that period.".to_string(),
                n => format!("Found {n} notes created in that period."),
            },
            notes: matches,
        }
        .to_json())
    }
}

#[async_trait]
impl CapabilityPlugin for NotesSearchPlugin {
    fn capability_id(&self) -> &'static str {
        "notes-search"
    }

    fn display_name(&self) -> &'static str {
        "Note Search"
    }

    fn description(&self) -> &'static str {
        "Find notes by keyword, meaning, tag, or creation date"
    }

    fn operations(&self) -> Vec<OperationDef> {
        vec![
            OperationDef::new(
                "search_notes",
                "Search notes by keyword over titles, content, and tags (case-insensitive)",
            )
            .param(ParamSpec::required("query", ParamType::String, "Search query")),
            OperationDef::new(
                "semantic_search_notes",
                "Find notes by meaning rather than exact keywords, ranked by similarity",
            )
            .param(ParamSpec::required(
                "query",
                ParamType::String,
                "What to look for, phrased naturally",
            ))
            .param(ParamSpec::optional(
                "top_k",
                ParamType::Integer,
                "Maximum number of notes to return",
            ))
            .param(ParamSpec::optional(
                "min_similarity",
                ParamType::Number,
                "Minimum similarity score between 0 and 1",
            )),
            OperationDef::new(
                "find_notes_by_tag",
                "List notes carrying a given tag (case-insensitive)",
            )
            .param(ParamSpec::required("tag", ParamType::String, "Tag to look for")),
            OperationDef::new(
                "find_notes_by_date",
                "List notes created in a date range. Dates may be natural expressions like \
                 'yesterday' or '3 days ago', or literal dates like '2024-01-15'",
            )
            .param(ParamSpec::optional(
                "created_after",
                ParamType::String,
                "Earliest creation date, inclusive",
            ))
            .param(ParamSpec::optional(
                "created_before",
                ParamType::String,
                "Latest creation date, inclusive",
            )),
        ]
    }

    fn system_prompt_addition(&self, ctx: &RequestContext) -> String {
        if ctx.rag_enabled && self.rag.is_some() {
            "You can search the user's notes. Prefer semantic_search_notes for \
             conceptual questions ('what did I write about databases?') and \
             search_notes for exact words or phrases. Tag and date search are \
             available for browsing."
                .to_string()
        } else {
            "You can search the user's notes by keyword with search_notes, and \
             browse them by tag or creation date."
                .to_string()
        }
    }

    async fn invoke(&self, operation: &str, ctx: &RequestContext, args: Value) -> String {
        let result = match operation {
            "search_notes" => self.search_notes(ctx, &args).await,
            "semantic_search_notes" => self.semantic_search_notes(ctx, &args).await,
            "find_notes_by_tag" => self.find_notes_by_tag(ctx, &args).await,
            "find_notes_by_date" => self.find_notes_by_date(ctx, &args).await,
            other => Err(format!(
                "Error: unknown operation '{other}' for capability 'notes-search'."
            )),
        };
        result.unwrap_or_else(|e| e)
    }
}
