//! Note analysis capability: model-assisted summaries, tag suggestions,
//! and note comparison.
//!
//! These operations call back into a language model through the
//! structured-output service, with a JSON schema constraining the answer
//! shape. Without the service the capability stays registered but every
//! operation explains that analysis is unavailable.

use crate::capability::CapabilityPlugin;
use crate::plugins::{fetch_owned_note, require_str, require_user};
use async_trait::async_trait;
use secondbrain_core::{OperationDef, ParamSpec, ParamType, RequestContext};
use secondbrain_notes::{NoteStore, StructuredOutputService};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct NotesAnalysisPlugin {
    store: Arc<dyn NoteStore>,
    structured: Option<Arc<dyn StructuredOutputService>>,
}

impl NotesAnalysisPlugin {
    pub fn new(
        store: Arc<dyn NoteStore>,
        structured: Option<Arc<dyn StructuredOutputService>>,
    ) -> Self {
        Self { store, structured }
    }

    fn service(&self) -> Result<&Arc<dyn StructuredOutputService>, String> {
        self.structured.as_ref().ok_or_else(|| {
            "Error: AI analysis is not available. The structured-output service is not configured."
                .to_string()
        })
    }

    async fn summarize_note(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "summarize a note")?;
        let note_id = require_str(args, "note_id")?;
        let service = self.service()?;
        let note = fetch_owned_note(self.store.as_ref(), note_id, user_id).await?;
        if note.content.trim().is_empty() {
            return Err(format!("Error: Note '{}' has no content to summarize.", note.title));
        }

        let prompt = format!(
            "Summarize the following note in two or three sentences.\n\nTitle: {}\n\n{}",
            note.title, note.content
        );
        let schema = json!({
            "type": "object",
            "properties": {
                "summary": { "type": "string" }
            },
            "required": ["summary"]
        });

        let output = service
            .generate(&prompt, schema)
            .await
            .map_err(|e| format!("Error summarizing note {note_id}: {e}"))?;
        let summary = output
            .get("summary")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("Error summarizing note {note_id}: model returned no summary."))?;

        Ok(format!("Summary of '{}': {summary}", note.title))
    }

    async fn suggest_tags(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "suggest tags")?;
        let note_id = require_str(args, "note_id")?;
        let service = self.service()?;
        let note = fetch_owned_note(self.store.as_ref(), note_id, user_id).await?;

        let prompt = format!(
            "Suggest up to five short lowercase tags for the following note. \
             Existing tags: {}.\n\nTitle: {}\n\n{}",
            if note.tags.is_empty() { "none".to_string() } else { note.tags.join(", ") },
            note.title,
            note.content
        );
        let schema = json!({
            "type": "object",
            "properties": {
                "tags": {
                    "type": "array",
                    "items": { "type": "string" },
                    "maxItems": 5
                }
            },
            "required": ["tags"]
        });

        let output = service
            .generate(&prompt, schema)
            .await
            .map_err(|e| format!("Error suggesting tags for note {note_id}: {e}"))?;
        let tags: Vec<&str> = output
            .get("tags")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        if tags.is_empty() {
            return Err(format!(
                "Error suggesting tags for note {note_id}: model returned no tags."
            ));
        }

        Ok(format!(
            "Suggested tags for '{}': {}. Use add_tags to apply any of them.",
            note.title,
            tags.join(", ")
        ))
    }

    async fn compare_notes(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "compare notes")?;
        let first_id = require_str(args, "first_note_id")?;
        let second_id = require_str(args, "second_note_id")?;
        if first_id == second_id {
            return Err("Error: compare_notes needs two different notes.".to_string());
        }
        let service = self.service()?;

        let first = fetch_owned_note(self.store.as_ref(), first_id, user_id).await?;
        let second = fetch_owned_note(self.store.as_ref(), second_id, user_id).await?;

        let prompt = format!(
            "Compare these two notes. Describe what they have in common and how they differ.\n\n\
             Note 1, '{}':\n{}\n\nNote 2, '{}':\n{}",
            first.title, first.content, second.title, second.content
        );
        let schema = json!({
            "type": "object",
            "properties": {
                "similarities": { "type": "string" },
                "differences": { "type": "string" }
            },
            "required": ["similarities", "differences"]
        });

        let output = service
            .generate(&prompt, schema)
            .await
            .map_err(|e| format!("Error comparing notes: {e}"))?;
        let (Some(similarities), Some(differences)) = (
            output.get("similarities").and_then(Value::as_str),
            output.get("differences").and_then(Value::as_str),
        ) else {
            return Err("Error comparing notes: model returned an incomplete comparison.".to_string());
        };

        Ok(format!(
            "Comparing '{}' and '{}'.\nIn common: {similarities}\nDifferences: {differences}",
            first.title, second.title
        ))
    }
}

#[async_trait]
impl CapabilityPlugin for NotesAnalysisPlugin {
    fn capability_id(&self) -> &'static str {
        "notes-analysis"
    }

    fn display_name(&self) -> &'static str {
        "Note Analysis"
    }

    fn description(&self) -> &'static str {
        "Summarize notes, suggest tags, and compare two notes"
    }

    fn operations(&self) -> Vec<OperationDef> {
        vec![
            OperationDef::new("summarize_note", "Summarize a note's content in a few sentences")
                .param(ParamSpec::required("note_id", ParamType::String, "Id of the note")),
            OperationDef::new(
                "suggest_tags",
                "Suggest tags for a note based on its title and content",
            )
            .param(ParamSpec::required("note_id", ParamType::String, "Id of the note")),
            OperationDef::new(
                "compare_notes",
                "Compare two notes and describe their similarities and differences",
            )
            .param(ParamSpec::required(
                "first_note_id",
                ParamType::String,
                "Id of the first note",
            ))
            .param(ParamSpec::required(
                "second_note_id",
                ParamType::String,
                "Id of the second note",
            )),
        ]
    }

    fn system_prompt_addition(&self, _ctx: &RequestContext) -> String {
        "You can analyze notes: summarize one, suggest tags for one, or compare \
         two. Suggested tags are only applied when the user asks."
            .to_string()
    }

    async fn invoke(&self, operation: &str, ctx: &RequestContext, args: Value) -> String {
        let result = match operation {
            "summarize_note" => self.summarize_note(ctx, &args).await,
            "suggest_tags" => self.suggest_tags(ctx, &args).await,
            "compare_notes" => self.compare_notes(ctx, &args).await,
            other => Err(format!(
                "Error: unknown operation '{other}' for capability 'notes-analysis'."
            )),
        };
        result.unwrap_or_else(|e| e)
    }
}
