//! Note CRUD capability: create, read, update, append, delete, duplicate,
//! and list.

use crate::capability::CapabilityPlugin;
use crate::envelope::{NotePreview, NoteView, ToolPayload};
use crate::plugins::{fetch_owned_note, opt_str, require_str, require_user};
use async_trait::async_trait;
use secondbrain_core::{OperationDef, ParamSpec, ParamType, RequestContext};
use secondbrain_notes::{parse_tags, NewNote, NoteStore, NoteUpdate};
use serde_json::Value;
use std::sync::Arc;

/// Basic note lifecycle operations
pub struct NotesCrudPlugin {
    store: Arc<dyn NoteStore>,
}

impl NotesCrudPlugin {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    async fn create_note(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "create a note")?;
        let title = require_str(args, "title")?;
        let content = args.get("content").and_then(Value::as_str).unwrap_or("");
        let tags = opt_str(args, "tags").map(parse_tags).unwrap_or_default();

        let note = self
            .store
            .create(NewNote {
                user_id: user_id.to_string(),
                title: title.to_string(),
                content: content.to_string(),
                tags,
                folder: opt_str(args, "folder").map(String::from),
            })
            .await
            .map_err(|e| format!("Error creating note: {e}"))?;

        Ok(format!("Created note '{}' (id: {}).", note.title, note.id))
    }

    async fn get_note(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "get a note")?;
        let note_id = require_str(args, "note_id")?;
        let note = fetch_owned_note(self.store.as_ref(), note_id, user_id).await?;

        Ok(ToolPayload::Note {
            message: format!("Retrieved note '{}'.", note.title),
            note: NoteView::from_note(&note),
        }
        .to_json())
    }

    async fn update_note(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "update a note")?;
        let note_id = require_str(args, "note_id")?;

        let title = opt_str(args, "title").map(String::from);
        let content = args
            .get("content")
            .and_then(Value::as_str)
            .map(String::from);
        let tags = opt_str(args, "tags").map(parse_tags);
        if title.is_none() && content.is_none() && tags.is_none() {
            return Err(
                "Error: update_note needs at least one of 'title', 'content', or 'tags'."
                    .to_string(),
            );
        }

        fetch_owned_note(self.store.as_ref(), note_id, user_id).await?;
        let note = self
            .store
            .update(
                &secondbrain_notes::NoteId::from_string(note_id),
                NoteUpdate {
                    title,
                    content,
                    tags,
                    folder: None,
                },
            )
            .await
            .map_err(|e| format!("Error updating note {note_id}: {e}"))?;

        Ok(format!("Updated note '{}' (id: {}).", note.title, note.id))
    }

    async fn append_to_note(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "append to a note")?;
        let note_id = require_str(args, "note_id")?;
        let addition = require_str(args, "content")?;

        let existing = fetch_owned_note(self.store.as_ref(), note_id, user_id).await?;
        let content = if existing.content.is_empty() {
            addition.to_string()
        } else {
            format!("{}\n{}", existing.content, addition)
        };

        let note = self
            .store
            .update(
                &existing.id,
                NoteUpdate {
                    content: Some(content),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| format!("Error appending to note {note_id}: {e}"))?;

        Ok(format!("Appended to note '{}' (id: {}).", note.title, note.id))
    }

    async fn delete_note(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "delete a note")?;
        let note_id = require_str(args, "note_id")?;

        let note = fetch_owned_note(self.store.as_ref(), note_id, user_id).await?;
        self.store
            .delete(&note.id)
            .await
            .map_err(|e| format!("Error deleting note {note_id}: {e}"))?;

        Ok(format!("Deleted note '{}' (id: {}).", note.title, note.id))
    }

    async fn duplicate_note(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "duplicate a note")?;
        let note_id = require_str(args, "note_id")?;

        let original = fetch_owned_note(self.store.as_ref(), note_id, user_id).await?;
        let copy = self
            .store
            .create(NewNote {
                user_id: user_id.to_string(),
                title: format!("Copy of {}", original.title),
                content: original.content,
                tags: original.tags,
                folder: original.folder,
            })
            .await
            .map_err(|e| format!("Error duplicating note {note_id}: {e}"))?;

        Ok(format!("Created note '{}' (id: {}).", copy.title, copy.id))
    }

    async fn list_all_notes(&self, ctx: &RequestContext) -> Result<String, String> {
        let user_id = require_user(ctx, "list notes")?;
        let notes = self
            .store
            .list_for_user(user_id)
            .await
            .map_err(|e| format!("Error listing notes: {e}"))?;

        let previews: Vec<NotePreview> = notes.iter().map(NotePreview::from_note).collect();
        Ok(ToolPayload::Notes {
            message: match previews.len() {
                0 => "You have no notes yet.".to_string(),
                1 => "Found 1 note.".to_string(),
                n => format!("Found {n} notes."),
            },
            notes: previews,
        }
        .to_json())
    }
}

#[async_trait]
impl CapabilityPlugin for NotesCrudPlugin {
    fn capability_id(&self) -> &'static str {
        "notes-crud"
    }

    fn display_name(&self) -> &'static str {
        "Note Management"
    }

    fn description(&self) -> &'static str {
        "Create, read, update, append to, duplicate, and delete personal notes"
    }

    fn operations(&self) -> Vec<OperationDef> {
        vec![
            OperationDef::new(
                "create_note",
                "Create a new note with a title and optional content and tags",
            )
            .param(ParamSpec::required("title", ParamType::String, "Title of the note"))
            .param(ParamSpec::optional(
                "content",
                ParamType::String,
                "Body text of the note",
            ))
            .param(ParamSpec::optional(
                "tags",
                ParamType::String,
                "Comma-separated tags, e.g. 'work, urgent'",
            ))
            .param(ParamSpec::optional(
                "folder",
                ParamType::String,
                "Folder to file the note under",
            )),
            OperationDef::new("get_note", "Get the full content of a note by its id").param(
                ParamSpec::required("note_id", ParamType::String, "Id of the note"),
            ),
            OperationDef::new(
                "update_note",
                "Update a note's title, content, or tags. Content and tags are replaced, not merged",
            )
            .param(ParamSpec::required("note_id", ParamType::String, "Id of the note"))
            .param(ParamSpec::optional("title", ParamType::String, "New title"))
            .param(ParamSpec::optional(
                "content",
                ParamType::String,
                "New body text, replacing the old content",
            ))
            .param(ParamSpec::optional(
                "tags",
                ParamType::String,
                "Comma-separated tags, replacing the old tags",
            )),
            OperationDef::new(
                "append_to_note",
                "Append text to the end of a note, keeping the existing content",
            )
            .param(ParamSpec::required("note_id", ParamType::String, "Id of the note"))
            .param(ParamSpec::required(
                "content",
                ParamType::String,
                "Text to append",
            )),
            OperationDef::new("delete_note", "Permanently delete a note by its id").param(
                ParamSpec::required("note_id", ParamType::String, "Id of the note"),
            ),
            OperationDef::new(
                "duplicate_note",
                "Create a copy of an existing note, titled 'Copy of <original title>'",
            )
            .param(ParamSpec::required("note_id", ParamType::String, "Id of the note")),
            OperationDef::new(
                "list_all_notes",
                "List all of the user's notes with content previews",
            ),
        ]
    }

    fn system_prompt_addition(&self, _ctx: &RequestContext) -> String {
        "You can manage the user's personal notes: create, read, update, append, \
         duplicate, and delete them. Note listings show previews only; use get_note \
         when you need a note's full content. Refer to notes by title when talking \
         to the user, never by raw id."
            .to_string()
    }

    async fn invoke(&self, operation: &str, ctx: &RequestContext, args: Value) -> String {
        let result = match operation {
            "create_note" => self.create_note(ctx, &args).await,
            "get_note" => self.get_note(ctx, &args).await,
            "update_note" => self.update_note(ctx, &args).await,
            "append_to_note" => self.append_to_note(ctx, &args).await,
            "delete_note" => self.delete_note(ctx, &args).await,
            "duplicate_note" => self.duplicate_note(ctx, &args).await,
            "list_all_notes" => self.list_all_notes(ctx).await,
            other => Err(format!(
                "Error: unknown operation '{other}' for capability 'notes-crud'."
            )),
        };
        result.unwrap_or_else(|e| e)
    }
}
