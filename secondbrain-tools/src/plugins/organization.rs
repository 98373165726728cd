//! Note organization capability: tags and folders.

use crate::capability::CapabilityPlugin;
use crate::envelope::ToolPayload;
use crate::plugins::{fetch_owned_note, require_str, require_user};
use async_trait::async_trait;
use secondbrain_core::{OperationDef, ParamSpec, ParamType, RequestContext};
use secondbrain_notes::{parse_tags, NoteStore, NoteUpdate};
use serde_json::Value;
use std::sync::Arc;

/// Tagging and folder operations over the user's notes
pub struct NotesOrganizationPlugin {
    store: Arc<dyn NoteStore>,
}

impl NotesOrganizationPlugin {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    async fn add_tags(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "tag a note")?;
        let note_id = require_str(args, "note_id")?;
        let new_tags = parse_tags(require_str(args, "tags")?);
        if new_tags.is_empty() {
            return Err("Error: 'tags' contained no usable tags.".to_string());
        }

        let note = fetch_owned_note(self.store.as_ref(), note_id, user_id).await?;
        let mut tags = note.tags;
        for tag in new_tags {
            // Case-insensitive merge; the first spelling of a tag wins
            if !secondbrain_notes::tags_contain(&tags, &tag) {
                tags.push(tag);
            }
        }

        let updated = self
            .store
            .update(
                &note.id,
                NoteUpdate {
                    tags: Some(tags),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| format!("Error tagging note {note_id}: {e}"))?;

        Ok(format!(
            "Updated tags for note '{}'. Tags are now: {}.",
            updated.title,
            updated.tags.join(", ")
        ))
    }

    async fn remove_tags(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "untag a note")?;
        let note_id = require_str(args, "note_id")?;
        let to_remove: Vec<String> = parse_tags(require_str(args, "tags")?)
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect();
        if to_remove.is_empty() {
            return Err("Error: 'tags' contained no usable tags.".to_string());
        }

        let note = fetch_owned_note(self.store.as_ref(), note_id, user_id).await?;
        let tags: Vec<String> = note
            .tags
            .into_iter()
            .filter(|t| !to_remove.contains(&t.to_lowercase()))
            .collect();

        let updated = self
            .store
            .update(
                &note.id,
                NoteUpdate {
                    tags: Some(tags),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| format!("Error untagging note {note_id}: {e}"))?;

        Ok(if updated.tags.is_empty() {
            format!("Updated tags for note '{}'. It has no tags now.", updated.title)
        } else {
            format!(
                "Updated tags for note '{}'. Tags are now: {}.",
                updated.title,
                updated.tags.join(", ")
            )
        })
    }

    async fn list_tags(&self, ctx: &RequestContext) -> Result<String, String> {
        let user_id = require_user(ctx, "list tags")?;
        let notes = self
            .store
            .list_for_user(user_id)
            .await
            .map_err(|e| format!("Error listing tags: {e}"))?;

        // Distinct case-insensitively, keeping the first spelling seen
        let mut seen: Vec<String> = Vec::new();
        let mut tags: Vec<String> = Vec::new();
        for note in &notes {
            for tag in &note.tags {
                let lower = tag.to_lowercase();
                if !seen.contains(&lower) {
                    seen.push(lower);
                    tags.push(tag.clone());
                }
            }
        }
        tags.sort_by_key(|t| t.to_lowercase());

        Ok(ToolPayload::Tags {
            message: match tags.len() {
                0 => "No tags are in use.".to_string(),
                1 => "1 tag is in use.".to_string(),
                n => format!("{n} tags are in use."),
            },
            tags,
        }
        .to_json())
    }

    async fn move_to_folder(&self, ctx: &RequestContext, args: &Value) -> Result<String, String> {
        let user_id = require_user(ctx, "move a note")?;
        let note_id = require_str(args, "note_id")?;
        let folder = require_str(args, "folder")?;

        let note = fetch_owned_note(self.store.as_ref(), note_id, user_id).await?;
        let updated = self
            .store
            .update(
                &note.id,
                NoteUpdate {
                    folder: Some(Some(folder.to_string())),
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| format!("Error moving note {note_id}: {e}"))?;

        Ok(format!("Moved note '{}' to folder '{folder}'.", updated.title))
    }

    async fn list_folders(&self, ctx: &RequestContext) -> Result<String, String> {
        let user_id = require_user(ctx, "list folders")?;
        let notes = self
            .store
            .list_for_user(user_id)
            .await
            .map_err(|e| format!("Error listing folders: {e}"))?;

        let mut folders: Vec<String> = notes.iter().filter_map(|n| n.folder.clone()).collect();
        folders.sort();
        folders.dedup();

        Ok(ToolPayload::Folders {
            message: match folders.len() {
                0 => "No folders are in use.".to_string(),
                1 => "1 folder is in use.".to_string(),
                n => format!("{n} folders are in use."),
            },
            folders,
        }
        .to_json())
    }
}

#[async_trait]
impl CapabilityPlugin for NotesOrganizationPlugin {
    fn capability_id(&self) -> &'static str {
        "notes-organization"
    }

    fn display_name(&self) -> &'static str {
        "Note Organization"
    }

    fn description(&self) -> &'static str {
        "Tag notes, file them into folders, and browse tags and folders"
    }

    fn operations(&self) -> Vec<OperationDef> {
        vec![
            OperationDef::new(
                "add_tags",
                "Add tags to a note, keeping its existing tags",
            )
            .param(ParamSpec::required("note_id", ParamType::String, "Id of the note"))
            .param(ParamSpec::required(
                "tags",
                ParamType::String,
                "Comma-separated tags to add",
            )),
            OperationDef::new(
                "remove_tags",
                "Remove tags from a note (case-insensitive match)",
            )
            .param(ParamSpec::required("note_id", ParamType::String, "Id of the note"))
            .param(ParamSpec::required(
                "tags",
                ParamType::String,
                "Comma-separated tags to remove",
            )),
            OperationDef::new("list_tags", "List all tags used across the user's notes"),
            OperationDef::new("move_to_folder", "File a note into a folder")
                .param(ParamSpec::required("note_id", ParamType::String, "Id of the note"))
                .param(ParamSpec::required(
                    "folder",
                    ParamType::String,
                    "Destination folder name",
                )),
            OperationDef::new("list_folders", "List all folders used across the user's notes"),
        ]
    }

    fn system_prompt_addition(&self, _ctx: &RequestContext) -> String {
        "You can organize the user's notes with tags and folders. Tags are \
         case-insensitive for matching but keep the spelling the user chose."
            .to_string()
    }

    async fn invoke(&self, operation: &str, ctx: &RequestContext, args: Value) -> String {
        let result = match operation {
            "add_tags" => self.add_tags(ctx, &args).await,
            "remove_tags" => self.remove_tags(ctx, &args).await,
            "list_tags" => self.list_tags(ctx).await,
            "move_to_folder" => self.move_to_folder(ctx, &args).await,
            "list_folders" => self.list_folders(ctx).await,
            other => Err(format!(
                "Error: unknown operation '{other}' for capability 'notes-organization'."
            )),
        };
        result.unwrap_or_else(|e| e)
    }
}
