//! Tagged result envelopes for structured tool output.
//!
//! Read operations return JSON so the calling model can parse structured
//! fields; the envelope always carries a `type` discriminator and a
//! natural-language `message`. Mutations return plain confirmation
//! strings and skip the envelope entirely.

use secondbrain_notes::{content_preview, Note, SearchHit};
use serde::{Deserialize, Serialize};

/// Bounded view of a note used by list/search results.
///
/// Carries a preview instead of full content; full content is only
/// available through `get_note`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotePreview {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl NotePreview {
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id.0.clone(),
            title: note.title.clone(),
            preview: content_preview(&note.content),
            tags: note.tags.clone(),
            folder: note.folder.clone(),
            created_at: note.created_at.clone(),
            updated_at: note.updated_at.clone(),
        }
    }
}

/// Full view of a note, returned only by `get_note`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl NoteView {
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id.0.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            tags: note.tags.clone(),
            folder: note.folder.clone(),
            created_at: note.created_at.clone(),
            updated_at: note.updated_at.clone(),
        }
    }
}

/// A semantic search hit: a note preview with its top similarity score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticHit {
    #[serde(flatten)]
    pub note: NotePreview,
    pub score: f32,
}

/// The closed set of structured tool results.
///
/// Serialized with a `type` tag so the model (and tests) can branch on
/// the payload shape while still reading `message` as a summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolPayload {
    Notes {
        message: String,
        notes: Vec<NotePreview>,
    },
    Note {
        message: String,
        note: NoteView,
    },
    Tags {
        message: String,
        tags: Vec<String>,
    },
    Folders {
        message: String,
        folders: Vec<String>,
    },
    SearchResults {
        message: String,
        results: Vec<SemanticHit>,
    },
    WebResults {
        message: String,
        results: Vec<SearchHit>,
    },
}

impl ToolPayload {
    /// Serialize for the conversation
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!("Error serializing tool result: {e}"))
    }
}
