//! Note types
//!
//! This module defines the core types for the note domain including
//! [`Note`], [`NoteId`], [`NewNote`], and [`NoteUpdate`].

use serde::{Deserialize, Serialize};

/// Note ID - UUID v7 string for unique, time-ordered identification
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(pub String);

impl NoteId {
    /// Create a new NoteId with a generated UUID v7
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Create a NoteId from an existing string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NoteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A note in the knowledge base
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier for this note
    pub id: NoteId,
    /// Owning user; every by-id operation verifies this before acting
    pub user_id: String,
    /// Short title of the note
    pub title: String,
    /// Free-text body
    pub content: String,
    /// Tags for categorization (case preserved, compared case-insensitively)
    pub tags: Vec<String>,
    /// Optional folder the note is filed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    /// ISO 8601 timestamp when the note was created
    pub created_at: String,
    /// ISO 8601 timestamp when the note was last updated
    pub updated_at: String,
}

/// Input for creating a new note
#[derive(Clone, Debug, Default)]
pub struct NewNote {
    /// Owning user
    pub user_id: String,
    /// Short title of the note
    pub title: String,
    /// Free-text body
    pub content: String,
    /// Tags for categorization
    pub tags: Vec<String>,
    /// Optional folder
    pub folder: Option<String>,
}

/// Input for updating an existing note
#[derive(Clone, Debug, Default)]
pub struct NoteUpdate {
    /// New title (if Some)
    pub title: Option<String>,
    /// New content (if Some) - full replacement
    pub content: Option<String>,
    /// Replace all tags (if Some)
    pub tags: Option<Vec<String>>,
    /// Set the folder (if Some); `Some(None)` clears it
    pub folder: Option<Option<String>>,
}

/// Errors that can occur during note persistence
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    /// Note with the given ID was not found
    #[error("Note not found: {0}")]
    NotFound(String),
    /// Error occurred during storage operations
    #[error("Storage error: {0}")]
    Storage(String),
}
