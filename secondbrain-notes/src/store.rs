//! Note store trait for persisting notes
//!
//! This module defines the [`NoteStore`] trait that abstracts over
//! different storage backends for notes. Implementations must be safe for
//! concurrent access; every tool invocation runs as an independent async
//! operation against the same store.

use super::types::{NewNote, Note, NoteError, NoteId, NoteUpdate};
use async_trait::async_trait;

/// Trait for note storage backends
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// List all notes belonging to a user
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Note>, NoteError>;

    /// Get a single note by ID
    ///
    /// Returns `Ok(None)` if the note does not exist. Ownership checks are
    /// the caller's responsibility; the store is user-agnostic.
    async fn get(&self, id: &NoteId) -> Result<Option<Note>, NoteError>;

    /// Create a new note
    ///
    /// Returns the created note with generated ID and timestamps.
    async fn create(&self, note: NewNote) -> Result<Note, NoteError>;

    /// Update an existing note
    ///
    /// # Errors
    /// Returns `NoteError::NotFound` if the note does not exist
    async fn update(&self, id: &NoteId, update: NoteUpdate) -> Result<Note, NoteError>;

    /// Delete a note by ID
    ///
    /// # Errors
    /// Returns `NoteError::NotFound` if the note does not exist
    async fn delete(&self, id: &NoteId) -> Result<(), NoteError>;
}
