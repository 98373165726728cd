//! In-memory note store
//!
//! [`MemoryNoteStore`] keeps notes in a mutex-guarded map. It backs the
//! plugin tests and works as a real store for single-process use.

use crate::store::NoteStore;
use crate::types::{NewNote, Note, NoteError, NoteId, NoteUpdate};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Thread-safe in-memory note store
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: Mutex<HashMap<String, Note>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notes currently stored
    pub fn len(&self) -> usize {
        self.notes.lock().expect("note store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Note>, NoteError> {
        let notes = self.notes.lock().expect("note store lock poisoned");
        let mut result: Vec<Note> = notes
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        // UUID v7 ids are time-ordered, so this is creation order
        result.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(result)
    }

    async fn get(&self, id: &NoteId) -> Result<Option<Note>, NoteError> {
        let notes = self.notes.lock().expect("note store lock poisoned");
        Ok(notes.get(&id.0).cloned())
    }

    async fn create(&self, note: NewNote) -> Result<Note, NoteError> {
        let now = chrono::Utc::now().to_rfc3339();
        let new_note = Note {
            id: NoteId::new(),
            user_id: note.user_id,
            title: note.title,
            content: note.content,
            tags: note.tags,
            folder: note.folder,
            created_at: now.clone(),
            updated_at: now,
        };

        let mut notes = self.notes.lock().expect("note store lock poisoned");
        notes.insert(new_note.id.0.clone(), new_note.clone());
        Ok(new_note)
    }

    async fn update(&self, id: &NoteId, update: NoteUpdate) -> Result<Note, NoteError> {
        let mut notes = self.notes.lock().expect("note store lock poisoned");
        let note = notes
            .get_mut(&id.0)
            .ok_or_else(|| NoteError::NotFound(id.0.clone()))?;

        if let Some(title) = update.title {
            note.title = title;
        }
        if let Some(content) = update.content {
            note.content = content;
        }
        if let Some(tags) = update.tags {
            note.tags = tags;
        }
        if let Some(folder) = update.folder {
            note.folder = folder;
        }

        note.updated_at = chrono::Utc::now().to_rfc3339();
        Ok(note.clone())
    }

    async fn delete(&self, id: &NoteId) -> Result<(), NoteError> {
        let mut notes = self.notes.lock().expect("note store lock poisoned");
        notes
            .remove(&id.0)
            .ok_or_else(|| NoteError::NotFound(id.0.clone()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_note(user: &str, title: &str, content: &str) -> NewNote {
        NewNote {
            user_id: user.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryNoteStore::new();

        let created = store
            .create(new_note("user-1", "Groceries", "milk"))
            .await
            .unwrap();
        assert_eq!(created.title, "Groceries");
        assert_eq!(created.user_id, "user-1");
        assert!(!created.created_at.is_empty());

        let fetched = store.get(&created.id).await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().content, "milk");
    }

    #[tokio::test]
    async fn test_list_for_user_scopes_by_owner() {
        let store = MemoryNoteStore::new();

        store.create(new_note("alice", "A1", "")).await.unwrap();
        store.create(new_note("alice", "A2", "")).await.unwrap();
        store.create(new_note("bob", "B1", "")).await.unwrap();

        let alice_notes = store.list_for_user("alice").await.unwrap();
        assert_eq!(alice_notes.len(), 2);
        assert!(alice_notes.iter().all(|n| n.user_id == "alice"));

        let bob_notes = store.list_for_user("bob").await.unwrap();
        assert_eq!(bob_notes.len(), 1);
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let store = MemoryNoteStore::new();
        let created = store
            .create(new_note("user-1", "Original", "body"))
            .await
            .unwrap();

        let updated = store
            .update(
                &created.id,
                NoteUpdate {
                    title: Some("Updated".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Updated");
        assert_eq!(updated.content, "body"); // unchanged
    }

    #[tokio::test]
    async fn test_update_clears_folder() {
        let store = MemoryNoteStore::new();
        let created = store
            .create(NewNote {
                user_id: "user-1".to_string(),
                title: "Filed".to_string(),
                content: String::new(),
                tags: vec![],
                folder: Some("work".to_string()),
            })
            .await
            .unwrap();

        let updated = store
            .update(
                &created.id,
                NoteUpdate {
                    folder: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.folder.is_none());
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let store = MemoryNoteStore::new();
        let result = store
            .update(&NoteId::from_string("nonexistent"), NoteUpdate::default())
            .await;
        assert!(matches!(result, Err(NoteError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryNoteStore::new();
        let created = store
            .create(new_note("user-1", "To delete", ""))
            .await
            .unwrap();

        store.delete(&created.id).await.unwrap();
        assert!(store.get(&created.id).await.unwrap().is_none());

        let result = store.delete(&created.id).await;
        assert!(matches!(result, Err(NoteError::NotFound(_))));
    }
}
