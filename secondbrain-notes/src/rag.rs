//! Retrieval-augmented search abstraction.
//!
//! The retrieval engine itself lives outside this workspace; plugins
//! consume it through [`RagService`]. Retrieval returns scored chunks,
//! several of which may come from the same note. [`dedupe_by_note`]
//! collapses those to the best chunk per note.

use crate::types::NoteId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A scored chunk of note content returned by retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Note the chunk was taken from
    pub note_id: NoteId,
    /// Chunk text
    pub text: String,
    /// Similarity score in [0, 1]
    pub score: f32,
}

/// Errors from the retrieval backend
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("Retrieval failed: {0}")]
    Retrieval(String),
}

/// Vector retrieval over a user's note chunks
#[async_trait]
pub trait RagService: Send + Sync {
    /// Retrieve the `top_k` chunks most similar to `query`, restricted to
    /// `user_id`'s notes and to scores at or above `similarity_threshold`.
    async fn retrieve_context(
        &self,
        query: &str,
        user_id: &str,
        top_k: usize,
        similarity_threshold: f32,
    ) -> Result<Vec<ScoredChunk>, RagError>;
}

/// Collapse retrieval results to one chunk per note, keeping the
/// highest-scoring chunk. The result is sorted by score, descending.
pub fn dedupe_by_note(chunks: Vec<ScoredChunk>) -> Vec<ScoredChunk> {
    let mut best: HashMap<String, ScoredChunk> = HashMap::new();
    for chunk in chunks {
        match best.get(&chunk.note_id.0) {
            Some(existing) if existing.score >= chunk.score => {}
            _ => {
                best.insert(chunk.note_id.0.clone(), chunk);
            }
        }
    }
    let mut result: Vec<ScoredChunk> = best.into_values().collect();
    result.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    result
}
