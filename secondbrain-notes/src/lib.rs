//! secondbrain-notes - Note domain model and service abstractions
//!
//! This crate holds everything the tool plugins operate on: the note
//! types, the [`NoteStore`] persistence trait with an in-memory
//! implementation, the retrieval/analysis/search service traits, and the
//! text utilities (content previews, tag parsing, relative dates).

pub mod memory_store;
pub mod rag;
pub mod services;
pub mod store;
pub mod text;
pub mod types;

pub use memory_store::MemoryNoteStore;
pub use rag::{dedupe_by_note, RagError, RagService, ScoredChunk};
pub use services::{SearchHit, SearchService, ServiceError, StructuredOutputService};
pub use store::NoteStore;
pub use text::{content_preview, parse_relative_date, parse_tags, tags_contain, PREVIEW_MAX};
pub use types::{NewNote, Note, NoteError, NoteId, NoteUpdate};
