//! The built-in capability plugins.
//!
//! Every operation here returns a plain string for the conversation:
//! confirmations for mutations, a JSON envelope for reads, and a
//! descriptive `"Error ..."` message for anything that went wrong. Errors
//! are phrased for the model, which is expected to relay or retry, not for
//! a human log.

mod analysis;
mod crud;
mod organization;
mod search;
mod web_search;

pub use analysis::NotesAnalysisPlugin;
pub use crud::NotesCrudPlugin;
pub use organization::NotesOrganizationPlugin;
pub use search::NotesSearchPlugin;
pub use web_search::WebSearchPlugin;

use secondbrain_core::RequestContext;
use secondbrain_notes::{Note, NoteId, NoteStore};
use serde_json::Value;

/// All note operations act on the authenticated user's notes only
pub(crate) fn require_user<'a>(ctx: &'a RequestContext, action: &str) -> Result<&'a str, String> {
    ctx.user_id()
        .ok_or_else(|| format!("Error: User context not set. Cannot {action}."))
}

/// Extract a non-empty string argument.
///
/// The dispatcher has already enforced presence and JSON type for required
/// parameters; this catches empty and whitespace-only values.
pub(crate) fn require_str<'a>(args: &'a Value, field: &str) -> Result<&'a str, String> {
    match args.get(field).and_then(Value::as_str).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(format!("Error: '{field}' must be a non-empty string.")),
    }
}

/// Extract an optional string argument, treating empty as absent
pub(crate) fn opt_str<'a>(args: &'a Value, field: &str) -> Option<&'a str> {
    args.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Fetch a note by id and verify it belongs to `user_id`.
///
/// The not-found and wrong-owner cases produce distinct messages; the
/// owner check runs second so a real note belonging to someone else is
/// reported as a permission problem, not as missing.
pub(crate) async fn fetch_owned_note(
    store: &dyn NoteStore,
    note_id: &str,
    user_id: &str,
) -> Result<Note, String> {
    let id = NoteId::from_string(note_id);
    match store.get(&id).await {
        Ok(Some(note)) if note.user_id == user_id => Ok(note),
        Ok(Some(_)) => Err(format!(
            "Error: Permission denied. Note {note_id} does not belong to the current user."
        )),
        Ok(None) => Err(format!("Error: Note {note_id} not found.")),
        Err(e) => Err(format!("Error fetching note {note_id}: {e}")),
    }
}
