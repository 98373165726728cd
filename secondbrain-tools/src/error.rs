//! Tool set construction errors.

use thiserror::Error;

/// Errors that can occur while building a tool set
#[derive(Debug, Error)]
pub enum ToolSetError {
    /// Two capabilities declare an operation with the same name.
    ///
    /// Tool names must be globally unique because the dispatch map is
    /// flat; silently shadowing one operation with another would misroute
    /// model calls, so this is a hard build error.
    #[error("Tool name collision: operation '{0}' is declared by more than one capability")]
    NameCollision(String),

    /// An operation declared a parameter list that does not compile to a
    /// valid JSON schema. Always a plugin authoring bug.
    #[error("Invalid input schema for operation '{name}': {reason}")]
    InvalidSchema { name: String, reason: String },
}
