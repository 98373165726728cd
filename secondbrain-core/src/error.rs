//! Tool errors for the dispatch layer.
//!
//! These errors are internal to dispatch; at the conversation boundary
//! every one of them is rendered into a descriptive string the calling
//! model can read and react to.

/// Error raised while resolving or invoking a tool call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ToolError {
    /// The requested tool was not found in the dispatch map
    #[error("Tool not found: {name}")]
    NotFound { name: String },

    /// The tool arguments failed validation
    #[error("Invalid arguments for tool '{name}': {reason}")]
    InvalidArguments { name: String, reason: String },

    /// A required argument was missing from the call
    #[error("Missing required argument(s) for tool '{name}': {missing}")]
    MissingArguments { name: String, missing: String },

    /// The tool execution failed
    #[error("Tool execution failed: {message}")]
    ExecutionFailed { message: String },
}

impl ToolError {
    /// Create a new "not found" error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a new "invalid arguments" error
    pub fn invalid_arguments(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new "missing arguments" error
    pub fn missing_arguments(name: impl Into<String>, missing: impl Into<String>) -> Self {
        Self::MissingArguments {
            name: name.into(),
            missing: missing.into(),
        }
    }

    /// Create a new "execution failed" error
    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            message: message.into(),
        }
    }
}
