//! Errors raised while probing the build tool's version.

use thiserror::Error;

/// Failure to determine the build tool's version.
///
/// None of these reach the caller of [`resolve`](super::resolve); they are
/// logged and treated as an unknown version.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("`{tool}` is not available: {reason}")]
    ExternalToolUnavailable { tool: String, reason: String },

    #[error("`{tool}` exited with status {status:?}: {stderr}")]
    ExternalToolFailed {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("no version number found in `{text}`")]
    MalformedVersionString { text: String },
}

impl ResolveError {
    /// Shorthand for a tool that could not be found or spawned.
    pub fn unavailable(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        ResolveError::ExternalToolUnavailable {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for version text that contains no dotted triple.
    pub fn malformed(text: impl Into<String>) -> Self {
        ResolveError::MalformedVersionString { text: text.into() }
    }
}
