use std::path::PathBuf;

use thiserror::Error;

#[cfg(feature = "llm")]
use crate::llm::LlmError;

/// Result type alias for documentation synthesis.
pub type Result<T> = std::result::Result<T, DocsError>;

/// Error variants for comment synthesis and patching.
#[derive(Debug, Error)]
pub enum DocsError {
    /// A type shape carried no text a phrase could be built from.
    #[error("unsupported type shape '{shape}': {reason}")]
    UnsupportedTypeShape {
        /// Source form of the offending shape.
        shape: String,
        /// Why no phrase could be derived.
        reason: String,
    },

    /// The external text-generation capability failed or returned unusable output.
    #[cfg(feature = "llm")]
    #[error("comment generation failed: {0}")]
    GenerationFailed(#[from] LlmError),

    /// A documentation comment could not be parsed or is not well formed.
    #[error("malformed documentation comment: {message}")]
    MalformedComment {
        /// Description of the problem.
        message: String,
    },

    /// Failed to read or write a source file.
    #[error("failed to access source '{path}': {error}")]
    Io {
        /// Path to the source file that caused the error.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// Generic error variant.
    #[error("{message}")]
    Other {
        /// Human-readable error message.
        message: String,
    },
}

impl DocsError {
    /// Helper to create an unsupported-shape error.
    pub fn unsupported_shape(shape: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedTypeShape {
            shape: shape.into(),
            reason: reason.into(),
        }
    }

    /// Helper to create a malformed-comment error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedComment {
            message: message.into(),
        }
    }
}
