//! Error types for LLM-assisted comment generation.

use std::fmt;

/// Result type for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors raised by the text-generation capability or by reading its output.
#[derive(Debug)]
pub enum LlmError {
    /// The generation service is not running or not reachable.
    ServiceUnavailable {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Requested model is not available on the service.
    ModelNotFound {
        model: String,
        available_models: Vec<String>,
    },

    /// The service reported a failure, or the configuration was unusable.
    GenerationFailed {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The response held no usable documentation block.
    InvalidResponse {
        message: String,
        raw_response: String,
    },

    /// The response was empty.
    EmptyResponse,

    /// The request did not finish in time.
    Timeout { seconds: u64 },
}

impl LlmError {
    /// Helper to create a generation failure without an underlying cause.
    pub fn generation(message: impl Into<String>) -> Self {
        LlmError::GenerationFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Helper to create an invalid-response error.
    pub fn invalid_response(message: impl Into<String>, raw_response: impl Into<String>) -> Self {
        LlmError::InvalidResponse {
            message: message.into(),
            raw_response: raw_response.into(),
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::ServiceUnavailable { url, .. } => {
                write!(
                    f,
                    "Cannot connect to Ollama at {url}. Is Ollama running?\n\
                     Try: ollama serve"
                )
            }
            LlmError::ModelNotFound {
                model,
                available_models,
            } => {
                write!(
                    f,
                    "Model '{model}' not found. Available models: {}\n\
                     To download: ollama pull {model}",
                    if available_models.is_empty() {
                        "none (install a model first)".to_string()
                    } else {
                        available_models.join(", ")
                    }
                )
            }
            LlmError::GenerationFailed { message, .. } => {
                write!(f, "LLM generation failed: {message}")
            }
            LlmError::InvalidResponse {
                message,
                raw_response,
            } => {
                let preview: String = raw_response.chars().take(100).collect();
                let ellipsis = if raw_response.chars().count() > 100 { "..." } else { "" };
                write!(
                    f,
                    "Invalid LLM response: {message}\nResponse preview: {preview}{ellipsis}"
                )
            }
            LlmError::EmptyResponse => write!(f, "LLM returned an empty response"),
            LlmError::Timeout { seconds } => {
                write!(f, "LLM request timed out after {seconds}s")
            }
        }
    }
}

impl std::error::Error for LlmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LlmError::ServiceUnavailable { source, .. } => {
                Some(&**source as &dyn std::error::Error)
            }
            LlmError::GenerationFailed {
                source: Some(source),
                ..
            } => Some(&**source as &dyn std::error::Error),
            _ => None,
        }
    }
}
