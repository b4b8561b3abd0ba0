//! Ollama client for LLM-generated documentation comments.

use async_trait::async_trait;
use ollama_rs::{generation::completion::request::GenerationRequest, Ollama};
use tracing::debug;

use super::config::LlmConfig;
use super::error::{LlmError, Result};
use super::TextGenerator;
use crate::comment::DOC_MARKER;

/// Text generator backed by an Ollama server.
pub struct OllamaGenerator {
    /// Underlying Ollama client from ollama-rs.
    client: Ollama,

    /// Configuration.
    config: LlmConfig,
}

impl OllamaGenerator {
    /// Creates a new Ollama generator.
    pub fn new(config: LlmConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|msg| LlmError::generation(format!("Invalid config: {msg}")))?;

        let (host, port) = split_url(&config.url)?;
        let client = Ollama::new(host, port);

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Checks that Ollama is running and the configured model is installed.
    pub async fn preflight_check(&self) -> Result<PreflightResult> {
        let models = self
            .client
            .list_local_models()
            .await
            .map_err(|e| LlmError::ServiceUnavailable {
                url: self.config.url.clone(),
                source: Box::new(e),
            })?;

        let available: Vec<String> = models.iter().map(|m| m.name.clone()).collect();

        let has_model = available.iter().any(|name| {
            name == &self.config.model || name.starts_with(&format!("{}:", &self.config.model))
        });

        if !has_model {
            let suggestions: Vec<String> = available
                .iter()
                .filter(|name| {
                    name.contains("llama") || name.contains("code") || name.contains("qwen")
                })
                .cloned()
                .collect();

            return Ok(PreflightResult::ModelNotFound {
                requested: self.config.model.clone(),
                available,
                suggestions,
            });
        }

        Ok(PreflightResult::Ok {
            model: self.config.model.clone(),
            available_models: available,
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate_text(&self, system: &str, user: &str) -> Result<String> {
        let request = GenerationRequest::new(self.config.model.clone(), user.to_string())
            .system(system.to_string());

        debug!(model = %self.config.model, "sending generation request");

        let response = self.client.generate(request).await.map_err(|e| {
            LlmError::GenerationFailed {
                message: format!("Ollama generation error: {e}"),
                source: Some(Box::new(e)),
            }
        })?;

        Ok(response.response)
    }
}

/// Splits a server URL into the scheme-qualified host and the port ollama-rs expects.
fn split_url(url: &str) -> Result<(String, u16)> {
    let url = url.trim_end_matches('/');

    let (scheme, rest) = if let Some(stripped) = url.strip_prefix("https://") {
        ("https", stripped)
    } else if let Some(stripped) = url.strip_prefix("http://") {
        ("http", stripped)
    } else {
        ("http", url)
    };

    let (hostname, port) = match rest.split_once(':') {
        Some((h, p)) => {
            let port = p
                .parse::<u16>()
                .map_err(|_| LlmError::generation(format!("Invalid port number in URL: {p}")))?;
            (h, port)
        }
        None => (rest, 11434),
    };

    Ok((format!("{scheme}://{hostname}"), port))
}

/// Result of a preflight check.
#[derive(Debug)]
pub enum PreflightResult {
    /// Everything is ready.
    Ok {
        model: String,
        available_models: Vec<String>,
    },

    /// Requested model not found, but Ollama is running.
    ModelNotFound {
        requested: String,
        available: Vec<String>,
        suggestions: Vec<String>,
    },
}

impl PreflightResult {
    /// Returns true if the preflight check passed.
    pub fn is_ok(&self) -> bool {
        matches!(self, PreflightResult::Ok { .. })
    }

    /// Converts to an error if not OK.
    pub fn into_result(self) -> Result<()> {
        match self {
            PreflightResult::Ok { .. } => Ok(()),
            PreflightResult::ModelNotFound {
                requested,
                available,
                ..
            } => Err(LlmError::ModelNotFound {
                model: requested,
                available_models: available,
            }),
        }
    }
}

/// Extracts the `///` comment block from a model response.
///
/// Markdown fences and any prose or code around the block are dropped. The
/// returned lines are unindented. Returns `None` when no line starts with
/// `///` or every such line is blank.
///
/// Uses plain string operations.
pub fn extract_comment_block(text: &str) -> Option<String> {
    let body = fenced_body(text).unwrap_or(text);

    let block: Vec<&str> = body
        .lines()
        .map(str::trim)
        .skip_while(|line| !line.starts_with(DOC_MARKER))
        .take_while(|line| line.starts_with(DOC_MARKER))
        .collect();

    let has_content = block
        .iter()
        .any(|line| !line.trim_start_matches('/').trim().is_empty());

    has_content.then(|| block.join("\n"))
}

/// Content of the first fenced code block that contains a `///` line.
fn fenced_body(text: &str) -> Option<&str> {
    let mut rest = text;
    while let Some(open) = rest.find("```") {
        let after_fence = &rest[open + 3..];
        let content_start = after_fence.find('\n')? + 1;
        let content = &after_fence[content_start..];
        let close = content.find("```")?;
        let body = &content[..close];
        if body.contains(DOC_MARKER) {
            return Some(body);
        }
        rest = &content[close + 3..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_block() {
        let response = "/// <summary>\n/// Runs the job.\n/// </summary>\n";
        assert_eq!(
            extract_comment_block(response).as_deref(),
            Some("/// <summary>\n/// Runs the job.\n/// </summary>")
        );
    }

    #[test]
    fn test_extract_drops_fences_and_surrounding_text() {
        let response = r#"Here is the comment:

```csharp
    /// <summary>
    /// Counts the widgets.
    /// </summary>
    /// <returns>An int.</returns>
    public int Count() => widgets.Count;
```

Let me know if you need anything else."#;

        assert_eq!(
            extract_comment_block(response).as_deref(),
            Some("/// <summary>\n/// Counts the widgets.\n/// </summary>\n/// <returns>An int.</returns>")
        );
    }

    #[test]
    fn test_extract_skips_fences_without_comments() {
        let response = "```text\nnothing\n```\n```\n/// <summary>x</summary>\n```";
        assert_eq!(
            extract_comment_block(response).as_deref(),
            Some("/// <summary>x</summary>")
        );
    }

    #[test]
    fn test_extract_rejects_missing_or_empty_blocks() {
        assert!(extract_comment_block("I cannot help with that.").is_none());
        assert!(extract_comment_block("///\n///   \n").is_none());
        assert!(extract_comment_block("").is_none());
    }

    #[test]
    fn test_split_url() {
        assert_eq!(
            split_url("http://localhost:11434/").unwrap(),
            ("http://localhost".to_string(), 11434)
        );
        assert_eq!(
            split_url("https://ollama.internal").unwrap(),
            ("https://ollama.internal".to_string(), 11434)
        );
        assert_eq!(
            split_url("gpu-box:8080").unwrap(),
            ("http://gpu-box".to_string(), 8080)
        );
        assert!(split_url("http://localhost:port").is_err());
    }

    #[test]
    fn test_config_validation_in_client() {
        let config = LlmConfig::default().with_model("");
        assert!(OllamaGenerator::new(config).is_err());
    }

    #[test]
    fn test_preflight_into_result() {
        let missing = PreflightResult::ModelNotFound {
            requested: "codellama".into(),
            available: vec!["llama3.2:3b".into()],
            suggestions: vec!["llama3.2:3b".into()],
        };
        assert!(!missing.is_ok());
        assert!(matches!(
            missing.into_result(),
            Err(LlmError::ModelNotFound { .. })
        ));
    }
}
