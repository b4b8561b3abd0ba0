//! LLM-generated documentation comments.
//!
//! This module asks a text-generation service for an XML comment of a C#
//! class or method, extracts the `///` block from the reply, and keeps it in a
//! [`ResponseCache`] keyed by the declaration's source text.
//!
//! # Features
//!
//! - **Sliding cache**: BLAKE3-keyed entries that expire 30s after their last read
//! - **De-duplication**: concurrent requests for the same source share one generation
//! - **Local-First**: uses Ollama for privacy and cost control
//! - **Pluggable**: any [`TextGenerator`] can stand in for Ollama
//!
//! # Usage
//!
//! ```ignore
//! use quill_docs::llm::{LlmCommentGenerator, LlmConfig, LlmTarget};
//!
//! let config = LlmConfig::default().with_model("llama3.2:3b");
//! let generator = LlmCommentGenerator::connect(config).await?;
//!
//! let comment = generator
//!     .generate(LlmTarget::Method, "public int Count() => items.Count;", "    ")
//!     .await?;
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod prompts;

pub use cache::{CacheEntry, ResponseCache};
pub use client::{extract_comment_block, OllamaGenerator, PreflightResult};
pub use config::LlmConfig;
pub use error::{LlmError, Result};
pub use prompts::PromptBuilder;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::comment::DocComment;
use crate::model::DeclarationKind;

/// Capability that turns a system and a user message into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, system: &str, user: &str) -> Result<String>;
}

/// Declaration kinds the LLM path can document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmTarget {
    Class,
    Method,
}

impl LlmTarget {
    /// Maps a declaration kind onto a target, if the LLM path covers it.
    pub fn for_kind(kind: DeclarationKind) -> Option<Self> {
        match kind {
            DeclarationKind::Class => Some(LlmTarget::Class),
            DeclarationKind::Method => Some(LlmTarget::Method),
            _ => None,
        }
    }

    pub(crate) fn noun(&self) -> &'static str {
        match self {
            LlmTarget::Class => "class",
            LlmTarget::Method => "method",
        }
    }
}

impl fmt::Display for LlmTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// A parsed comment from the LLM path.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmComment {
    pub comment: DocComment,
    /// `true` when the comment came from the cache.
    pub cache_hit: bool,
}

/// Generates documentation comments through a [`TextGenerator`], with caching.
pub struct LlmCommentGenerator {
    generator: Arc<dyn TextGenerator>,
    cache: Arc<ResponseCache>,
    timeout: Duration,
}

impl LlmCommentGenerator {
    /// Creates a generator over any text-generation capability.
    pub fn new(generator: Arc<dyn TextGenerator>, cache: Arc<ResponseCache>) -> Self {
        Self {
            generator,
            cache,
            timeout: LlmConfig::default().timeout(),
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Connects to Ollama.
    ///
    /// Performs a preflight check to ensure Ollama is running and the model is available.
    pub async fn connect(config: LlmConfig) -> Result<Self> {
        let client = OllamaGenerator::new(config.clone())?;

        let preflight = client.preflight_check().await?;
        match &preflight {
            PreflightResult::Ok { model, .. } => {
                info!(%model, "using LLM model");
            }
            PreflightResult::ModelNotFound {
                requested,
                suggestions,
                ..
            } => {
                warn!(model = %requested, "model not found");
                if !suggestions.is_empty() {
                    warn!(
                        available = %suggestions.join(", "),
                        "try one of the available models or run: ollama pull {requested}"
                    );
                }
            }
        }
        preflight.into_result()?;

        let cache = Arc::new(ResponseCache::from_config(&config));
        if cache.is_enabled() {
            debug!(ttl_seconds = config.cache_ttl_seconds, "response cache enabled");
        }

        Ok(Self::new(Arc::new(client), cache).with_timeout(config.timeout()))
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Returns a comment block for the declaration, indented for insertion.
    ///
    /// Lines after the first are prefixed with `indent`, as in [`DocComment::render`].
    pub async fn generate(
        &self,
        target: LlmTarget,
        source_text: &str,
        indent: &str,
    ) -> crate::Result<String> {
        let (canonical, _) = self.canonical(target, source_text).await?;
        Ok(canonical
            .lines()
            .collect::<Vec<_>>()
            .join(&format!("\n{indent}")))
    }

    /// Returns the parsed comment for the declaration.
    pub async fn generate_comment(
        &self,
        target: LlmTarget,
        source_text: &str,
    ) -> crate::Result<LlmComment> {
        let (canonical, cache_hit) = self.canonical(target, source_text).await?;
        let comment = DocComment::parse(&canonical)?;
        comment.validate_insertable()?;
        Ok(LlmComment { comment, cache_hit })
    }

    /// Canonical (unindented) block and whether it came from the cache.
    async fn canonical(&self, target: LlmTarget, source_text: &str) -> Result<(String, bool)> {
        let key = ResponseCache::cache_key(source_text);
        let (block, cache_hit) = self
            .cache
            .get_or_try_insert_with(&key, || self.request(target, source_text))
            .await?;

        debug!(%target, cache_hit, "generated comment block");
        Ok((block, cache_hit))
    }

    async fn request(&self, target: LlmTarget, source_text: &str) -> Result<String> {
        let system = PromptBuilder::system_prompt(target);
        let user = PromptBuilder::user_prompt(target, source_text);

        let raw = match tokio::time::timeout(
            self.timeout,
            self.generator.generate_text(&system, &user),
        )
        .await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => return Err(e),
            Err(_) => {
                return Err(LlmError::Timeout {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        if raw.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        let block = extract_comment_block(&raw)
            .ok_or_else(|| LlmError::invalid_response("no /// comment block found", &raw))?;

        // Only blocks that could be inserted as they are get cached.
        DocComment::parse(&block)
            .and_then(|comment| comment.validate_insertable())
            .map_err(|e| LlmError::invalid_response(e.to_string(), &raw))?;

        Ok(block)
    }
}
