//! Configuration types for LLM-assisted comments.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the LLM comment path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    /// LLM provider (currently only "ollama" is supported).
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name to use (e.g., "llama3.2:3b", "codellama:7b").
    #[serde(default = "default_model")]
    pub model: String,

    /// Ollama server URL.
    #[serde(default = "default_url")]
    pub url: String,

    /// Whether generated comments are kept in the response cache.
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,

    /// Sliding expiry of cache entries, in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            url: default_url(),
            cache_enabled: default_cache_enabled(),
            cache_ttl_seconds: default_cache_ttl(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl LlmConfig {
    /// Creates a new LLM config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the Ollama server URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Disables caching.
    pub fn without_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.provider != "ollama" {
            return Err(format!(
                "Unsupported provider '{}'. Valid options: ollama",
                self.provider
            ));
        }

        if self.model.is_empty() {
            return Err("Model name cannot be empty".to_string());
        }

        if self.url.is_empty() {
            return Err("Ollama URL cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("timeout_seconds must be greater than 0".to_string());
        }

        if self.cache_ttl_seconds == 0 {
            return Err("cache_ttl_seconds must be greater than 0".to_string());
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_provider() -> String {
    "ollama".to_string()
}

fn default_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> u64 {
    30
}

fn default_timeout() -> u64 {
    60
}
