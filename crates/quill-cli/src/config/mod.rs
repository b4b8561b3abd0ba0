//! Configuration for the Quill CLI.
//!
//! [`QuillConfig`] is merged from defaults, `quill.config.json`, `QUILL_`
//! environment variables and command-line flags; see [`QuillConfig::load`].

mod loading;

pub use loading::{Overrides, CONFIG_FILE, ENV_PREFIX};

use quill_docs::llm::LlmConfig;
use quill_docs::{DocumentorOptions, ScanOptions};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Which generator documents classes and methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    /// Heuristic templates only.
    #[default]
    Heuristic,
    /// Ollama for classes and methods, templates for everything else.
    Llm,
}

/// Merged CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuillConfig {
    #[serde(default)]
    pub generator: Generator,

    /// Use the heuristic templates when the model fails.
    #[serde(default)]
    pub fallback: bool,

    /// Write `<file>.bak` before rewriting a file.
    #[serde(default)]
    pub backup: bool,

    #[serde(default)]
    pub const_fields_only: bool,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub llm: LlmConfig,
}

fn default_concurrency() -> usize {
    DocumentorOptions::default().concurrency
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            generator: Generator::default(),
            fallback: false,
            backup: false,
            const_fields_only: false,
            concurrency: default_concurrency(),
            llm: LlmConfig::default(),
        }
    }
}

impl QuillConfig {
    pub fn uses_llm(&self) -> bool {
        self.generator == Generator::Llm
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::default().with_const_fields_only(self.const_fields_only)
    }

    pub fn documentor_options(&self) -> DocumentorOptions {
        DocumentorOptions::default()
            .with_scan(self.scan_options())
            .with_fallback(self.fallback)
            .with_concurrency(self.concurrency)
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrency".to_string(),
                value: "0".to_string(),
                hint: "Use at least 1".to_string(),
            }
            .into());
        }

        if self.uses_llm() {
            self.llm.validate().map_err(|reason| ConfigError::InvalidValue {
                field: "llm".to_string(),
                value: reason,
                hint: "Check the llm section of quill.config.json".to_string(),
            })?;
        }

        Ok(())
    }
}
