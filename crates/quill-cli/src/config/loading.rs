use std::path::Path;

use figment::{
    providers::{Env, Format as _, Json, Serialized},
    Figment,
};
use serde::Serialize;
use tracing::debug;

use super::{Generator, QuillConfig};
use crate::cli::{CheckArgs, FixArgs};
use crate::error::{ConfigError, Result};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "quill.config.json";

/// Prefix of environment overrides, e.g. `QUILL_CONCURRENCY=8` or `QUILL_LLM__MODEL=codellama`.
pub const ENV_PREFIX: &str = "QUILL_";

/// Values given on the command line. Only flags that were set are merged.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<Generator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub const_fields_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,
    #[serde(skip_serializing_if = "LlmOverrides::is_empty")]
    pub llm: LlmOverrides,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LlmOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl LlmOverrides {
    fn is_empty(&self) -> bool {
        self.model.is_none() && self.url.is_none()
    }
}

/// Boolean flags can only switch a setting on.
fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

impl From<&CheckArgs> for Overrides {
    fn from(args: &CheckArgs) -> Self {
        Self {
            const_fields_only: flag(args.const_fields_only),
            ..Self::default()
        }
    }
}

impl From<&FixArgs> for Overrides {
    fn from(args: &FixArgs) -> Self {
        Self {
            generator: args.llm.then_some(Generator::Llm),
            fallback: flag(args.fallback),
            backup: flag(args.backup),
            const_fields_only: flag(args.const_fields_only),
            concurrency: args.concurrency,
            llm: LlmOverrides {
                model: args.model.clone(),
                url: args.url.clone(),
            },
        }
    }
}

impl QuillConfig {
    /// Load configuration from multiple sources.
    ///
    /// Priority: CLI args > environment variables > config file > defaults.
    /// Without an explicit `config_path`, `quill.config.json` in `cwd` is used
    /// when it exists.
    pub fn load(cwd: &Path, config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(QuillConfig::default()));

        let config_file = match config_path {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    cwd.join(path)
                };
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => {
                let default_path = cwd.join(CONFIG_FILE);
                default_path.is_file().then_some(default_path)
            }
        };

        if let Some(path) = &config_file {
            debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Json::file(path));
        }

        figment = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Serialized::defaults(overrides));

        let config: QuillConfig = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            value: e.to_string(),
            hint: format!("Check {CONFIG_FILE} syntax and field types"),
        })?;

        config.validate()?;
        Ok(config)
    }
}
