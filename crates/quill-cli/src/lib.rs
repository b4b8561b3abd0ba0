//! Quill CLI - find and fill missing C# documentation comments.
//!
//! The CLI is organized into several modules:
//!
//! - [`cli`] - Argument definitions (clap derive)
//! - [`commands`] - `check` and `fix`
//! - [`config`] - `quill.config.json`, environment and flag merging
//! - [`error`] - Error types and miette conversion
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Colored status messages

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, ConfigError, Result};
