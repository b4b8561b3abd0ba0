//! Command implementations for the Quill CLI.
//!
//! - [`check`] - Report missing documentation
//! - [`fix`] - Insert documentation comments
//!
//! Each command provides an `execute` function that takes the parsed arguments
//! and returns the process exit code.

pub mod check;
pub mod fix;

pub use check::execute as check_execute;
pub use fix::execute as fix_execute;

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{CliError, Result};

/// Build output directories that never hold hand-written sources.
const SKIPPED_DIRS: &[&str] = &["bin", "obj"];

/// Expands files and directories into the sorted list of C# sources to process.
///
/// Files given explicitly are kept whatever their extension; directories are
/// walked for `*.cs` files.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();

    for path in paths {
        if path.is_file() {
            sources.push(path.clone());
        } else if path.is_dir() {
            let walker = WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));
            for entry in walker {
                let entry = entry?;
                if entry.file_type().is_file() && is_csharp(entry.path()) {
                    sources.push(entry.into_path());
                }
            }
        } else {
            return Err(CliError::FileNotFound(path.clone()));
        }
    }

    sources.sort();
    sources.dedup();
    debug!(count = sources.len(), "collected source files");
    Ok(sources)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_csharp(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("cs"))
}

/// Current working directory, for config lookup.
pub(crate) fn get_cwd() -> Result<PathBuf> {
    std::env::current_dir()
        .map_err(|e| CliError::InvalidArgument(format!("Cannot determine working directory: {e}")))
}
