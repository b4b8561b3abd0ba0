//! Fix command implementation.
//!
//! Documents every candidate declaration and writes the result back.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use quill_docs::{Documentor, LlmCommentGenerator, SourceUnit, UnitReport};
use tracing::{debug, info};

use crate::cli::FixArgs;
use crate::commands::{collect_sources, get_cwd};
use crate::config::{Overrides, QuillConfig};
use crate::error::Result;
use crate::ui;

/// Totals over every processed file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixSummary {
    pub files_changed: usize,
    pub documented: usize,
    pub failed: usize,
}

impl FixSummary {
    fn add(&mut self, report: &UnitReport) {
        if report.changed() {
            self.files_changed += 1;
        }
        self.documented += report.documented;
        self.failed += report.failed;
    }
}

/// Execute the fix command.
///
/// Exits with status 1 when any declaration could not be documented.
pub async fn execute(args: FixArgs) -> Result<ExitCode> {
    let cwd = get_cwd()?;
    let config = QuillConfig::load(&cwd, args.config.as_deref(), &Overrides::from(&args))?;
    let documentor = build_documentor(&config).await?;

    let sources = collect_sources(&args.paths)?;
    if sources.is_empty() {
        ui::warning("No C# files found");
        return Ok(ExitCode::SUCCESS);
    }

    let mut summary = FixSummary::default();
    for path in &sources {
        let unit = SourceUnit::read(path)?;
        let report = documentor.document_unit(&unit).await;
        summary.add(&report);

        for failure in report.failures() {
            ui::warning(&format!(
                "{}:{}:{}: could not document {} '{}': {}",
                path.display(),
                failure.line,
                failure.column,
                failure.kind,
                failure.name,
                failure.error.as_deref().unwrap_or("unknown error"),
            ));
        }

        if args.dry_run {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(report.text.as_bytes())
                .context("Failed to write to stdout")?;
        } else if report.changed() {
            write_source(path, &report.text, config.backup)?;
            info!(
                path = %path.display(),
                documented = report.documented,
                "updated file"
            );
        } else {
            debug!(path = %path.display(), "nothing to document");
        }
    }

    let verb = if args.dry_run { "Would document" } else { "Documented" };
    ui::success(&format!(
        "{verb} {} in {} ({} checked)",
        ui::count(summary.documented, "declaration"),
        ui::count(summary.files_changed, "file"),
        sources.len()
    ));

    if summary.failed > 0 {
        ui::error(&format!(
            "{} could not be documented",
            ui::count(summary.failed, "declaration")
        ));
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Heuristic documentor, with the Ollama path attached when configured.
async fn build_documentor(config: &QuillConfig) -> Result<Documentor> {
    let documentor = Documentor::new(config.documentor_options());
    if !config.uses_llm() {
        return Ok(documentor);
    }

    ui::info(&format!(
        "Connecting to Ollama at {} (model {})",
        config.llm.url, config.llm.model
    ));
    let generator = LlmCommentGenerator::connect(config.llm.clone()).await?;
    Ok(documentor.with_llm(Arc::new(generator)))
}

/// Writes the rewritten source, optionally keeping the original as `<file>.bak`.
///
/// When the write fails after a backup was taken, the original is restored.
pub fn write_source(path: &Path, text: &str, backup: bool) -> anyhow::Result<()> {
    let backup_path = backup.then(|| backup_path(path));

    if let Some(backup_path) = &backup_path {
        fs::copy(path, backup_path)
            .with_context(|| format!("Failed to create backup: {}", backup_path.display()))?;
    }

    if let Err(error) = fs::write(path, text) {
        if let Some(backup_path) = &backup_path {
            fs::copy(backup_path, path).with_context(|| {
                format!("Failed to restore {} from backup", path.display())
            })?;
        }
        return Err(error).with_context(|| format!("Failed to write {}", path.display()));
    }

    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}
