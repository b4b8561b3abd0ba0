//! Check command implementation.
//!
//! Reports every declaration that needs a documentation header.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use quill_docs::{scan_unit, MissingDocumentation, SourceUnit};
use serde::Serialize;

use crate::cli::{CheckArgs, OutputFormat};
use crate::commands::{collect_sources, get_cwd};
use crate::config::{Overrides, QuillConfig};
use crate::error::Result;
use crate::ui;

/// A diagnostic together with the file it was found in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiagnostic {
    pub path: String,
    #[serde(flatten)]
    pub diagnostic: MissingDocumentation,
}

/// Execute the check command.
///
/// Exits with status 1 when any declaration is missing its header.
pub async fn execute(args: CheckArgs) -> Result<ExitCode> {
    let cwd = get_cwd()?;
    let config = QuillConfig::load(&cwd, args.config.as_deref(), &Overrides::from(&args))?;
    let scan = config.scan_options();

    let sources = collect_sources(&args.paths)?;
    if sources.is_empty() {
        ui::warning("No C# files found");
        return Ok(ExitCode::SUCCESS);
    }

    let mut diagnostics = Vec::new();
    for path in &sources {
        let unit = SourceUnit::read(path)?;
        diagnostics.extend(
            scan_unit(&unit, &scan)
                .into_iter()
                .map(|diagnostic| FileDiagnostic {
                    path: path.display().to_string(),
                    diagnostic,
                }),
        );
    }

    let mut stdout = std::io::stdout().lock();
    match args.format {
        OutputFormat::Text => {
            for entry in &diagnostics {
                writeln!(stdout, "{}", format_text(Path::new(&entry.path), &entry.diagnostic))
                    .map_err(anyhow::Error::from)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &diagnostics)?;
            writeln!(stdout).map_err(anyhow::Error::from)?;
        }
    }

    let files = ui::count(sources.len(), "file");
    if diagnostics.is_empty() {
        ui::success(&format!("All declarations are documented ({files} checked)"));
        Ok(ExitCode::SUCCESS)
    } else {
        ui::warning(&format!(
            "{} missing documentation ({files} checked)",
            ui::count(diagnostics.len(), "declaration")
        ));
        Ok(ExitCode::FAILURE)
    }
}

/// `path:line:column: warning[Id]: message`
pub fn format_text(path: &Path, diagnostic: &MissingDocumentation) -> String {
    format!(
        "{}:{}:{}: warning[{}]: {}",
        path.display(),
        diagnostic.line,
        diagnostic.column,
        diagnostic.id,
        diagnostic.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lines_point_at_the_declaration() {
        let unit = SourceUnit::parse("namespace App\n{\n    public class Widget { }\n}\n");
        let diagnostics = scan_unit(&unit, &Default::default());
        assert_eq!(diagnostics.len(), 1);

        let line = format_text(Path::new("src/Widget.cs"), &diagnostics[0]);
        assert!(line.starts_with("src/Widget.cs:3:5: warning[ClassDocumentationHeader]: "));
    }

    #[test]
    fn json_entries_flatten_the_diagnostic() {
        let unit = SourceUnit::parse("public enum Color { Red }\n");
        let diagnostic = scan_unit(&unit, &Default::default()).remove(0);
        let value = serde_json::to_value(FileDiagnostic {
            path: "Color.cs".to_string(),
            diagnostic,
        })
        .unwrap();

        assert_eq!(value["path"], "Color.cs");
        assert_eq!(value["id"], "EnumDocumentationHeader");
        assert_eq!(value["name"], "Color");
        assert_eq!(value["line"], 1);
    }
}
