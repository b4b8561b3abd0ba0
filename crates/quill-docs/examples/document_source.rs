//! Documents a C# file with the heuristic templates and prints the result.
//!
//! Run with: cargo run --package quill-docs --example document_source -- path/to/File.cs

use std::path::PathBuf;

use quill_docs::{scan_unit, Documentor, DocumentorOptions, ScanOptions, SourceUnit};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("Usage: document_source <File.cs>");
        std::process::exit(2);
    };

    let unit = SourceUnit::read(&path)?;
    for missing in scan_unit(&unit, &ScanOptions::default()) {
        eprintln!("{}:{}: {}", missing.line, missing.column, missing.message);
    }

    let report = Documentor::new(DocumentorOptions::default())
        .document_unit(&unit)
        .await;
    print!("{}", report.text);
    eprintln!(
        "documented {}, skipped {}, failed {}",
        report.documented, report.skipped, report.failed
    );
    Ok(())
}
