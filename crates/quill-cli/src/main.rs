//! Quill CLI entry point: argument parsing, logging setup and command dispatch.

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use quill_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Check(check_args) => commands::check_execute(check_args).await,
        cli::Command::Fix(fix_args) => commands::fix_execute(fix_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
