//! pkgforge CLI tool

#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use commands::{GenerateCommand, ImportCommand, InteractiveCommand};
use console::style;
use pkgforge_cli_lib::{observability, ConfigArgs};

#[derive(Parser)]
#[command(name = "pkgforge")]
#[command(version)]
#[command(about = "Scaffold SQL migrations and Go persistence packages", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one model from flags
    Generate {
        /// Model name (singular, lowercase, e.g. `book`)
        #[arg(long)]
        name: String,
        /// Table name (plural, lowercase, e.g. `books`)
        #[arg(long)]
        table: String,
        /// Field specification, e.g. "title:string:f:100 published:bool"
        #[arg(long)]
        fields: String,
    },
    /// Prompt for the model and any missing setting
    Interactive,
    /// Generate every model listed in a `;`-separated CSV file
    Import {
        /// File with `model;table;fields` records
        file: std::path::PathBuf,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            name,
            table,
            fields,
        } => GenerateCommand::new(name, table, fields).execute(&cli.config),
        Commands::Interactive => InteractiveCommand.execute(&cli.config),
        Commands::Import { file } => ImportCommand::new(file).execute(&cli.config),
    }
}

/// Exit status for a command line clap refused
///
/// Help and version requests succeed; usage errors fail like any other error.
fn usage_status(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => 1,
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let status = usage_status(&err);
            if let Err(io) = err.print() {
                eprintln!("{} {io}", style("error:").red().bold());
            }
            return ExitCode::from(status);
        }
    };

    if let Err(err) = observability::init(cli.verbose) {
        eprintln!("{} {err}", style("warning:").yellow().bold());
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}
