//! Batch generation from a CSV file

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use pkgforge_cli_lib::{BatchEntry, BatchReader, ConfigArgs, Session};
use tracing::warn;

use super::print_report;

pub struct ImportCommand {
    file: PathBuf,
}

impl ImportCommand {
    pub const fn new(file: PathBuf) -> Self {
        Self { file }
    }

    /// Run the pipeline once per record
    ///
    /// Models before a failing record stay generated.
    pub fn execute(&self, args: &ConfigArgs) -> Result<()> {
        let reader = BatchReader::open(&self.file)?;
        let session = Session::new(args.load()?)?;

        println!(
            "{} {}",
            style("Importing models from").cyan().bold(),
            style(self.file.display()).green().bold()
        );

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Failed to set progress style")?,
        );
        spinner.enable_steady_tick(Duration::from_millis(100));

        let mut generated = 0_usize;
        let mut skipped = 0_usize;

        for entry in reader {
            match entry? {
                BatchEntry::Skipped { line, name } => {
                    warn!(line, model = %name, "no fields given; model skipped");
                    spinner.suspend(|| {
                        println!(
                            "  {} line {line}: {} skipped, no fields given",
                            style("!").yellow(),
                            style(&name).yellow()
                        );
                    });
                    skipped += 1;
                }
                BatchEntry::Model(record) => {
                    spinner.set_message(format!("Generating {}...", record.name));
                    let model = session
                        .model(&record.name, &record.table, &record.fields)
                        .with_context(|| format!("Line {}", record.line))?;
                    let report = session.generate(&model)?;
                    spinner.suspend(|| print_report(&model, &report));
                    generated += 1;
                }
            }
        }

        spinner.finish_and_clear();

        println!(
            "\n{} {generated} models, {skipped} skipped",
            style("Imported").green().bold()
        );

        Ok(())
    }
}
