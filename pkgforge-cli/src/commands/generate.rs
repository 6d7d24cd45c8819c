//! Non-interactive generation from flags

use anyhow::Result;
use console::style;
use pkgforge_cli_lib::{ConfigArgs, Session};

use super::print_report;

pub struct GenerateCommand {
    name: String,
    table: String,
    fields: String,
}

impl GenerateCommand {
    pub const fn new(name: String, table: String, fields: String) -> Self {
        Self {
            name,
            table,
            fields,
        }
    }

    /// Generate the model described by the flags
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a required setting is missing
    /// - the field specification or a name is invalid
    /// - a destination cannot be created or written
    pub fn execute(&self, args: &ConfigArgs) -> Result<()> {
        let session = Session::new(args.load()?)?;
        let model = session.model(&self.name, &self.table, &self.fields)?;

        println!(
            "{} {} {} {}",
            style("Scaffolding").cyan().bold(),
            style(model.name()).green().bold(),
            style("into").cyan(),
            style(session.destination().display()).dim()
        );

        let report = session.generate(&model)?;
        print_report(&model, &report);

        Ok(())
    }
}
