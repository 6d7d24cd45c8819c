//! Interactive generation
//!
//! Prompts in order for the model name, the table, the fields, the
//! destination, and every collaborator path not already configured.

use std::path::PathBuf;

use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use pkgforge::naming::pluralize;
use pkgforge::{FieldType, ScalarType};
use pkgforge_cli_lib::{ConfigArgs, Session};

use super::print_report;

pub struct InteractiveCommand;

fn collaborator_prompt(key: &str) -> &'static str {
    match key {
        "configuration" => "Configuration package import path",
        "logger" => "Logger package import path",
        "message_catalog" => "Message catalog package import path",
        "module_role" => "Module role package import path (= for the logger package)",
        "login" => "Login package import path (= for the module role package)",
        "sql_utilities" => "SQL utilities package import path (= for the module role package)",
        _ => "Package import path",
    }
}

#[allow(clippy::ptr_arg)]
fn required(input: &String) -> Result<(), &'static str> {
    if input.trim().is_empty() {
        Err("a value is required")
    } else {
        Ok(())
    }
}

impl InteractiveCommand {
    /// Prompt for a model and generate it
    pub fn execute(&self, args: &ConfigArgs) -> Result<()> {
        let theme = ColorfulTheme::default();
        let mut config = args.load()?;

        println!("{}", style("pkgforge: package generator").cyan().bold());
        println!();

        let name: String = Input::with_theme(&theme)
            .with_prompt("Model name (singular, lowercase)")
            .validate_with(required)
            .interact_text()?;

        let table: String = Input::with_theme(&theme)
            .with_prompt("Table name (plural, lowercase)")
            .default(pluralize(name.trim()))
            .validate_with(required)
            .interact_text()?;

        println!(
            "  {} name:type[:t|f][:length], separated by spaces; t allows NULL, f (default) does not",
            style("Fields:").dim()
        );
        println!(
            "  {} {}",
            style("Types:").dim(),
            style(ScalarType::supported_list()).dim()
        );
        let fields: String = Input::with_theme(&theme)
            .with_prompt("Fields")
            .validate_with(required)
            .interact_text()?;

        if config.destination().is_err() {
            let destination: String = Input::with_theme(&theme)
                .with_prompt("Destination directory")
                .validate_with(required)
                .interact_text()?;
            config.destination = Some(PathBuf::from(destination.trim()));
        }

        for key in config.collaborators.unset() {
            let path: String = Input::with_theme(&theme)
                .with_prompt(collaborator_prompt(key))
                .validate_with(required)
                .interact_text()?;
            config.collaborators.set(key, path.trim());
        }

        let session = Session::new(config)?;
        let model = session.model(&name, &table, &fields)?;

        let unsupported: Vec<&str> = model
            .fields()
            .iter()
            .filter(|f| matches!(f.field_type, FieldType::Unsupported(_)))
            .map(|f| f.name.as_str())
            .collect();
        if !unsupported.is_empty() {
            println!(
                "  {} unsupported types on {}; some files will be skipped",
                style("!").yellow(),
                unsupported.join(", ")
            );
        }

        let proceed = Confirm::with_theme(&theme)
            .with_prompt(format!(
                "Generate {} into {}?",
                model.name(),
                session.destination().display()
            ))
            .default(true)
            .interact()?;
        if !proceed {
            println!("{}", style("Nothing generated").yellow());
            return Ok(());
        }

        let report = session.generate(&model)?;
        print_report(&model, &report);

        Ok(())
    }
}
