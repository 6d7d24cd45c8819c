//! CLI command implementations

pub mod generate;
pub mod import;
pub mod interactive;

pub use generate::GenerateCommand;
pub use import::ImportCommand;
pub use interactive::InteractiveCommand;

use console::style;
use pkgforge::{GenerationReport, Model, RenderError};

/// Print the files written and the artifacts skipped for one model
fn print_report(model: &Model, report: &GenerationReport) {
    println!(
        "\n{} {} files for {}:",
        style("Generated").green().bold(),
        report.produced.len(),
        style(model.name()).cyan().bold()
    );

    for file in &report.produced {
        println!(
            "  {} {} ({})",
            style("✓").green(),
            style(file.path.display()).dim(),
            style(&file.description).dim()
        );
    }

    for skipped in &report.skipped {
        println!(
            "  {} {} skipped: {}",
            style("✗").red(),
            style(skipped.kind).yellow(),
            skip_reason(&skipped.error)
        );
    }
}

/// Full cause chain of a skipped artifact, outermost first
fn skip_reason(error: &RenderError) -> String {
    anyhow::Chain::new(error)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgforge::{parse_fields, ArtifactKind, Generator, TemplateRegistry};
    use std::collections::BTreeMap;

    #[test]
    fn test_skip_reason_includes_template_cause() {
        let fields = parse_fields("title:string").unwrap();
        let model = Model::new("book", "books", fields, BTreeMap::new()).unwrap();
        let error = Generator::new(TemplateRegistry::global().unwrap())
            .render(ArtifactKind::Route, &model)
            .unwrap_err();

        let prefix = "template evaluation failed: ";
        let reason = skip_reason(&error);
        assert!(reason.starts_with(prefix), "{reason}");
        assert!(reason.len() > prefix.len());
    }

    #[test]
    fn test_skip_reason_without_cause() {
        let error = RenderError::UnsupportedType {
            field: "cover".to_string(),
            ty: "blob".to_string(),
        };
        assert_eq!(skip_reason(&error), error.to_string());
    }
}
