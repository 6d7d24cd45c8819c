//! A validated configuration ready to scaffold models

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pkgforge::{parse_fields, GenerationReport, Model, ScaffoldConfig, TemplateRegistry};

enum Registry {
    Embedded(&'static TemplateRegistry),
    Custom(TemplateRegistry),
}

/// Settings, resolved collaborators and compiled templates for one run
///
/// A batch import reuses one session for every record.
pub struct Session {
    config: ScaffoldConfig,
    destination: PathBuf,
    collaborators: BTreeMap<String, String>,
    registry: Registry,
}

impl Session {
    /// Validate `config` and compile the templates
    ///
    /// # Errors
    ///
    /// Returns an error if a required setting is missing or the templates
    /// cannot be loaded.
    pub fn new(config: ScaffoldConfig) -> Result<Self> {
        let collaborators = config.validate().context("Invalid configuration")?;
        let destination = config.destination()?.to_path_buf();

        let registry = match &config.template_dir {
            Some(dir) => Registry::Custom(
                TemplateRegistry::from_dir(dir)
                    .with_context(|| format!("Failed to load templates from {}", dir.display()))?,
            ),
            None => Registry::Embedded(
                TemplateRegistry::global().context("Failed to compile built-in templates")?,
            ),
        };

        Ok(Self {
            config,
            destination,
            collaborators,
            registry,
        })
    }

    /// Root directory receiving generated files
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// The merged configuration
    #[must_use]
    pub const fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    /// Build a model with this session's collaborators
    ///
    /// # Errors
    ///
    /// Returns an error if the field specification or a name is invalid.
    pub fn model(&self, name: &str, table: &str, fields: &str) -> Result<Model> {
        let fields = parse_fields(fields)
            .with_context(|| format!("Invalid field specification for '{name}'"))?;
        Ok(Model::new(name.trim(), table.trim(), fields, self.collaborators.clone())?)
    }

    /// Run the pipeline for `model`
    ///
    /// # Errors
    ///
    /// Returns an error if a destination cannot be created or written.
    pub fn generate(&self, model: &Model) -> Result<GenerationReport> {
        let registry = match &self.registry {
            Registry::Embedded(registry) => *registry,
            Registry::Custom(registry) => registry,
        };
        self.config
            .generator(registry)
            .generate(model, &self.destination)
            .with_context(|| format!("Failed to generate '{}'", model.name()))
    }
}
