//! Generation pipeline
//!
//! Renders the six artifacts of one [`Model`] in a fixed order and writes
//! each to its destination before moving on to the next:
//!
//! 1. `database/<timestamp>_create_<table>.sql`
//! 2. `<packages>/<model>/model.go`
//! 3. `<packages>/<model>/storage.go`
//! 4. `<packages>/<model>/psql.go`
//! 5. `<packages>/<model>/handler.go`
//! 6. `<packages>/<model>/route.go`
//!
//! A rendering failure skips that artifact and is reported; a destination
//! that cannot be created or written stops the run. Nothing written earlier
//! in the run is removed, but fixed-name destinations are checked before the
//! first write so a refused rerun leaves no new migration behind.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, info_span, warn};

use crate::artifact::{ArtifactKind, OutputLayout};
use crate::context;
use crate::error::{GenerateError, RenderError};
use crate::format::{Formatter, NoopFormatter};
use crate::model::Model;
use crate::naming::package_ident;
use crate::templates::TemplateRegistry;
use crate::types::TypeTable;
use crate::writer::{ensure_dir, write_artifact, FixedFilePolicy, WriteMode};

/// Default folder for generated packages
pub const DEFAULT_PACKAGES_FOLDER: &str = "models";

/// Default folder for migrations
pub const DEFAULT_DATABASE_FOLDER: &str = "database";

/// Represents a generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Path the content was written to
    pub path: PathBuf,
    /// Rendered content
    pub content: String,
    /// File description for user feedback
    pub description: String,
}

/// An artifact that was not produced
#[derive(Debug)]
pub struct SkippedArtifact {
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Why rendering failed
    pub error: RenderError,
}

/// Outcome of one pipeline run
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Files written, in pipeline order
    pub produced: Vec<GeneratedFile>,
    /// Artifacts skipped because they failed to render
    pub skipped: Vec<SkippedArtifact>,
}

impl GenerationReport {
    /// Whether every artifact was produced
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// The produced file of a given kind
    #[must_use]
    pub fn file(&self, kind: ArtifactKind) -> Option<&GeneratedFile> {
        self.produced.iter().find(|file| file.kind == kind)
    }
}

/// Scaffold generator
pub struct Generator<'a> {
    registry: &'a TemplateRegistry,
    packages_folder: String,
    database_folder: String,
    policy: FixedFilePolicy,
    formatter: Box<dyn Formatter + 'a>,
}

impl<'a> Generator<'a> {
    /// Create a generator with default folders, no formatting and
    /// create-only fixed-name files
    #[must_use]
    pub fn new(registry: &'a TemplateRegistry) -> Self {
        Self {
            registry,
            packages_folder: DEFAULT_PACKAGES_FOLDER.to_string(),
            database_folder: DEFAULT_DATABASE_FOLDER.to_string(),
            policy: FixedFilePolicy::default(),
            formatter: Box::new(NoopFormatter),
        }
    }

    /// Folder under the destination root receiving model packages
    #[must_use]
    pub fn packages_folder(mut self, folder: impl Into<String>) -> Self {
        self.packages_folder = folder.into();
        self
    }

    /// Folder under the destination root receiving migrations
    #[must_use]
    pub fn database_folder(mut self, folder: impl Into<String>) -> Self {
        self.database_folder = folder.into();
        self
    }

    /// How existing fixed-name files are treated
    #[must_use]
    pub const fn fixed_file_policy(mut self, policy: FixedFilePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Formatter run on each source artifact after it is written
    #[must_use]
    pub fn formatter(mut self, formatter: impl Formatter + 'a) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Directories the artifacts of `model` land in
    #[must_use]
    pub fn layout(&self, model: &Model, root: &Path) -> OutputLayout {
        OutputLayout::new(root, &self.packages_folder, &self.database_folder, model.name())
    }

    /// Render one artifact without writing it
    ///
    /// # Errors
    ///
    /// Returns an error if a field type is unsupported by an artifact that
    /// needs it, or if the template cannot be evaluated.
    pub fn render(&self, kind: ArtifactKind, model: &Model) -> Result<String, RenderError> {
        let types = type_table(model);
        let ctx = context::build(kind, model, &types)?;
        debug!(artifact = %kind, model = model.name(), "rendering");
        self.registry.render(kind, &ctx)
    }

    /// Run the whole pipeline, naming the migration after the current time
    ///
    /// # Errors
    ///
    /// See [`Generator::generate_at`].
    pub fn generate(&self, model: &Model, root: &Path) -> Result<GenerationReport, GenerateError> {
        self.generate_at(model, root, Local::now().naive_local())
    }

    /// Run the whole pipeline with an explicit generation time
    ///
    /// # Errors
    ///
    /// Returns an error if a fixed-name file already exists under
    /// [`FixedFilePolicy::Create`] (checked before anything is written), a
    /// destination directory cannot be created, or a file cannot be written.
    /// Artifacts written before a write failure stay on disk.
    pub fn generate_at(
        &self,
        model: &Model,
        root: &Path,
        now: NaiveDateTime,
    ) -> Result<GenerationReport, GenerateError> {
        let span = info_span!("generate", model = model.name(), table = model.table());
        let _guard = span.enter();

        let layout = self.layout(model, root);
        self.preflight(model, &layout, now)?;
        ensure_dir(&layout.package_dir)?;
        ensure_dir(&layout.database_dir)?;

        let mut report = GenerationReport::default();

        for kind in ArtifactKind::ORDERED {
            let content = match self.render(kind, model) {
                Ok(content) => content,
                Err(error) => {
                    warn!(artifact = %kind, error = %error, "skipping artifact");
                    report.skipped.push(SkippedArtifact { kind, error });
                    continue;
                }
            };

            let path = layout.dir_for(kind).join(kind.file_name(model.table(), now));
            write_artifact(&path, &content, self.policy.mode_for(kind))?;
            info!(artifact = %kind, path = %path.display(), "wrote artifact");

            if kind.is_source() {
                if let Err(err) = self.formatter.format(&path) {
                    warn!(path = %path.display(), error = %err, "formatter failed; leaving file as rendered");
                }
            }

            report.produced.push(GeneratedFile {
                kind,
                path,
                content,
                description: kind.description(model.name()),
            });
        }

        Ok(report)
    }

    fn preflight(
        &self,
        model: &Model,
        layout: &OutputLayout,
        now: NaiveDateTime,
    ) -> Result<(), GenerateError> {
        for kind in ArtifactKind::ORDERED {
            if self.policy.mode_for(kind) != WriteMode::CreateNew {
                continue;
            }
            let path = layout.dir_for(kind).join(kind.file_name(model.table(), now));
            if path.exists() {
                debug!(path = %path.display(), "fixed-name artifact already present");
                return Err(GenerateError::AlreadyExists { path });
            }
        }
        Ok(())
    }
}

fn type_table(model: &Model) -> TypeTable {
    model
        .auxiliary_path("sql_utilities")
        .map_or_else(TypeTable::default, |path| TypeTable::new(package_ident(path)))
}
