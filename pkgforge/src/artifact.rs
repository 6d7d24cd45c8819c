//! The six artifact kinds and where each one lands

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// One kind of generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// `CREATE TABLE` migration
    Sql,
    /// Model struct
    Model,
    /// Storage interface
    Storage,
    /// PostgreSQL implementation of the storage interface
    Persistence,
    /// HTTP request handlers
    Handler,
    /// Route registration
    Route,
}

impl ArtifactKind {
    /// Rendering order
    pub const ORDERED: [Self; 6] = [
        Self::Sql,
        Self::Model,
        Self::Storage,
        Self::Persistence,
        Self::Handler,
        Self::Route,
    ];

    /// Registry key, also the template file name without `.hbs`
    #[must_use]
    pub const fn template_name(self) -> &'static str {
        match self {
            Self::Sql => "table.sql",
            Self::Model => "model.go",
            Self::Storage => "storage.go",
            Self::Persistence => "psql.go",
            Self::Handler => "handler.go",
            Self::Route => "route.go",
        }
    }

    /// Whether rendering consults the type table
    #[must_use]
    pub const fn needs_types(self) -> bool {
        matches!(self, Self::Sql | Self::Model | Self::Persistence)
    }

    /// Whether the file is a source file handed to the formatter
    #[must_use]
    pub const fn is_source(self) -> bool {
        !matches!(self, Self::Sql)
    }

    /// Human-readable description for console output
    #[must_use]
    pub fn description(self, model: &str) -> String {
        match self {
            Self::Sql => format!("migration creating the {model} table"),
            Self::Model => format!("{model} model"),
            Self::Storage => format!("{model} storage contract"),
            Self::Persistence => format!("PostgreSQL storage for {model}"),
            Self::Handler => format!("{model} request handlers"),
            Self::Route => format!("{model} route registration"),
        }
    }

    /// File name inside its directory
    ///
    /// Only the migration depends on `now`; it is named
    /// `<YYYYMMDD>_<HHMMSS>_create_<table>.sql`.
    #[must_use]
    pub fn file_name(self, table: &str, now: NaiveDateTime) -> String {
        match self {
            Self::Sql => format!("{}_create_{table}.sql", now.format("%Y%m%d_%H%M%S")),
            _ => self.template_name().to_string(),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Sql => "sql",
            Self::Model => "model",
            Self::Storage => "storage",
            Self::Persistence => "persistence",
            Self::Handler => "handler",
            Self::Route => "route",
        };
        f.write_str(label)
    }
}

/// Destination directories for one model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Directory receiving migrations
    pub database_dir: PathBuf,
    /// Directory receiving the model's source package
    pub package_dir: PathBuf,
}

impl OutputLayout {
    /// `<root>/<database_folder>` and `<root>/<packages_folder>/<model>`
    #[must_use]
    pub fn new(root: &Path, packages_folder: &str, database_folder: &str, model: &str) -> Self {
        Self {
            database_dir: root.join(database_folder),
            package_dir: root.join(packages_folder).join(model),
        }
    }

    /// Directory an artifact kind is written to
    #[must_use]
    pub fn dir_for(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Sql => &self.database_dir,
            _ => &self.package_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_migration_file_name() {
        assert_eq!(
            ArtifactKind::Sql.file_name("books", noon()),
            "20240309_140507_create_books.sql"
        );
    }

    #[test]
    fn test_fixed_file_names() {
        let names: Vec<_> = ArtifactKind::ORDERED[1..]
            .iter()
            .map(|kind| kind.file_name("books", noon()))
            .collect();
        assert_eq!(names, ["model.go", "storage.go", "psql.go", "handler.go", "route.go"]);
    }

    #[test]
    fn test_layout() {
        let layout = OutputLayout::new(Path::new("/srv/app"), "models", "database", "book");
        assert_eq!(layout.dir_for(ArtifactKind::Sql), Path::new("/srv/app/database"));
        assert_eq!(layout.dir_for(ArtifactKind::Route), Path::new("/srv/app/models/book"));
    }
}
