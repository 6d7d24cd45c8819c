//! pkgforge: scaffold a SQL migration and a Go persistence package from a
//! compact field specification
//!
//! A model is described by a name, a table and a whitespace-separated list
//! of `name:type[:t|f][:length]` descriptors. From it pkgforge renders, in
//! this order:
//!
//! - a `CREATE TABLE` migration,
//! - the model struct,
//! - a storage interface,
//! - a PostgreSQL implementation of that interface,
//! - HTTP request handlers,
//! - route registration.
//!
//! Every artifact is derived from the same field list, so column order and
//! count match field order and count, and a field's name is transformed the
//! same way wherever it appears.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//! use std::path::Path;
//!
//! use pkgforge::{parse_fields, Generator, Model, TemplateRegistry};
//!
//! # fn main() -> anyhow::Result<()> {
//! let fields = parse_fields("title:string:f:100 published:bool")?;
//! let model = Model::new("book", "books", fields, BTreeMap::new())?;
//!
//! let registry = TemplateRegistry::global()?;
//! let report = Generator::new(registry).generate(&model, Path::new("./shop"))?;
//!
//! for file in &report.produced {
//!     println!("{} ({})", file.path.display(), file.description);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Field types
//!
//! `string`, `int`, `uint`, `bool`, `timestamp` (also `time.Time`),
//! `float32` and `float64`. A `t` flag makes a field nullable; without a
//! flag, or with `f`, it is `NOT NULL`.

#![forbid(unsafe_code)]

pub mod artifact;
pub mod config;
pub mod context;
pub mod error;
pub mod field;
pub mod format;
pub mod generator;
pub mod model;
pub mod naming;
pub mod templates;
pub mod types;
pub mod writer;

pub use artifact::{ArtifactKind, OutputLayout};
pub use config::{CollaboratorPaths, FormatterSettings, ScaffoldConfig};
pub use error::{ConfigError, FieldSpecError, GenerateError, ModelError, RegistryError, RenderError};
pub use field::{parse_fields, Field, FieldType, ScalarType};
pub use format::{CommandFormatter, Formatter, NoopFormatter};
pub use generator::{GeneratedFile, GenerationReport, Generator, SkippedArtifact};
pub use model::{Model, COLLABORATORS};
pub use templates::TemplateRegistry;
pub use types::{Accessor, NullWrapper, TypeTable};
pub use writer::{FixedFilePolicy, WriteMode};
