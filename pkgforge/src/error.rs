//! Error types for the generation pipeline
//!
//! Input errors ([`FieldSpecError`], [`ModelError`], [`ConfigError`]) and
//! resource errors ([`RegistryError`], [`GenerateError`]) abort a run.
//! [`RenderError`] only skips the artifact it was raised for.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use crate::field::ScalarType;

/// Malformed field specification
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldSpecError {
    /// The specification contained no field descriptors
    #[error("no fields were given; expected at least one name:type descriptor")]
    Empty,

    /// A descriptor without a name or type token
    #[error("invalid field descriptor '{descriptor}'; expected name:type[:t|f][:length]")]
    Malformed {
        /// The offending descriptor
        descriptor: String,
    },

    /// A descriptor with more than four tokens
    #[error("field descriptor '{descriptor}' has too many parts; expected name:type[:t|f][:length]")]
    TooManyParts {
        /// The offending descriptor
        descriptor: String,
    },

    /// A field name that is not a lowercase identifier
    #[error("invalid field name '{name}'; use lowercase letters, digits and underscores, starting with a letter")]
    InvalidName {
        /// The rejected name
        name: String,
    },

    /// A nullability flag other than `t` or `f`
    #[error("invalid null flag '{flag}' in '{descriptor}'; use t (nullable) or f (not null)")]
    InvalidNullFlag {
        /// The offending descriptor
        descriptor: String,
        /// The rejected flag
        flag: String,
    },

    /// A length token that is not a non-negative integer
    #[error("'{value}' in '{descriptor}' is not a valid length")]
    InvalidLength {
        /// The offending descriptor
        descriptor: String,
        /// The rejected token
        value: String,
        /// Integer parse failure
        #[source]
        source: ParseIntError,
    },
}

/// Invalid model assembly
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A model needs at least one field
    #[error("model '{0}' has no fields")]
    NoFields(String),

    /// Model name is not a lowercase identifier
    #[error("invalid model name '{0}'; use a singular lowercase identifier")]
    InvalidName(String),

    /// Table name is not a lowercase identifier
    #[error("invalid table name '{0}'; use a plural lowercase identifier")]
    InvalidTable(String),

    /// Two fields share a name
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    /// A field clashes with a column every generated table already has
    #[error("field '{0}' clashes with a generated column (id, created_at, updated_at)")]
    ReservedField(String),

    /// Two distinct field names map to the same Go identifier
    #[error("fields '{first}' and '{second}' both become '{ident}' in generated code")]
    CollidingFields {
        /// Field declared first
        first: String,
        /// Field declared later
        second: String,
        /// Shared identifier
        ident: String,
    },

    /// A name is a PostgreSQL or Go keyword
    #[error("'{name}' cannot be used as a {role} name; it is a reserved word")]
    ReservedWord {
        /// The rejected name
        name: String,
        /// `model`, `table` or `field`
        role: &'static str,
    },
}

/// Template registry could not be built
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A template file could not be read
    #[error("failed to read template '{name}' from {}", .path.display())]
    Io {
        /// Template name
        name: &'static str,
        /// File that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A template failed to compile
    #[error("failed to compile template '{name}'")]
    Template {
        /// Template name
        name: &'static str,
        /// Handlebars compile error
        #[source]
        source: Box<handlebars::TemplateError>,
    },
}

/// A single artifact could not be rendered
#[derive(Debug, Error)]
pub enum RenderError {
    /// The field's type is outside the supported set
    #[error("field '{field}' has unsupported type '{ty}'; supported types: {}", ScalarType::supported_list())]
    UnsupportedType {
        /// Field name
        field: String,
        /// The type string as written
        ty: String,
    },

    /// Template evaluation failed
    #[error("template evaluation failed")]
    Template(#[from] Box<handlebars::RenderError>),
}

impl From<handlebars::RenderError> for RenderError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Template(Box::new(err))
    }
}

/// Fatal pipeline failure
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A destination directory could not be created
    #[error("failed to create directory {}", .path.display())]
    CreateDir {
        /// Directory path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A fixed-name artifact already exists and the policy forbids appending
    #[error("{} already exists; refusing to append a second rendering (remove it or opt into append mode)", .path.display())]
    AlreadyExists {
        /// Existing file
        path: PathBuf,
    },

    /// A destination file could not be opened or written
    #[error("failed to write {}", .path.display())]
    Write {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The template registry failed to load
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Invalid or incomplete run configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration sources could not be merged or deserialized
    #[error("failed to load configuration")]
    Load(#[from] Box<figment::Error>),

    /// A required setting is missing or empty
    #[error("missing required setting '{0}'")]
    Missing(&'static str),

    /// A `=` shorthand referred to a setting that is itself unset
    #[error("setting '{key}' reuses '{target}' with '=', but '{target}' is not set")]
    DanglingShorthand {
        /// Setting using the shorthand
        key: &'static str,
        /// Setting it refers to
        target: &'static str,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}
