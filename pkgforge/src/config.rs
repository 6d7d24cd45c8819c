//! Run configuration
//!
//! Settings are layered with figment, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. `./pkgforge.toml`, or the file passed explicitly
//! 3. Environment variables (`PKGFORGE_` prefix, `__` separates nested keys)
//! 4. Command-line overrides merged by the caller
//!
//! # Example Configuration
//!
//! ```toml
//! # pkgforge.toml
//! destination = "/home/me/go/src/github.com/acme/shop"
//! packages_folder = "models"
//! fixed_files = "create"
//!
//! [formatter]
//! enabled = true
//! command = "gofmt"
//! args = ["-w"]
//!
//! [collaborators]
//! configuration = "github.com/acme/shop/configuration"
//! logger = "github.com/acme/shop/logger"
//! message_catalog = "github.com/acme/shop/message"
//! module_role = "github.com/acme/shop/authorization"
//! login = "="          # same package as module_role
//! sql_utilities = "github.com/acme/shop/psql"
//! ```
//!
//! `=` is shorthand for "same as": `module_role` may reuse `logger`, while
//! `login` and `sql_utilities` may reuse `module_role`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::format::CommandFormatter;
use crate::generator::{Generator, DEFAULT_DATABASE_FOLDER, DEFAULT_PACKAGES_FOLDER};
use crate::model::COLLABORATORS;
use crate::templates::TemplateRegistry;
use crate::writer::FixedFilePolicy;

/// Configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "pkgforge.toml";

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "PKGFORGE_";

const SHORTHAND: &str = "=";

/// Post-write formatter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterSettings {
    /// Run the formatter on generated sources
    pub enabled: bool,

    /// Program to run
    pub command: String,

    /// Arguments placed before the file path
    pub args: Vec<String>,
}

impl Default for FormatterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "gofmt".to_string(),
            args: vec!["-w".to_string()],
        }
    }
}

/// Import paths of the packages generated code depends on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaboratorPaths {
    /// Application configuration package
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,

    /// Logging package
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger: Option<String>,

    /// Message catalog package
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_catalog: Option<String>,

    /// Module role authorization package
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_role: Option<String>,

    /// Login / JWT validation package
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,

    /// SQL null-conversion utilities package
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_utilities: Option<String>,
}

impl CollaboratorPaths {
    /// Raw value of a collaborator setting
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "configuration" => self.configuration.as_deref(),
            "logger" => self.logger.as_deref(),
            "message_catalog" => self.message_catalog.as_deref(),
            "module_role" => self.module_role.as_deref(),
            "login" => self.login.as_deref(),
            "sql_utilities" => self.sql_utilities.as_deref(),
            _ => None,
        }
    }

    /// Set a collaborator setting; unknown keys are ignored
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let slot = match key {
            "configuration" => &mut self.configuration,
            "logger" => &mut self.logger,
            "message_catalog" => &mut self.message_catalog,
            "module_role" => &mut self.module_role,
            "login" => &mut self.login,
            "sql_utilities" => &mut self.sql_utilities,
            _ => return,
        };
        *slot = Some(value.into());
    }

    /// Collaborators with no value, in prompt order
    #[must_use]
    pub fn unset(&self) -> Vec<&'static str> {
        COLLABORATORS
            .into_iter()
            .filter(|key| self.get(key).is_none_or(|v| v.trim().is_empty()))
            .collect()
    }

    /// Expand `=` shorthands and require every collaborator
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DanglingShorthand`] if `=` refers to an unset
    /// setting, or [`ConfigError::Missing`] naming the first collaborator
    /// left without a path.
    pub fn resolve(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let logger = literal(self.logger.as_deref());
        let module_role = reuse(
            "module_role",
            self.module_role.as_deref(),
            "logger",
            logger.as_deref(),
        )?;
        let login = reuse(
            "login",
            self.login.as_deref(),
            "module_role",
            module_role.as_deref(),
        )?;
        let sql_utilities = reuse(
            "sql_utilities",
            self.sql_utilities.as_deref(),
            "module_role",
            module_role.as_deref(),
        )?;

        [
            ("configuration", literal(self.configuration.as_deref())),
            ("logger", logger),
            ("message_catalog", literal(self.message_catalog.as_deref())),
            ("module_role", module_role),
            ("login", login),
            ("sql_utilities", sql_utilities),
        ]
        .into_iter()
        .map(|(key, value)| {
            value
                .map(|path| (key.to_string(), path))
                .ok_or(ConfigError::Missing(key))
        })
        .collect()
    }
}

fn literal(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != SHORTHAND)
        .map(str::to_string)
}

fn reuse(
    key: &'static str,
    value: Option<&str>,
    target: &'static str,
    resolved: Option<&str>,
) -> Result<Option<String>, ConfigError> {
    match value.map(str::trim) {
        Some(SHORTHAND) => resolved
            .map(|path| Some(path.to_string()))
            .ok_or(ConfigError::DanglingShorthand { key, target }),
        other => Ok(literal(other)),
    }
}

/// Complete pkgforge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Root directory receiving generated files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,

    /// Folder under the destination receiving model packages
    pub packages_folder: String,

    /// Folder under the destination receiving migrations
    pub database_folder: String,

    /// Directory with customised templates replacing the embedded ones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,

    /// How existing fixed-name files are treated
    pub fixed_files: FixedFilePolicy,

    /// Formatter settings
    pub formatter: FormatterSettings,

    /// Collaborator import paths
    pub collaborators: CollaboratorPaths,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            destination: None,
            packages_folder: DEFAULT_PACKAGES_FOLDER.to_string(),
            database_folder: DEFAULT_DATABASE_FOLDER.to_string(),
            template_dir: None,
            fixed_files: FixedFilePolicy::default(),
            formatter: FormatterSettings::default(),
            collaborators: CollaboratorPaths::default(),
        }
    }
}

impl ScaffoldConfig {
    /// Layered sources without command-line overrides
    ///
    /// `file` replaces `./pkgforge.toml`. A missing file contributes
    /// nothing.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let file = file.map_or_else(|| PathBuf::from(CONFIG_FILE), Path::to_path_buf);
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load defaults, file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or a value has the
    /// wrong shape.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::extract(Self::figment(file))
    }

    /// Extract from a figment, typically [`ScaffoldConfig::figment`] with
    /// overrides merged on top
    ///
    /// # Errors
    ///
    /// Returns an error if the merged value does not deserialize.
    pub fn extract(figment: Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract()?)
    }

    /// The destination root
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if no destination is configured.
    pub fn destination(&self) -> Result<&Path, ConfigError> {
        self.destination
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(ConfigError::Missing("destination"))
    }

    /// Check everything a run needs and return the resolved collaborators
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing setting.
    pub fn validate(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        self.destination()?;
        if self.packages_folder.trim().is_empty() {
            return Err(ConfigError::Missing("packages_folder"));
        }
        if self.database_folder.trim().is_empty() {
            return Err(ConfigError::Missing("database_folder"));
        }
        self.collaborators.resolve()
    }

    /// A generator honouring these settings
    #[must_use]
    pub fn generator<'a>(&self, registry: &'a TemplateRegistry) -> Generator<'a> {
        let generator = Generator::new(registry)
            .packages_folder(self.packages_folder.clone())
            .database_folder(self.database_folder.clone())
            .fixed_file_policy(self.fixed_files);

        if self.formatter.enabled {
            generator.formatter(CommandFormatter::new(
                self.formatter.command.clone(),
                self.formatter.args.clone(),
            ))
        } else {
            generator
        }
    }
}
