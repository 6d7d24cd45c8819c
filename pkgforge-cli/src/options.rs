//! Configuration flags shared by every command
//!
//! Flags are the last configuration layer: they are merged on top of the
//! defaults, the TOML file and the `PKGFORGE_` environment.

use std::path::{Path, PathBuf};

use clap::Args;
use figment::providers::Serialized;
use pkgforge::{CollaboratorPaths, ConfigError, FixedFilePolicy, ScaffoldConfig};
use serde::Serialize;

/// Flags overriding configuration values
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Configuration file (default: ./pkgforge.toml)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Root directory receiving the generated files
    #[arg(long = "dest", value_name = "DIR", global = true)]
    pub destination: Option<PathBuf>,

    /// Folder under the destination receiving model packages
    #[arg(long, value_name = "DIR", global = true)]
    pub packages_folder: Option<String>,

    /// Import path of the configuration package
    #[arg(long, value_name = "PATH", global = true)]
    pub configuration: Option<String>,

    /// Import path of the logger package
    #[arg(long, value_name = "PATH", global = true)]
    pub logger: Option<String>,

    /// Import path of the message catalog package
    #[arg(long, value_name = "PATH", global = true)]
    pub message_catalog: Option<String>,

    /// Import path of the module role package ("=" reuses --logger)
    #[arg(long, value_name = "PATH", global = true)]
    pub module_role: Option<String>,

    /// Import path of the login package ("=" reuses --module-role)
    #[arg(long, value_name = "PATH", global = true)]
    pub login: Option<String>,

    /// Import path of the SQL utilities package ("=" reuses --module-role)
    #[arg(long, value_name = "PATH", global = true)]
    pub sql_utilities: Option<String>,

    /// Directory with customised templates
    #[arg(long, value_name = "DIR", global = true)]
    pub template_dir: Option<PathBuf>,

    /// Do not run the formatter on generated sources
    #[arg(long, global = true)]
    pub no_format: bool,

    /// Append to existing source files instead of refusing to overwrite them
    #[arg(long, global = true)]
    pub append_existing: bool,
}

#[derive(Serialize)]
struct FormatterOverride {
    enabled: bool,
}

#[derive(Serialize)]
struct Overrides<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    packages_folder: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_dir: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixed_files: Option<FixedFilePolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    formatter: Option<FormatterOverride>,
    collaborators: CollaboratorPaths,
}

impl ConfigArgs {
    fn overrides(&self) -> Overrides<'_> {
        Overrides {
            destination: self.destination.as_deref(),
            packages_folder: self.packages_folder.as_deref(),
            template_dir: self.template_dir.as_deref(),
            fixed_files: self.append_existing.then_some(FixedFilePolicy::Append),
            formatter: self.no_format.then_some(FormatterOverride { enabled: false }),
            collaborators: CollaboratorPaths {
                configuration: self.configuration.clone(),
                logger: self.logger.clone(),
                message_catalog: self.message_catalog.clone(),
                module_role: self.module_role.clone(),
                login: self.login.clone(),
                sql_utilities: self.sql_utilities.clone(),
            },
        }
    }

    /// Merge every configuration layer, flags last
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment holds a malformed value.
    pub fn load(&self) -> Result<ScaffoldConfig, ConfigError> {
        let figment = ScaffoldConfig::figment(self.config.as_deref())
            .merge(Serialized::defaults(self.overrides()));
        ScaffoldConfig::extract(figment)
    }
}
