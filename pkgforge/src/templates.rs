//! Template registry
//!
//! One Handlebars template per [`ArtifactKind`], compiled once and read-only
//! afterwards. The default templates are shipped in `templates/` and
//! embedded at build time; [`TemplateRegistry::from_dir`] loads customised
//! copies instead. Either constructor fails as a whole if any template is
//! missing or does not compile.
//!
//! Helpers available to every template:
//!
//! | helper | effect                  |
//! |--------|-------------------------|
//! | `ucc`  | `UpperCamelCase`        |
//! | `lcc`  | `lowerCamelCase`        |
//! | `kcc`  | `kebab-case`            |
//! | `upp`  | `UPPERCASE`             |
//! | `inc`  | add one                 |
//! | `dec`  | subtract one            |

use std::fs;
use std::path::Path;

use handlebars::{handlebars_helper, Handlebars};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::debug;

use crate::artifact::ArtifactKind;
use crate::error::{RegistryError, RenderError};
use crate::naming;

handlebars_helper!(ucc: |v: str| naming::upper_camel(v));
handlebars_helper!(lcc: |v: str| naming::lower_camel(v));
handlebars_helper!(kcc: |v: str| naming::kebab(v));
handlebars_helper!(upp: |v: str| naming::upper(v));
handlebars_helper!(inc: |v: i64| naming::increment(v));
handlebars_helper!(dec: |v: i64| naming::decrement(v));

static EMBEDDED: OnceCell<TemplateRegistry> = OnceCell::new();

/// Compiled artifact templates
#[derive(Debug)]
pub struct TemplateRegistry {
    handlebars: Handlebars<'static>,
}

impl TemplateRegistry {
    /// The process-wide registry of embedded templates, compiled on first use
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded template does not compile.
    pub fn global() -> Result<&'static Self, RegistryError> {
        EMBEDDED.get_or_try_init(Self::embedded)
    }

    /// Compile the embedded templates
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded template does not compile.
    pub fn embedded() -> Result<Self, RegistryError> {
        Self::build(|kind| Ok(embedded_source(kind).to_string()))
    }

    /// Compile `<dir>/<template>.hbs` for every artifact kind
    ///
    /// # Errors
    ///
    /// Returns an error if any template file is missing, unreadable or
    /// does not compile.
    pub fn from_dir(dir: &Path) -> Result<Self, RegistryError> {
        Self::build(|kind| {
            let name = kind.template_name();
            let path = dir.join(format!("{name}.hbs"));
            fs::read_to_string(&path).map_err(|source| RegistryError::Io { name, path, source })
        })
    }

    fn build(
        mut source: impl FnMut(ArtifactKind) -> Result<String, RegistryError>,
    ) -> Result<Self, RegistryError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        handlebars.register_helper("ucc", Box::new(ucc));
        handlebars.register_helper("lcc", Box::new(lcc));
        handlebars.register_helper("kcc", Box::new(kcc));
        handlebars.register_helper("upp", Box::new(upp));
        handlebars.register_helper("inc", Box::new(inc));
        handlebars.register_helper("dec", Box::new(dec));

        for kind in ArtifactKind::ORDERED {
            let name = kind.template_name();
            let text = source(kind)?;
            handlebars
                .register_template_string(name, text)
                .map_err(|err| RegistryError::Template {
                    name,
                    source: Box::new(err),
                })?;
            debug!(template = name, "registered template");
        }

        Ok(Self { handlebars })
    }

    /// Render the template for `kind` against `context`
    ///
    /// # Errors
    ///
    /// Returns an error if the template refers to something the context
    /// does not provide.
    pub fn render<T: Serialize>(&self, kind: ArtifactKind, context: &T) -> Result<String, RenderError> {
        Ok(self.handlebars.render(kind.template_name(), context)?)
    }
}

/// Text of the shipped template for `kind`
#[must_use]
pub const fn embedded_source(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Sql => include_str!("../templates/table.sql.hbs"),
        ArtifactKind::Model => include_str!("../templates/model.go.hbs"),
        ArtifactKind::Storage => include_str!("../templates/storage.go.hbs"),
        ArtifactKind::Persistence => include_str!("../templates/psql.go.hbs"),
        ArtifactKind::Handler => include_str!("../templates/handler.go.hbs"),
        ArtifactKind::Route => include_str!("../templates/route.go.hbs"),
    }
}
