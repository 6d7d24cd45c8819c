//! Render contexts
//!
//! Each artifact is rendered against a JSON value built from the [`Model`].
//! Every context carries the model's identity, its fields and the
//! collaborator packages. Artifacts that need to know field representations
//! also get the type table's answers per field, which is where an
//! unsupported type turns into a [`RenderError`].

use serde::Serialize;
use serde_json::{json, Value};

use crate::artifact::ArtifactKind;
use crate::error::RenderError;
use crate::model::{Model, COLLABORATORS};
use crate::naming::package_ident;
use crate::types::{NullWrapper, TypeTable};

/// Collaborators imported by the route artifact
const ROUTE_IMPORTS: [&str; 5] = [
    "configuration",
    "logger",
    "message_catalog",
    "module_role",
    "login",
];

#[derive(Debug, Serialize)]
struct Package<'a> {
    path: &'a str,
    ident: String,
}

/// Build the context for one artifact
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedType`] when `kind` consults the type
/// table and a field's type is not supported.
pub fn build(kind: ArtifactKind, model: &Model, types: &TypeTable) -> Result<Value, RenderError> {
    let fields = if kind.needs_types() {
        typed_fields(model, types)?
    } else {
        plain_fields(model)
    };

    let nullable = model.fields().iter().filter(|f| f.nullable);
    let uses_sql_utilities = nullable.clone().next().is_some();
    let uses_pq = nullable
        .filter_map(|f| f.scalar())
        .any(|ty| NullWrapper::for_type(ty).needs_pq());

    Ok(json!({
        "name": model.name(),
        "table": model.table(),
        "fields": fields,
        "field_count": model.fields().len(),
        "uses_pq": uses_pq,
        "uses_sql_utilities": uses_sql_utilities,
        "packages": packages(model),
        "imports": route_imports(model),
    }))
}

fn plain_fields(model: &Model) -> Vec<Value> {
    model
        .fields()
        .iter()
        .map(|f| {
            json!({
                "name": f.name,
                "type": f.field_type.to_string(),
                "nullable": f.nullable,
                "length": f.length,
            })
        })
        .collect()
}

fn typed_fields(model: &Model, types: &TypeTable) -> Result<Vec<Value>, RenderError> {
    model
        .fields()
        .iter()
        .map(|f| {
            let accessor = types.accessor(f)?;
            Ok(json!({
                "name": f.name,
                "type": f.field_type.to_string(),
                "nullable": f.nullable,
                "length": f.length,
                "sql_type": types.column_type(f)?,
                "go_type": types.go_type(f)?,
                "write_expr": accessor.write_expr,
                "read_decl": accessor.read_decl,
                "read_assign": accessor.read_assign,
                "scan_target": accessor.scan_target,
            }))
        })
        .collect()
}

fn packages(model: &Model) -> serde_json::Map<String, Value> {
    COLLABORATORS
        .iter()
        .filter_map(|&name| {
            let path = model.auxiliary_path(name)?;
            let package = Package {
                path,
                ident: package_ident(path),
            };
            Some((name.to_string(), json!(package)))
        })
        .collect()
}

fn route_imports(model: &Model) -> Vec<&str> {
    let mut imports: Vec<&str> = ROUTE_IMPORTS
        .iter()
        .filter_map(|&name| model.auxiliary_path(name))
        .collect();
    imports.sort_unstable();
    imports.dedup();
    imports
}
