//! The entity being scaffolded

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::ModelError;
use crate::field::{is_identifier, Field};
use crate::naming::upper_camel;

/// Logical collaborator names threaded into the route artifact
pub const COLLABORATORS: [&str; 6] = [
    "configuration",
    "logger",
    "message_catalog",
    "module_role",
    "login",
    "sql_utilities",
];

/// Columns every generated table carries besides its fields
pub const BOOKKEEPING_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Go identifiers of the bookkeeping columns in the model struct
const BOOKKEEPING_IDENTS: [&str; 3] = ["ID", "CreatedAt", "UpdatedAt"];

/// PostgreSQL keywords that cannot name a table or column unquoted
const SQL_RESERVED: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric",
    "authorization", "binary", "both", "case", "cast", "check", "collate", "collation",
    "column", "concurrently", "constraint", "create", "cross", "current_catalog",
    "current_date", "current_role", "current_schema", "current_time", "current_timestamp",
    "current_user", "default", "deferrable", "desc", "distinct", "do", "else", "end",
    "except", "false", "fetch", "for", "foreign", "freeze", "from", "full", "grant", "group",
    "having", "ilike", "in", "initially", "inner", "intersect", "into", "is", "isnull",
    "join", "lateral", "leading", "left", "like", "limit", "localtime", "localtimestamp",
    "natural", "not", "notnull", "null", "offset", "on", "only", "or", "order", "outer",
    "overlaps", "placing", "primary", "references", "returning", "right", "select",
    "session_user", "similar", "some", "symmetric", "system_user", "table", "tablesample",
    "then", "to", "trailing", "true", "union", "unique", "user", "using", "variadic",
    "verbose", "when", "where", "window", "with",
];

/// Go keywords, which cannot name the generated package
const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// One entity to scaffold
///
/// Built once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    name: String,
    table: String,
    fields: Vec<Field>,
    auxiliary_paths: BTreeMap<String, String>,
}

impl Model {
    /// Assemble a model
    ///
    /// # Arguments
    ///
    /// * `name` - Singular lowercase identifier (e.g. `book`)
    /// * `table` - Plural lowercase identifier (e.g. `books`)
    /// * `fields` - Ordered fields, as parsed
    /// * `auxiliary_paths` - Collaborator name to import path, passed through untouched
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the name or table is not a lowercase identifier
    /// - there are no fields
    /// - two fields share a name, or their names map to the same Go identifier
    /// - a field clashes with a bookkeeping column
    /// - the table or a field is a PostgreSQL keyword, or the name a Go keyword
    pub fn new(
        name: impl Into<String>,
        table: impl Into<String>,
        fields: Vec<Field>,
        auxiliary_paths: BTreeMap<String, String>,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        let table = table.into();

        if !is_identifier(&name) {
            return Err(ModelError::InvalidName(name));
        }
        if !is_identifier(&table) {
            return Err(ModelError::InvalidTable(table));
        }
        if GO_KEYWORDS.contains(&name.as_str()) {
            return Err(ModelError::ReservedWord { name, role: "model" });
        }
        if SQL_RESERVED.contains(&table.as_str()) {
            return Err(ModelError::ReservedWord { name: table, role: "table" });
        }
        if fields.is_empty() {
            return Err(ModelError::NoFields(name));
        }

        check_fields(&fields)?;

        Ok(Self {
            name,
            table,
            fields,
            auxiliary_paths,
        })
    }

    /// Singular model name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table name
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Collaborator import paths
    #[must_use]
    pub const fn auxiliary_paths(&self) -> &BTreeMap<String, String> {
        &self.auxiliary_paths
    }

    /// Import path of one collaborator, if configured
    #[must_use]
    pub fn auxiliary_path(&self, collaborator: &str) -> Option<&str> {
        self.auxiliary_paths.get(collaborator).map(String::as_str)
    }
}

fn check_fields(fields: &[Field]) -> Result<(), ModelError> {
    let mut seen = HashSet::new();
    let mut idents: HashMap<String, &str> = HashMap::new();

    for field in fields {
        let name = field.name.as_str();
        if !seen.insert(name) {
            return Err(ModelError::DuplicateField(field.name.clone()));
        }
        if SQL_RESERVED.contains(&name) {
            return Err(ModelError::ReservedWord {
                name: field.name.clone(),
                role: "field",
            });
        }

        let ident = upper_camel(name);
        if BOOKKEEPING_COLUMNS.contains(&name)
            || BOOKKEEPING_IDENTS.iter().any(|b| b.eq_ignore_ascii_case(&ident))
        {
            return Err(ModelError::ReservedField(field.name.clone()));
        }
        if let Some(first) = idents.insert(ident.clone(), name) {
            return Err(ModelError::CollidingFields {
                first: first.to_string(),
                second: field.name.clone(),
                ident,
            });
        }
    }

    Ok(())
}
