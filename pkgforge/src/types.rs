//! Type and null-handling table
//!
//! Maps each [`ScalarType`] to its SQL column type, its Go type and the
//! null-wrapper family used when the field is nullable. All lookups are
//! exhaustive matches over the closed type set; a field whose type is not in
//! that set yields [`RenderError::UnsupportedType`].
//!
//! One field always resolves to one [`NullWrapper`], and every accessor
//! expression for that field is derived from it, so the write path, the
//! scratch declaration and the read-back of the persistence artifact cannot
//! disagree.

use crate::error::RenderError;
use crate::field::{Field, ScalarType};
use crate::naming::upper_camel;

/// SQL column type for a scalar type, without length
///
/// `int` and `uint` share one SQL integer type.
#[must_use]
pub const fn sql_type(ty: ScalarType) -> &'static str {
    match ty {
        ScalarType::String => "VARCHAR",
        ScalarType::Int | ScalarType::Uint => "INT",
        ScalarType::Bool => "BOOLEAN",
        ScalarType::Timestamp => "TIMESTAMP",
        ScalarType::Float32 => "REAL",
        ScalarType::Float64 => "DOUBLE PRECISION",
    }
}

/// Go type of the generated struct field
#[must_use]
pub const fn go_type(ty: ScalarType) -> &'static str {
    match ty {
        ScalarType::String => "string",
        ScalarType::Int => "int",
        ScalarType::Uint => "uint",
        ScalarType::Bool => "bool",
        ScalarType::Timestamp => "time.Time",
        ScalarType::Float32 => "float32",
        ScalarType::Float64 => "float64",
    }
}

/// Nullable-wrapper family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullWrapper {
    /// `sql.NullString`
    String,
    /// `sql.NullInt64`
    Integer,
    /// `sql.NullFloat64`
    Float,
    /// `pq.NullTime`
    Timestamp,
    /// `sql.NullBool`
    Bool,
}

impl NullWrapper {
    /// Family used for a scalar type
    #[must_use]
    pub const fn for_type(ty: ScalarType) -> Self {
        match ty {
            ScalarType::String => Self::String,
            ScalarType::Int | ScalarType::Uint => Self::Integer,
            ScalarType::Float32 | ScalarType::Float64 => Self::Float,
            ScalarType::Timestamp => Self::Timestamp,
            ScalarType::Bool => Self::Bool,
        }
    }

    /// Wrapper type the scan result is read into
    #[must_use]
    pub const fn wrapper_type(self) -> &'static str {
        match self {
            Self::String => "sql.NullString",
            Self::Integer => "sql.NullInt64",
            Self::Float => "sql.NullFloat64",
            Self::Timestamp => "pq.NullTime",
            Self::Bool => "sql.NullBool",
        }
    }

    /// Constructor in the SQL utilities package
    #[must_use]
    pub const fn constructor(self) -> &'static str {
        match self {
            Self::String => "StringToNull",
            Self::Integer => "IntToNull",
            Self::Float => "FloatToNull",
            Self::Timestamp => "TimeToNull",
            Self::Bool => "BoolToNull",
        }
    }

    /// Value member of the wrapper
    #[must_use]
    pub const fn value_member(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Integer => "Int64",
            Self::Float => "Float64",
            Self::Timestamp => "Time",
            Self::Bool => "Bool",
        }
    }

    /// Width the constructor accepts, when the field must be converted first
    #[must_use]
    pub const fn widened_type(self) -> Option<&'static str> {
        match self {
            Self::Integer => Some("int64"),
            Self::Float => Some("float64"),
            Self::String | Self::Timestamp | Self::Bool => None,
        }
    }

    /// Whether the wrapper comes from `github.com/lib/pq`
    #[must_use]
    pub const fn needs_pq(self) -> bool {
        matches!(self, Self::Timestamp)
    }
}

/// Code fragments used to move one field in and out of the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    /// Expression passed as a query argument
    pub write_expr: String,
    /// Scratch wrapper declaration; empty for NOT NULL fields
    pub read_decl: String,
    /// Copy from the scratch wrapper into the model; empty for NOT NULL fields
    pub read_assign: String,
    /// Destination handed to `Scan`
    pub scan_target: String,
}

/// Null-handling table bound to the SQL utilities package identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTable {
    sql_utilities: String,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new("psql")
    }
}

impl TypeTable {
    /// Create a table whose wrapper constructors live in `sql_utilities`
    #[must_use]
    pub fn new(sql_utilities: impl Into<String>) -> Self {
        Self {
            sql_utilities: sql_utilities.into(),
        }
    }

    /// Identifier of the SQL utilities package
    #[must_use]
    pub fn sql_utilities(&self) -> &str {
        &self.sql_utilities
    }

    /// Column type of a field, including its length
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedType`] for an unsupported type.
    pub fn column_type(&self, field: &Field) -> Result<String, RenderError> {
        let ty = resolve(field)?;
        Ok(match (ty, field.length) {
            (ScalarType::String, Some(length)) => format!("{}({length})", sql_type(ty)),
            _ => sql_type(ty).to_string(),
        })
    }

    /// Go type of a field
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedType`] for an unsupported type.
    pub fn go_type(&self, field: &Field) -> Result<&'static str, RenderError> {
        resolve(field).map(go_type)
    }

    /// Accessor expressions for a field
    ///
    /// NOT NULL fields are read and written directly. Nullable fields go
    /// through their wrapper family, with integers and floats converted to
    /// the wrapper's width on the way in and back to the field's own type on
    /// the way out.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedType`] for an unsupported type.
    pub fn accessor(&self, field: &Field) -> Result<Accessor, RenderError> {
        let ty = resolve(field)?;
        let member = upper_camel(&field.name);

        if !field.nullable {
            return Ok(Accessor {
                write_expr: format!("m.{member}"),
                read_decl: String::new(),
                read_assign: String::new(),
                scan_target: format!("&m.{member}"),
            });
        }

        let wrapper = NullWrapper::for_type(ty);
        let scratch = format!("null{member}");
        let value = format!("{scratch}.{}", wrapper.value_member());

        let argument = wrapper
            .widened_type()
            .map_or_else(|| format!("m.{member}"), |wide| format!("{wide}(m.{member})"));
        let read_back = if wrapper.widened_type().is_some() {
            format!("{}({value})", go_type(ty))
        } else {
            value
        };

        Ok(Accessor {
            write_expr: format!("{}.{}({argument})", self.sql_utilities, wrapper.constructor()),
            read_decl: format!("{scratch} := {}{{}}", wrapper.wrapper_type()),
            read_assign: format!("m.{member} = {read_back}"),
            scan_target: format!("&{scratch}"),
        })
    }
}

fn resolve(field: &Field) -> Result<ScalarType, RenderError> {
    field.scalar().ok_or_else(|| RenderError::UnsupportedType {
        field: field.name.clone(),
        ty: field.field_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, FieldType};

    fn field(descriptor: &str) -> Field {
        Field::parse(descriptor).unwrap()
    }

    #[test]
    fn test_sql_type_is_total() {
        let expected = [
            (ScalarType::String, "VARCHAR"),
            (ScalarType::Int, "INT"),
            (ScalarType::Uint, "INT"),
            (ScalarType::Bool, "BOOLEAN"),
            (ScalarType::Timestamp, "TIMESTAMP"),
            (ScalarType::Float32, "REAL"),
            (ScalarType::Float64, "DOUBLE PRECISION"),
        ];
        assert_eq!(expected.len(), ScalarType::ALL.len());
        for (ty, sql) in expected {
            assert_eq!(sql_type(ty), sql);
        }
    }

    #[test]
    fn test_every_type_has_one_wrapper_family() {
        for ty in ScalarType::ALL {
            let wrapper = NullWrapper::for_type(ty);
            assert!(!wrapper.wrapper_type().is_empty());
            assert!(!wrapper.constructor().is_empty());
        }
        assert_eq!(
            NullWrapper::for_type(ScalarType::Int),
            NullWrapper::for_type(ScalarType::Uint)
        );
    }

    #[test]
    fn test_column_type_with_length() {
        let table = TypeTable::default();
        assert_eq!(table.column_type(&field("title:string:f:100")).unwrap(), "VARCHAR(100)");
        assert_eq!(table.column_type(&field("title:string")).unwrap(), "VARCHAR");
        assert_eq!(table.column_type(&field("age:uint")).unwrap(), "INT");
    }

    #[test]
    fn test_unsupported_type_is_an_error() {
        let table = TypeTable::default();
        let price = field("price:decimal");
        assert!(matches!(
            table.column_type(&price),
            Err(RenderError::UnsupportedType { ref field, ref ty }) if field == "price" && ty == "decimal"
        ));
        assert!(table.go_type(&price).is_err());
        assert!(table.accessor(&price).is_err());
        assert_eq!(price.field_type, FieldType::Unsupported("decimal".to_string()));
    }

    #[test]
    fn test_not_null_accessor_is_direct() {
        let accessor = TypeTable::default().accessor(&field("published_at:timestamp")).unwrap();
        assert_eq!(accessor.write_expr, "m.PublishedAt");
        assert_eq!(accessor.read_decl, "");
        assert_eq!(accessor.read_assign, "");
        assert_eq!(accessor.scan_target, "&m.PublishedAt");
    }

    #[test]
    fn test_nullable_string_accessor() {
        let accessor = TypeTable::default().accessor(&field("title:string:t")).unwrap();
        assert_eq!(accessor.write_expr, "psql.StringToNull(m.Title)");
        assert_eq!(accessor.read_decl, "nullTitle := sql.NullString{}");
        assert_eq!(accessor.read_assign, "m.Title = nullTitle.String");
        assert_eq!(accessor.scan_target, "&nullTitle");
    }

    #[test]
    fn test_nullable_integers_cast_back_to_declared_width() {
        let table = TypeTable::default();

        let age = table.accessor(&field("age:int:t")).unwrap();
        assert_eq!(age.write_expr, "psql.IntToNull(int64(m.Age))");
        assert_eq!(age.read_decl, "nullAge := sql.NullInt64{}");
        assert_eq!(age.read_assign, "m.Age = int(nullAge.Int64)");

        let stock = table.accessor(&field("stock:uint:t")).unwrap();
        assert_eq!(stock.read_assign, "m.Stock = uint(nullStock.Int64)");
    }

    #[test]
    fn test_nullable_timestamp_bool_and_float() {
        let table = TypeTable::new("dbutil");

        let born = table.accessor(&field("born_at:timestamp:t")).unwrap();
        assert_eq!(born.write_expr, "dbutil.TimeToNull(m.BornAt)");
        assert_eq!(born.read_decl, "nullBornAt := pq.NullTime{}");
        assert_eq!(born.read_assign, "m.BornAt = nullBornAt.Time");

        let active = table.accessor(&field("active:bool:t")).unwrap();
        assert_eq!(active.write_expr, "dbutil.BoolToNull(m.Active)");
        assert_eq!(active.read_assign, "m.Active = nullActive.Bool");

        let weight = table.accessor(&field("weight:float32:t")).unwrap();
        assert_eq!(weight.write_expr, "dbutil.FloatToNull(float64(m.Weight))");
        assert_eq!(weight.read_decl, "nullWeight := sql.NullFloat64{}");
        assert_eq!(weight.read_assign, "m.Weight = float32(nullWeight.Float64)");
    }

    #[test]
    fn test_accessor_uses_one_family_per_field() {
        let table = TypeTable::default();
        for ty in ScalarType::ALL {
            let f = field(&format!("value:{}:t", ty.as_str()));
            let wrapper = NullWrapper::for_type(ty);
            let accessor = table.accessor(&f).unwrap();
            assert!(accessor.write_expr.contains(wrapper.constructor()), "{ty}");
            assert!(accessor.read_decl.contains(wrapper.wrapper_type()), "{ty}");
            assert!(accessor.read_assign.contains(wrapper.value_member()), "{ty}");
        }
    }
}
