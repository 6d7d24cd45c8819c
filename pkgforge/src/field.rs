//! Field specification parser
//!
//! A field specification is a whitespace-separated list of descriptors:
//!
//! ```text
//! descriptor := name ':' type [':' null_flag] [':' length]
//! null_flag  := 't' (nullable) | 'f' (not null, the default)
//! length     := non-negative integer, only meaningful for `string`
//! ```
//!
//! # Supported Types
//!
//! - `string` - `VARCHAR(length)`, Go `string`
//! - `int` / `uint` - `INT`, Go `int` / `uint`
//! - `bool` - `BOOLEAN`, Go `bool`
//! - `timestamp` (alias `time.Time`) - `TIMESTAMP`, Go `time.Time`
//! - `float32` - `REAL`, Go `float32`
//! - `float64` - `DOUBLE PRECISION`, Go `float64`
//!
//! # Examples
//!
//! ```text
//! title:string:f:100       → title VARCHAR(100) NOT NULL
//! subtitle:string:t:200    → subtitle VARCHAR(200)
//! age:int                  → age INT NOT NULL
//! born:timestamp:t         → born TIMESTAMP
//! ```
//!
//! A type outside the supported set is not rejected here. It is kept as
//! [`FieldType::Unsupported`] and fails every artifact that needs to know
//! the field's representation.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::error::FieldSpecError;

/// Abstract scalar type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Variable-length text
    String,
    /// Signed integer
    Int,
    /// Unsigned integer
    Uint,
    /// Boolean
    Bool,
    /// Point in time
    Timestamp,
    /// 32-bit float
    Float32,
    /// 64-bit float
    Float64,
}

impl ScalarType {
    /// Every supported type, in declaration order
    pub const ALL: [Self; 7] = [
        Self::String,
        Self::Int,
        Self::Uint,
        Self::Bool,
        Self::Timestamp,
        Self::Float32,
        Self::Float64,
    ];

    /// Canonical spelling used in field specifications
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Bool => "bool",
            Self::Timestamp => "timestamp",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Comma-separated list of the canonical spellings
    #[must_use]
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|ty| ty.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalarType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "int" => Ok(Self::Int),
            "uint" => Ok(Self::Uint),
            "bool" => Ok(Self::Bool),
            "timestamp" | "time.Time" => Ok(Self::Timestamp),
            "float32" => Ok(Self::Float32),
            "float64" => Ok(Self::Float64),
            _ => Err(()),
        }
    }
}

/// Declared type of a field, as parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// One of the supported scalar types
    Scalar(ScalarType),
    /// Anything else, kept verbatim
    Unsupported(String),
}

impl FieldType {
    /// Parse a type token; never fails
    #[must_use]
    pub fn parse(token: &str) -> Self {
        token
            .parse::<ScalarType>()
            .map_or_else(|()| Self::Unsupported(token.to_string()), Self::Scalar)
    }

    /// The scalar type, if supported
    #[must_use]
    pub const fn scalar(&self) -> Option<ScalarType> {
        match self {
            Self::Scalar(ty) => Some(*ty),
            Self::Unsupported(_) => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(ty) => write!(f, "{ty}"),
            Self::Unsupported(raw) => f.write_str(raw),
        }
    }
}

/// One column/property of a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Lowercase identifier, unique within a model
    pub name: String,
    /// Declared type
    pub field_type: FieldType,
    /// Whether the column accepts NULL
    pub nullable: bool,
    /// Maximum length, only for `string`
    pub length: Option<u32>,
}

impl Field {
    /// Parse a single `name:type[:t|f][:length]` descriptor
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the name or type token is missing or empty
    /// - the name is not a lowercase identifier
    /// - the null flag is neither `t` nor `f`
    /// - the length is not a non-negative integer
    /// - there are more than four tokens
    pub fn parse(descriptor: &str) -> Result<Self, FieldSpecError> {
        let parts: Vec<&str> = descriptor.split(':').collect();

        let (name, type_token) = match parts.as_slice() {
            [name, ty, ..] if !name.is_empty() && !ty.is_empty() => (*name, *ty),
            _ => {
                return Err(FieldSpecError::Malformed {
                    descriptor: descriptor.to_string(),
                })
            }
        };

        if !is_identifier(name) {
            return Err(FieldSpecError::InvalidName {
                name: name.to_string(),
            });
        }

        let (nullable, length) = match parts[2..] {
            [] => (false, None),
            [third] if is_digits(third) => (false, parse_length(descriptor, third)?),
            [flag] => (parse_null_flag(descriptor, flag)?, None),
            [flag, length] => (
                parse_null_flag(descriptor, flag)?,
                parse_length(descriptor, length)?,
            ),
            _ => {
                return Err(FieldSpecError::TooManyParts {
                    descriptor: descriptor.to_string(),
                })
            }
        };

        let field_type = FieldType::parse(type_token);
        if let FieldType::Unsupported(raw) = &field_type {
            warn!(field = name, ty = %raw, "unsupported field type");
        }

        let length = match (&field_type, length) {
            (FieldType::Scalar(ScalarType::String), length) => length,
            (_, Some(length)) => {
                warn!(field = name, length, "length only applies to string fields; ignoring it");
                None
            }
            (_, None) => None,
        };

        Ok(Self {
            name: name.to_string(),
            field_type,
            nullable,
            length,
        })
    }

    /// The scalar type, if supported
    #[must_use]
    pub const fn scalar(&self) -> Option<ScalarType> {
        self.field_type.scalar()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = if self.nullable { "t" } else { "f" };
        write!(f, "{}:{}:{flag}", self.name, self.field_type)?;
        if let Some(length) = self.length {
            write!(f, ":{length}")?;
        }
        Ok(())
    }
}

/// Parse a whitespace-separated field specification, preserving order
///
/// # Errors
///
/// Returns [`FieldSpecError::Empty`] when the input holds no descriptors, or
/// the first descriptor error encountered. One bad descriptor fails the
/// whole specification.
///
/// # Examples
///
/// ```
/// use pkgforge::field::parse_fields;
///
/// let fields = parse_fields("name:string:t:50 age:int").unwrap();
/// assert_eq!(fields.len(), 2);
/// assert!(fields[0].nullable);
/// assert_eq!(fields[0].length, Some(50));
/// assert!(!fields[1].nullable);
/// ```
pub fn parse_fields(spec: &str) -> Result<Vec<Field>, FieldSpecError> {
    let fields = spec
        .split_whitespace()
        .map(Field::parse)
        .collect::<Result<Vec<_>, _>>()?;

    if fields.is_empty() {
        return Err(FieldSpecError::Empty);
    }

    Ok(fields)
}

/// `[a-z][a-z0-9_]*`
pub(crate) fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn parse_null_flag(descriptor: &str, flag: &str) -> Result<bool, FieldSpecError> {
    match flag.to_ascii_lowercase().as_str() {
        "t" => Ok(true),
        "f" => Ok(false),
        _ => Err(FieldSpecError::InvalidNullFlag {
            descriptor: descriptor.to_string(),
            flag: flag.to_string(),
        }),
    }
}

fn parse_length(descriptor: &str, value: &str) -> Result<Option<u32>, FieldSpecError> {
    let length = value
        .parse::<u32>()
        .map_err(|source| FieldSpecError::InvalidLength {
            descriptor: descriptor.to_string(),
            value: value.to_string(),
            source,
        })?;

    Ok((length > 0).then_some(length))
}
