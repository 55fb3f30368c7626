//! Scalar coercion: one trimmed string in, one typed value out.
//!
//! The coercer is the leaf of the binding pipeline. Every value that
//! arrives as text (query values, header values, array elements)
//! passes through [`coerce`] exactly once. The set of target kinds is a
//! closed enum, so an unrecognized kind is unrepresentable rather than
//! a runtime fault.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use uuid::Uuid;

/// Whether a parsed date-time is tagged as local or UTC.
///
/// The textual input carries no zone marker; the declaring field
/// decides how the parsed stamp is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// Interpret the stamp as server-local wall time.
    Local,
    /// Interpret the stamp as UTC.
    Utc,
}

/// Case-insensitive name table for an enumeration kind.
///
/// Coercion resolves a textual value to the index of the matching
/// variant name. Tables are `static` so descriptor tables can reference
/// them in `const` position.
///
/// # Example
///
/// ```
/// use gantry_bind::EnumTable;
///
/// static COLORS: EnumTable = EnumTable {
///     type_name: "Color",
///     variants: &["Red", "Green", "Blue"],
/// };
///
/// assert_eq!(COLORS.lookup("gReEn"), Some(1));
/// assert_eq!(COLORS.lookup("magenta"), None);
/// ```
#[derive(Debug)]
pub struct EnumTable {
    /// Name used inside `Error on (<TypeName>) ...` lines.
    pub type_name: &'static str,
    /// Variant names, in declaration order.
    pub variants: &'static [&'static str],
}

impl EnumTable {
    /// Finds the index of a variant by case-insensitive name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.variants
            .iter()
            .position(|variant| variant.eq_ignore_ascii_case(name))
    }
}

/// The primitive kinds the coercer can produce.
#[derive(Debug, Clone, Copy)]
pub enum ScalarKind {
    /// Passthrough text, trimmed.
    Text,
    /// Unique identifier.
    Uuid,
    /// A single character.
    Char,
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Double-precision float.
    Double,
    /// Locale-naive date-time, tagged per the declaring field.
    DateTime(DateKind),
    /// Enumeration resolved through a static name table.
    Enum(&'static EnumTable),
}

impl ScalarKind {
    /// Wire-facing type name used in error lines.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text => "String",
            Self::Uuid => "Guid",
            Self::Char => "Char",
            Self::Byte => "Byte",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Double => "Double",
            Self::DateTime(_) => "DateTime",
            Self::Enum(table) => table.type_name,
        }
    }
}

/// A successfully coerced scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// Trimmed text.
    Text(String),
    /// Unique identifier.
    Uuid(Uuid),
    /// Single character.
    Char(char),
    /// Unsigned 8-bit integer.
    Byte(u8),
    /// Signed 16-bit integer.
    Int16(i16),
    /// Signed 32-bit integer.
    Int32(i32),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Double-precision float.
    Double(f64),
    /// Parsed stamp plus the declared interpretation.
    DateTime(NaiveDateTime, DateKind),
    /// Index into the declaring [`EnumTable`].
    Enum(usize),
}

/// A kind-specific parse failure.
///
/// The messages are part of the wire contract: they appear verbatim in
/// aggregated `Error on (<TypeName>) property '<Field>': ...` lines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoerceError {
    /// Numeric text did not parse.
    #[error("Input string was not in a correct format.")]
    BadNumber,
    /// Identifier text did not parse.
    #[error("Unrecognized Guid format.")]
    BadGuid,
    /// Character text was not exactly one character.
    #[error("String must be exactly one character long.")]
    BadChar,
    /// Date-time text matched no supported layout.
    #[error("String was not recognized as a valid DateTime.")]
    BadDateTime,
    /// No enum variant matched the text.
    #[error("Requested value '{0}' was not found.")]
    UnknownVariant(String),
}

/// Converts a raw string into a typed scalar.
///
/// Input is trimmed before parsing, so `" 42 "` coerces to the integer
/// `42` and text values lose surrounding whitespace.
///
/// # Example
///
/// ```
/// use gantry_bind::{coerce, ScalarKind, ScalarValue};
///
/// let value = coerce(&ScalarKind::Int32, " 42 ").unwrap();
/// assert_eq!(value, ScalarValue::Int32(42));
/// ```
pub fn coerce(kind: &ScalarKind, raw: &str) -> Result<ScalarValue, CoerceError> {
    let value = raw.trim();
    match kind {
        ScalarKind::Text => Ok(ScalarValue::Text(value.to_string())),
        ScalarKind::Uuid => Uuid::parse_str(value)
            .map(ScalarValue::Uuid)
            .map_err(|_| CoerceError::BadGuid),
        ScalarKind::Char => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(ScalarValue::Char(c)),
                _ => Err(CoerceError::BadChar),
            }
        }
        ScalarKind::Byte => value
            .parse()
            .map(ScalarValue::Byte)
            .map_err(|_| CoerceError::BadNumber),
        ScalarKind::Int16 => value
            .parse()
            .map(ScalarValue::Int16)
            .map_err(|_| CoerceError::BadNumber),
        ScalarKind::Int32 => value
            .parse()
            .map(ScalarValue::Int32)
            .map_err(|_| CoerceError::BadNumber),
        ScalarKind::Int64 => value
            .parse()
            .map(ScalarValue::Int64)
            .map_err(|_| CoerceError::BadNumber),
        ScalarKind::Double => value
            .parse()
            .map(ScalarValue::Double)
            .map_err(|_| CoerceError::BadNumber),
        ScalarKind::DateTime(date_kind) => parse_date_time(value)
            .map(|stamp| ScalarValue::DateTime(stamp, *date_kind))
            .ok_or(CoerceError::BadDateTime),
        ScalarKind::Enum(table) => table
            .lookup(value)
            .map(ScalarValue::Enum)
            .ok_or_else(|| CoerceError::UnknownVariant(value.to_string())),
    }
}

/// Supported date-time layouts, tried in order.
const DATE_TIME_LAYOUTS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_LAYOUTS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d"];

fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    for layout in DATE_TIME_LAYOUTS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(value, layout) {
            return Some(stamp);
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(value, layout) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}
