//! Type Mapper - source value-type tags to destination SQL type names.
//!
//! The mapping is total on [`ValueType`]; the only failure point is parsing
//! an unknown source tag, which is a hard `UnsupportedType` error rather
//! than a silent default. Only bounded character types take a length suffix.

use serde::{Deserialize, Serialize};

use crate::error::{FerryError, Result};
use crate::value::Value;

/// Resolved value type of a source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Any integer width, signed or unsigned.
    Int,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    Bool,
    /// Bounded text; rendered as VARCHAR with an explicit length.
    Str,
    /// Unbounded text.
    Text,
    Date,
    DateTime,
    Interval,
    Json,
    Binary,
}

impl ValueType {
    /// Resolves a source value-type tag.
    ///
    /// Accepts the tag vocabulary of common dataframe tooling (width-suffixed
    /// numerics, `object`, `datetime64[ns]`, ...) alongside plain names.
    pub fn parse(tag: &str) -> Result<Self> {
        let vt = match tag {
            "int" | "int8" | "int16" | "int32" | "int64" | "uint8" | "uint16" | "uint32"
            | "uint64" => ValueType::Int,
            "float" | "float16" | "float32" => ValueType::Float,
            "float64" | "double" => ValueType::Double,
            "bool" | "boolean" => ValueType::Bool,
            "str" | "string" | "object" | "category" | "complex" => ValueType::Str,
            "text" => ValueType::Text,
            "date" => ValueType::Date,
            "datetime" | "datetime64" | "datetime64[ns]" => ValueType::DateTime,
            "interval" | "timedelta64" => ValueType::Interval,
            "json" | "dict" | "list" => ValueType::Json,
            "bytes" | "bytearray" | "binary" => ValueType::Binary,
            _ => {
                return Err(FerryError::UnsupportedType {
                    tag: tag.to_string(),
                })
            }
        };
        Ok(vt)
    }

    /// Destination SQL type name, without any length suffix.
    pub fn sql_type(self) -> &'static str {
        match self {
            ValueType::Int => "INTEGER",
            ValueType::Float => "FLOAT",
            ValueType::Double => "DOUBLE",
            ValueType::Bool => "BOOLEAN",
            ValueType::Str => "VARCHAR",
            ValueType::Text => "TEXT",
            ValueType::Date => "DATE",
            ValueType::DateTime => "DATETIME",
            ValueType::Interval => "INTERVAL",
            ValueType::Json => "JSON",
            ValueType::Binary => "BLOB",
        }
    }

    /// Whether this type carries an explicit length in DDL.
    pub fn takes_length(self) -> bool {
        matches!(self, ValueType::Str)
    }

    /// The type a value carries at runtime, for tag unification while loading.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Integer(_) => Some(ValueType::Int),
            Value::Float(_) => Some(ValueType::Double),
            Value::Boolean(_) => Some(ValueType::Bool),
            Value::Text(_) => Some(ValueType::Str),
            Value::Date(_) => Some(ValueType::Date),
            Value::DateTime(_) => Some(ValueType::DateTime),
            Value::Binary(_) => Some(ValueType::Binary),
        }
    }

    /// Widens two observed types into one that can hold both.
    pub fn unify(self, other: Self) -> Self {
        use ValueType::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Int, Float) | (Float, Int) => Float,
            (Int, Double) | (Double, Int) => Double,
            (Float, Double) | (Double, Float) => Double,
            (Str, _) | (_, Str) => Str,
            _ => Str,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_width_variants() {
        assert_eq!(ValueType::parse("int64").unwrap(), ValueType::Int);
        assert_eq!(ValueType::parse("uint8").unwrap(), ValueType::Int);
        assert_eq!(ValueType::parse("float32").unwrap(), ValueType::Float);
        assert_eq!(ValueType::parse("float64").unwrap(), ValueType::Double);
        assert_eq!(ValueType::parse("datetime64[ns]").unwrap(), ValueType::DateTime);
        assert_eq!(ValueType::parse("object").unwrap(), ValueType::Str);
    }

    #[test]
    fn unknown_tag_is_hard_error() {
        let err = ValueType::parse("invalid_type").unwrap_err();
        assert!(matches!(
            err,
            crate::error::FerryError::UnsupportedType { ref tag } if tag == "invalid_type"
        ));
    }

    #[test]
    fn sql_type_names() {
        assert_eq!(ValueType::Int.sql_type(), "INTEGER");
        assert_eq!(ValueType::Double.sql_type(), "DOUBLE");
        assert_eq!(ValueType::Str.sql_type(), "VARCHAR");
        assert_eq!(ValueType::Text.sql_type(), "TEXT");
        assert!(ValueType::Str.takes_length());
        assert!(!ValueType::Text.takes_length());
    }

    #[test]
    fn unification_widens() {
        assert_eq!(ValueType::Int.unify(ValueType::Double), ValueType::Double);
        assert_eq!(ValueType::Int.unify(ValueType::Str), ValueType::Str);
        assert_eq!(ValueType::Bool.unify(ValueType::Bool), ValueType::Bool);
        assert_eq!(ValueType::Bool.unify(ValueType::Int), ValueType::Str);
    }
}
