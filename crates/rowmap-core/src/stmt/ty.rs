use super::{TypeEnum, Value};
use crate::{Error, Result};

use serde::Deserialize;
use std::fmt;

/// The type of a column or of a target field.
///
/// Row sources tag every column with one of these, and target type
/// descriptors declare one per field. Nullability is not part of the type;
/// it is carried next to it (see [`Field::nullable`](crate::schema::Field)).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub enum Type {
    /// Boolean value
    Bool,

    /// String type
    String,

    /// Signed 8-bit integer
    I8,

    /// Signed 16-bit integer
    I16,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// Unsigned 8-bit integer
    U8,

    /// Unsigned 16-bit integer
    U16,

    /// Unsigned 32-bit integer
    U32,

    /// Unsigned 64-bit integer
    U64,

    /// 64-bit floating point number
    F64,

    /// Opaque byte string
    Bytes,

    /// 128-bit universally unique identifier
    Uuid,

    /// An enumeration with named variants
    Enum(TypeEnum),

    /// Matches any column type.
    ///
    /// As a column type it is the wildcard slot type handlers can register
    /// against; as a target type it is a generic object slot that accepts
    /// whatever the column holds.
    Any,
}

impl Type {
    pub fn as_enum(&self) -> Option<&TypeEnum> {
        match self {
            Self::Enum(ty) => Some(ty),
            _ => None,
        }
    }

    /// The value a non-nullable slot of this type takes when the column holds
    /// no value.
    pub fn default_value(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::String => Value::String(String::new()),
            Self::I8 => Value::I8(0),
            Self::I16 => Value::I16(0),
            Self::I32 => Value::I32(0),
            Self::I64 => Value::I64(0),
            Self::U8 => Value::U8(0),
            Self::U16 => Value::U16(0),
            Self::U32 => Value::U32(0),
            Self::U64 => Value::U64(0),
            Self::F64 => Value::F64(0.0),
            Self::Bytes => Value::Bytes(vec![]),
            Self::Uuid => Value::Uuid(uuid::Uuid::nil()),
            Self::Enum(ty) => ty.value(0).unwrap_or(Value::Null),
            Self::Any => Value::Null,
        }
    }

    /// Loosely converts `value` to this type.
    ///
    /// Null values are passed through. Numbers convert across widths when the
    /// value fits, strings are parsed, and anything can become a string.
    pub fn cast(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(value);
        }

        Ok(match (self, value) {
            (Self::Any, value) => value,
            (Self::Bool, value) => Value::Bool(cast_bool(value)?),
            (Self::String, Value::String(value)) => Value::String(value),
            (Self::String, Value::Enum(value)) => Value::String(value.name),
            (Self::String, Value::Bytes(value)) => match String::from_utf8(value) {
                Ok(value) => Value::String(value),
                Err(err) => {
                    return Err(Error::type_conversion(
                        Value::Bytes(err.into_bytes()),
                        "String",
                    ))
                }
            },
            (Self::String, value) => Value::String(value.to_string()),
            (Self::I8, value) => Value::I8(value.try_into()?),
            (Self::I16, value) => Value::I16(value.try_into()?),
            (Self::I32, value) => Value::I32(value.try_into()?),
            (Self::I64, value) => Value::I64(value.try_into()?),
            (Self::U8, value) => Value::U8(value.try_into()?),
            (Self::U16, value) => Value::U16(value.try_into()?),
            (Self::U32, value) => Value::U32(value.try_into()?),
            (Self::U64, value) => Value::U64(value.try_into()?),
            (Self::F64, value) => Value::F64(value.try_into()?),
            (Self::Uuid, Value::Bytes(bytes)) => match uuid::Uuid::from_slice(&bytes) {
                Ok(value) => Value::Uuid(value),
                Err(_) => return Err(Error::type_conversion(Value::Bytes(bytes), "Uuid")),
            },
            (Self::Uuid, value) => Value::Uuid(value.try_into()?),
            (Self::Bytes, Value::String(value)) => Value::Bytes(value.into_bytes()),
            (Self::Bytes, Value::Uuid(value)) => Value::Bytes(value.as_bytes().to_vec()),
            (Self::Bytes, value) => Value::Bytes(value.try_into()?),
            (Self::Enum(ty), value) => ty.convert(value)?,
        })
    }
}

fn cast_bool(value: Value) -> Result<bool> {
    if let Some(wide) = value.as_i128() {
        return Ok(wide != 0);
    }

    match value {
        Value::Bool(value) => Ok(value),
        Value::String(ref s) => match s.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            s if s.eq_ignore_ascii_case("true") => Ok(true),
            s if s.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(Error::type_conversion(value.clone(), "bool")),
        },
        value => Err(Error::type_conversion(value, "bool")),
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum(ty) => f.write_str(&ty.name),
            ty => fmt::Debug::fmt(ty, f),
        }
    }
}

impl From<TypeEnum> for Type {
    fn from(value: TypeEnum) -> Self {
        Self::Enum(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cast_passes_null_through() {
        assert_eq!(Type::I32.cast(Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn cast_widens_and_narrows_integers() {
        assert_eq!(Type::I64.cast(Value::I32(7)).unwrap(), Value::I64(7));
        assert_eq!(Type::I8.cast(Value::I64(-3)).unwrap(), Value::I8(-3));
        assert!(Type::U8.cast(Value::I64(300)).is_err());
    }

    #[test]
    fn cast_bool_from_integer_and_string() {
        assert_eq!(Type::Bool.cast(Value::I64(1)).unwrap(), Value::Bool(true));
        assert_eq!(Type::Bool.cast(Value::from("FALSE")).unwrap(), Value::Bool(false));
        assert!(Type::Bool.cast(Value::from("maybe")).is_err());
    }

    #[test]
    fn cast_anything_to_string() {
        assert_eq!(Type::String.cast(Value::I32(42)).unwrap(), Value::from("42"));
        assert_eq!(Type::String.cast(Value::Bool(true)).unwrap(), Value::from("true"));
    }

    #[test]
    fn default_values() {
        assert_eq!(Type::I32.default_value(), Value::I32(0));
        assert_eq!(Type::String.default_value(), Value::from(""));
        assert_eq!(Type::Any.default_value(), Value::Null);
    }

    #[test]
    fn display_uses_enum_name() {
        let ty = Type::from(TypeEnum::new("Status", ["Active", "Closed"]));
        assert_eq!(ty.to_string(), "Status");
        assert_eq!(Type::I64.to_string(), "I64");
    }
}
