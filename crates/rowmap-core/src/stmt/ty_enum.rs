use super::{Type, Value, ValueEnum};
use crate::{Error, Result};

use serde::Deserialize;

/// An enumeration type: a name and its variants, in ordinal order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct TypeEnum {
    pub name: String,
    pub variants: Vec<String>,
}

impl TypeEnum {
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the variant at `ordinal`.
    pub fn value(&self, ordinal: usize) -> Option<Value> {
        self.variants.get(ordinal).map(|name| {
            Value::Enum(ValueEnum {
                variant: ordinal,
                name: name.clone(),
            })
        })
    }

    /// Returns the ordinal of the variant called `name`.
    ///
    /// An exact match is preferred; otherwise names are compared ignoring
    /// ASCII case.
    pub fn ordinal_of(&self, name: &str) -> Option<usize> {
        self.variants
            .iter()
            .position(|variant| variant == name)
            .or_else(|| {
                self.variants
                    .iter()
                    .position(|variant| variant.eq_ignore_ascii_case(name))
            })
    }

    /// Converts a stored representation into a variant of this enum.
    ///
    /// Accepts the variant name, the ordinal as any integer, or an enum value
    /// whose name or ordinal belongs to this enum. Anything else is a type
    /// conversion error. Null passes through.
    pub fn convert(&self, value: Value) -> Result<Value> {
        let ordinal = match &value {
            Value::Null => return Ok(Value::Null),
            Value::String(name) => self.ordinal_of(name.trim()),
            Value::Enum(variant) => self.ordinal_of(&variant.name).or_else(|| {
                (variant.variant < self.variants.len()).then_some(variant.variant)
            }),
            other => other
                .as_i128()
                .and_then(|wide| usize::try_from(wide).ok()),
        };

        match ordinal.and_then(|ordinal| self.value(ordinal)) {
            Some(value) => Ok(value),
            None => Err(Error::type_conversion(value, self.name.clone())),
        }
    }
}

impl From<&TypeEnum> for Type {
    fn from(value: &TypeEnum) -> Self {
        Self::Enum(value.clone())
    }
}
