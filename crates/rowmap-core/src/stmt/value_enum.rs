use super::Value;

/// A variant of an enumeration, identified by its ordinal and its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueEnum {
    pub variant: usize,
    pub name: String,
}

impl From<ValueEnum> for Value {
    fn from(value: ValueEnum) -> Self {
        Self::Enum(value)
    }
}
