use crate::stmt;

use indexmap::IndexMap;
use serde::Deserialize;

/// Configured mapping between the columns of a result set and a target type.
///
/// Loaded by the configuration layer; every part is optional. Properties are
/// keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResultMap {
    pub id: String,
    pub properties: IndexMap<String, ResultProperty>,
    pub constructor: Option<ConstructorMap>,
}

/// Maps a column to a field, optionally through a named type handler.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultProperty {
    pub name: String,
    #[serde(default)]
    pub type_handler: Option<String>,
}

/// Declares which constructor builds the target and which columns feed it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConstructorMap {
    pub args: Vec<ConstructorArg>,
}

/// One positional constructor argument.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConstructorArg {
    /// Column the argument is read from
    pub column: String,

    /// Declared argument type, used to select the constructor
    pub ty: stmt::Type,

    /// Name of the field the argument initializes. Defaults to the column.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub nullable: bool,

    #[serde(default)]
    pub type_handler: Option<String>,
}

impl ResultMap {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Maps `column` to the field called `name`.
    pub fn property(mut self, column: impl Into<String>, name: impl Into<String>) -> Self {
        self.properties.insert(
            column.into(),
            ResultProperty {
                name: name.into(),
                type_handler: None,
            },
        );
        self
    }

    /// Maps `column` to the field called `name`, read through the named type
    /// handler.
    pub fn property_with_handler(
        mut self,
        column: impl Into<String>,
        name: impl Into<String>,
        type_handler: impl Into<String>,
    ) -> Self {
        self.properties.insert(
            column.into(),
            ResultProperty {
                name: name.into(),
                type_handler: Some(type_handler.into()),
            },
        );
        self
    }

    pub fn constructor(mut self, args: impl IntoIterator<Item = ConstructorArg>) -> Self {
        self.constructor = Some(ConstructorMap {
            args: args.into_iter().collect(),
        });
        self
    }
}

impl ConstructorArg {
    pub fn new(column: impl Into<String>, ty: stmt::Type) -> Self {
        Self {
            column: column.into(),
            ty,
            name: None,
            nullable: false,
            type_handler: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn type_handler(mut self, name: impl Into<String>) -> Self {
        self.type_handler = Some(name.into());
        self
    }

    /// Name of the field this argument initializes.
    pub fn target_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.column)
    }
}
