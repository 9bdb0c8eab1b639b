use crate::{stmt, Error, Result};

use std::{fmt, sync::Arc};

/// Writes a converted value into a field of `T`.
pub type Setter<T> = Arc<dyn Fn(&mut T, stmt::Value) -> Result<()> + Send + Sync>;

/// A field of a target type.
pub struct Field<T> {
    /// The field name
    pub name: FieldName,

    /// The field's type, without nullability
    pub ty: stmt::Type,

    /// True if the field can hold no value (`None` in Rust).
    pub nullable: bool,

    /// Named type handler declared on the field itself.
    pub type_handler: Option<String>,

    /// False if writes to the field cannot be observed by a change-tracking
    /// decorator.
    pub trackable: bool,

    setter: Option<Setter<T>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldName {
    pub app_name: String,
    pub storage_name: Option<String>,
}

impl<T> Field<T> {
    /// A writable field.
    pub fn new<F>(name: impl Into<String>, ty: stmt::Type, setter: F) -> Self
    where
        F: Fn(&mut T, stmt::Value) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            setter: Some(Arc::new(setter)),
            ..Self::read_only(name, ty)
        }
    }

    /// A field without a setter, such as a computed property. Columns that
    /// resolve to it are skipped.
    pub fn read_only(name: impl Into<String>, ty: stmt::Type) -> Self {
        Self {
            name: FieldName {
                app_name: name.into(),
                storage_name: None,
            },
            ty,
            nullable: false,
            type_handler: None,
            trackable: true,
            setter: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Maps the field to a column with a different name.
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.name.storage_name = Some(name.into());
        self
    }

    pub fn type_handler(mut self, name: impl Into<String>) -> Self {
        self.type_handler = Some(name.into());
        self
    }

    pub fn untracked(mut self) -> Self {
        self.trackable = false;
        self
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    pub fn setter(&self) -> Option<&Setter<T>> {
        self.setter.as_ref()
    }

    pub fn set(&self, target: &mut T, value: stmt::Value) -> Result<()> {
        match &self.setter {
            Some(setter) => setter(target, value),
            None => Err(Error::from_args(format_args!(
                "field `{}` is read-only",
                self.name.app_name
            ))),
        }
    }

    /// Lifts the field onto a type that contains a `T`.
    pub fn project<U: 'static>(&self, project: fn(&mut U) -> &mut T) -> Field<U>
    where
        T: 'static,
    {
        Field {
            name: self.name.clone(),
            ty: self.ty.clone(),
            nullable: self.nullable,
            type_handler: self.type_handler.clone(),
            trackable: self.trackable,
            setter: self.setter.clone().map(|setter| {
                Arc::new(move |target: &mut U, value: stmt::Value| {
                    setter(project(target), value)
                }) as Setter<U>
            }),
        }
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            ty: self.ty.clone(),
            nullable: self.nullable,
            type_handler: self.type_handler.clone(),
            trackable: self.trackable,
            setter: self.setter.clone(),
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .field("type_handler", &self.type_handler)
            .field("writable", &self.is_writable())
            .finish()
    }
}
