use super::{Constructor, Field};
use crate::{stmt, Result};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// Describes how rows are turned into values of `T`: how to construct one and
/// which fields can be written afterwards.
///
/// A descriptor is built once per type and shared; mapping never inspects `T`
/// any other way.
pub struct TargetType<T> {
    /// Type name, used in errors and logs
    pub name: String,

    /// Fields, keyed by their application name
    pub fields: IndexMap<String, Field<T>>,

    /// Constructors taking arguments
    pub constructors: Vec<Constructor<T>>,

    default_constructor: Option<Arc<dyn Fn() -> T + Send + Sync>>,

    change_tracking: Option<TrackingHook<T>>,
}

/// Turns change tracking on for a fully populated instance.
pub type TrackingHook<T> = Arc<dyn Fn(&mut T) + Send + Sync>;

impl<T> TargetType<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            constructors: vec![],
            default_constructor: None,
            change_tracking: None,
        }
    }

    /// Sets the parameterless constructor.
    pub fn default_constructor<F>(mut self, f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.default_constructor = Some(Arc::new(f));
        self
    }

    /// Adds a constructor taking arguments of the given types.
    pub fn constructor<F>(mut self, args: Vec<stmt::Type>, build: F) -> Self
    where
        F: Fn(Vec<stmt::Value>) -> Result<T> + Send + Sync + 'static,
    {
        self.constructors.push(Constructor::new(args, build));
        self
    }

    pub fn field(mut self, field: Field<T>) -> Self {
        self.fields.insert(field.name.app_name.clone(), field);
        self
    }

    /// Declares that populated instances can start tracking changes by
    /// calling `enable`.
    pub fn change_tracking<F>(mut self, enable: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.change_tracking = Some(Arc::new(enable));
        self
    }

    pub fn tracking_hook(&self) -> Option<&TrackingHook<T>> {
        self.change_tracking.as_ref()
    }

    pub fn default_constructor_fn(&self) -> Option<&Arc<dyn Fn() -> T + Send + Sync>> {
        self.default_constructor.as_ref()
    }

    /// Finds the constructor whose argument types are exactly `args`.
    pub fn find_constructor(&self, args: &[stmt::Type]) -> Option<&Constructor<T>> {
        self.constructors.iter().find(|ctor| ctor.accepts(args))
    }

    /// Index of the field named `name`, preferring an exact match over one
    /// that ignores ASCII case.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.get_index_of(name).or_else(|| {
            self.fields
                .keys()
                .position(|key| key.eq_ignore_ascii_case(name))
        })
    }

    /// Index of the field explicitly mapped to `column`.
    pub fn field_index_by_column(&self, column: &str) -> Option<usize> {
        let declared = || {
            self.fields
                .values()
                .enumerate()
                .filter_map(|(index, field)| Some((index, field.name.storage_name.as_deref()?)))
        };

        declared()
            .find(|(_, storage_name)| *storage_name == column)
            .or_else(|| {
                declared().find(|(_, storage_name)| storage_name.eq_ignore_ascii_case(column))
            })
            .map(|(index, _)| index)
    }

    pub fn field_at(&self, index: usize) -> &Field<T> {
        &self.fields[index]
    }

    /// The first writable field that a change-tracking decorator could not
    /// observe.
    pub fn untrackable_field(&self) -> Option<&Field<T>> {
        self.fields
            .values()
            .find(|field| field.is_writable() && !field.trackable)
    }
}

impl<T> fmt::Debug for TargetType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("constructors", &self.constructors)
            .field("default_constructor", &self.default_constructor.is_some())
            .field("change_tracking", &self.change_tracking.is_some())
            .finish()
    }
}
