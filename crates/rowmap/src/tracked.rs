use crate::Entity;
use rowmap_core::{err, schema::TargetType, stmt::Value, Result};

use indexmap::IndexSet;
use std::{ops::Deref, sync::Arc};

/// Wraps an entity and records which of its fields change.
///
/// Mapping into `Tracked<T>` with change tracking requested enables tracking
/// once every field has been populated, so a freshly mapped instance reports
/// no changes. Writes made through [`set`](Tracked::set) or
/// [`update`](Tracked::update) afterwards are recorded.
#[derive(Debug, Clone)]
pub struct Tracked<T> {
    inner: T,
    tracking: bool,
    changed: IndexSet<String>,
    target: Option<Arc<TargetType<T>>>,
}

impl<T> Tracked<T> {
    pub fn new(inner: T) -> Tracked<T> {
        Tracked {
            inner,
            tracking: false,
            changed: IndexSet::new(),
            target: None,
        }
    }

    /// Starts recording changes, forgetting any recorded so far.
    pub fn enable_tracking(&mut self) {
        self.tracking = true;
        self.changed.clear();
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Forgets every recorded change.
    pub fn mark_clean(&mut self) {
        self.changed.clear();
    }

    /// Records that `field` changed. Ignored while tracking is off.
    pub fn record_change(&mut self, field: impl Into<String>) {
        if self.tracking {
            self.changed.insert(field.into());
        }
    }

    /// Names of the fields changed since tracking was enabled or the instance
    /// was last marked clean, in the order they first changed.
    pub fn changed_fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.changed.iter().map(String::as_str)
    }

    pub fn is_changed(&self, field: &str) -> bool {
        self.changed.contains(field)
    }

    /// Mutates the wrapped value with `f`, recording `field` as changed.
    pub fn update(&mut self, field: &str, f: impl FnOnce(&mut T)) {
        f(&mut self.inner);
        self.record_change(field);
    }

    pub fn get(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: Entity> Tracked<T> {
    /// Writes `value` to the field named `field` and records the change.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let target = self
            .target
            .get_or_insert_with(|| Arc::new(T::target_type()))
            .clone();

        let Some(index) = target.field_index(field) else {
            return Err(err!("{} has no field `{field}`", target.name));
        };

        let field = target.field_at(index);
        field.set(&mut self.inner, value.into())?;
        self.record_change(field.name.app_name.as_str());
        Ok(())
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: Entity> Entity for Tracked<T> {
    fn target_type() -> TargetType<Self> {
        let base = T::target_type();
        let wrap: Arc<dyn Fn(T) -> Tracked<T> + Send + Sync> = Arc::new(Tracked::<T>::new);

        let mut target = TargetType::new(format!("Tracked<{}>", base.name));

        if let Some(ctor) = base.default_constructor_fn().cloned() {
            target = target.default_constructor(move || Tracked::new(ctor()));
        }

        target.constructors = base
            .constructors
            .iter()
            .map(|ctor| ctor.map(wrap.clone()))
            .collect();

        for field in base.fields.values() {
            target = target.field(field.project(Tracked::<T>::inner_mut));
        }

        target.change_tracking(Tracked::<T>::enable_tracking)
    }
}
