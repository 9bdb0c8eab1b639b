use super::{Binding, CacheKey, Coercion, Construction, MappingPlan};
use crate::Settings;
use rowmap_core::{
    err,
    schema::{Build, Setter, TargetType},
    stmt::{Type, Value},
    Result, RowAccess,
};

use std::{fmt, sync::Arc};

type MapFn<T> = Box<dyn Fn(&dyn RowAccess) -> Result<T> + Send + Sync>;

/// A reusable transform from the current row of a result set to a `T`.
///
/// Everything that depends on the shape of the result set was resolved when
/// the mapper was built. Mapping a row only reads, coerces and writes.
pub struct CompiledMapper<T> {
    key: CacheKey,
    map: MapFn<T>,
}

impl<T> CompiledMapper<T> {
    pub fn new<F>(key: CacheKey, map: F) -> Self
    where
        F: Fn(&dyn RowAccess) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            key,
            map: Box::new(map),
        }
    }

    /// Maps the row `row` is currently positioned on.
    pub fn map(&self, row: &dyn RowAccess) -> Result<T> {
        (self.map)(row)
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }
}

impl<T> fmt::Debug for CompiledMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledMapper")
            .field("key", &self.key)
            .finish()
    }
}

/// Reads one column of the current row into one slot.
struct Reader {
    index: usize,
    column: String,
    field: String,
    ty: Type,
    nullable: bool,
    coercion: Coercion,
}

impl Reader {
    fn new(binding: Binding) -> Reader {
        Reader {
            index: binding.column.index,
            column: binding.column.name,
            field: binding.name,
            ty: binding.ty,
            nullable: binding.nullable,
            coercion: binding.coercion,
        }
    }

    fn read(&self, row: &dyn RowAccess) -> Result<Value> {
        self.coercion
            .read(row, self.index, &self.ty, self.nullable)
            .map_err(|e| {
                e.context(err!(
                    "failed to read column `{}` into `{}`",
                    self.column,
                    self.field
                ))
            })
    }
}

struct Writer<T> {
    reader: Reader,
    setter: Setter<T>,
}

enum Create<T> {
    Default(Arc<dyn Fn() -> T + Send + Sync>),
    Constructor { build: Build<T>, args: Vec<Reader> },
}

/// Closes over `plan`, producing the mapper for its query shape.
///
/// `tracking` asks for change tracking to be enabled on every mapped
/// instance. When `target` cannot track every write, a warning is logged
/// and instances are returned untracked.
pub fn synthesize<T: 'static>(
    key: CacheKey,
    plan: MappingPlan,
    target: &TargetType<T>,
    settings: &Settings,
    tracking: bool,
) -> Result<CompiledMapper<T>> {
    let create = match plan.construction {
        Construction::Default => match target.default_constructor_fn() {
            Some(ctor) => Create::Default(ctor.clone()),
            None => return Err(rowmap_core::Error::no_usable_constructor(&target.name)),
        },
        Construction::Constructor(index) => {
            let Some(ctor) = target.constructors.get(index) else {
                return Err(err!(
                    "constructor {index} of {} does not exist",
                    target.name
                ));
            };

            Create::Constructor {
                build: ctor.build().clone(),
                args: plan.constructor.into_iter().map(Reader::new).collect(),
            }
        }
    };

    let writers = plan
        .fields
        .into_iter()
        .map(|binding| -> Result<Writer<T>> {
            let field = target.field_at(field_index(&binding)?);
            let Some(setter) = field.setter() else {
                return Err(err!(
                    "field `{}` of {} is read-only",
                    field.name.app_name,
                    target.name
                ));
            };

            Ok(Writer {
                setter: setter.clone(),
                reader: Reader::new(binding),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let enable_tracking = if tracking {
        tracking_hook(&key, target)
    } else {
        None
    };

    let ignore_db_null = settings.ignore_db_null;

    let map = move |row: &dyn RowAccess| -> Result<T> {
        let mut instance = match &create {
            Create::Default(ctor) => ctor(),
            Create::Constructor { build, args } => {
                let values = args
                    .iter()
                    .map(|reader| reader.read(row))
                    .collect::<Result<Vec<_>>>()?;
                build(values)?
            }
        };

        for writer in &writers {
            if ignore_db_null && row.is_null(writer.reader.index) {
                continue;
            }

            let value = writer.reader.read(row)?;
            (writer.setter)(&mut instance, value).map_err(|e| {
                e.context(err!(
                    "failed to set `{}` from column `{}`",
                    writer.reader.field,
                    writer.reader.column
                ))
            })?;
        }

        if let Some(enable) = &enable_tracking {
            enable(&mut instance);
        }

        Ok(instance)
    };

    Ok(CompiledMapper::new(key, map))
}

fn field_index(binding: &Binding) -> Result<usize> {
    match binding.target {
        super::BindingTarget::Field(index) => Ok(index),
        super::BindingTarget::Argument(_) => Err(err!(
            "constructor argument `{}` bound as a field",
            binding.name
        )),
    }
}

fn tracking_hook<T>(
    key: &CacheKey,
    target: &TargetType<T>,
) -> Option<rowmap_core::schema::TrackingHook<T>> {
    let Some(hook) = target.tracking_hook() else {
        tracing::warn!(
            %key,
            target = %target.name,
            "change tracking requested but the target type does not support it; \
             mapping untracked instances"
        );
        return None;
    };

    if let Some(field) = target.untrackable_field() {
        tracing::warn!(
            %key,
            target = %target.name,
            field = %field.name.app_name,
            "change tracking requested but a writable field cannot be tracked; \
             mapping untracked instances"
        );
        return None;
    }

    Some(hook.clone())
}
