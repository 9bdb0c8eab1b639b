use super::{TypeHandler, TypeHandlerRegistry};
use rowmap_core::{
    stmt::{Type, Value},
    Result, RowAccess,
};

use std::{fmt, sync::Arc};

/// How one column's raw value becomes a target slot's value.
///
/// Resolved once when a mapper is built; applying it to a row never looks
/// anything up again.
#[derive(Clone)]
pub enum Coercion {
    /// The column already has the target type.
    DirectRead,

    /// The column has the target type and the target accepts null.
    NullableUnwrap,

    /// The target is an enum; names and ordinals are converted.
    Enum(Arc<dyn TypeHandler>),

    /// A registered handler converts the value.
    Handler {
        name: String,
        handler: Arc<dyn TypeHandler>,
    },

    /// Nothing better matched: read the column as-is and cast it loosely.
    Object,
}

impl Coercion {
    /// Resolves the coercion for reading a `source` column into a `target`
    /// slot. The first rule that applies wins:
    ///
    /// 1. a handler named by configuration
    /// 2. the enum handler, when the target is an enum
    /// 3. a direct read, when the types are equal
    /// 4. a handler registered for `(target, source)`
    /// 5. a handler registered for `(target, Any)`
    /// 6. a loose cast
    pub fn resolve(
        handlers: &TypeHandlerRegistry,
        target: &Type,
        nullable: bool,
        source: &Type,
        explicit_handler: Option<&str>,
    ) -> Result<Coercion> {
        if let Some(name) = explicit_handler {
            return Ok(Self::Handler {
                name: name.to_string(),
                handler: handlers.find_named(name)?,
            });
        }

        if let Type::Enum(enum_ty) = target {
            return Ok(Self::Enum(handlers.register_enum(enum_ty)));
        }

        if target == source {
            return Ok(if nullable {
                Self::NullableUnwrap
            } else {
                Self::DirectRead
            });
        }

        for slot in [source, &Type::Any] {
            if let Some(handler) = handlers.try_find(target, slot) {
                return Ok(Self::Handler {
                    name: format!("{target}<-{slot}"),
                    handler,
                });
            }
        }

        Ok(Self::Object)
    }

    /// Reads the value at `index` of the current row.
    ///
    /// Null columns read into non-nullable slots produce the target type's
    /// default, except through a handler, which decides for itself.
    pub fn read(
        &self,
        row: &dyn RowAccess,
        index: usize,
        target: &Type,
        nullable: bool,
    ) -> Result<Value> {
        let value = match self {
            Self::DirectRead | Self::NullableUnwrap => row.raw_value(index, target)?,
            Self::Enum(handler) => handler.read(row, index, target)?,
            Self::Handler { handler, .. } => return handler.read(row, index, target),
            Self::Object => target.cast(row.raw_value(index, &Type::Any)?)?,
        };

        if value.is_null() && !nullable {
            Ok(target.default_value())
        } else {
            Ok(value)
        }
    }

    pub fn is_direct_read(&self) -> bool {
        matches!(self, Self::DirectRead)
    }

    pub fn is_nullable_unwrap(&self) -> bool {
        matches!(self, Self::NullableUnwrap)
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    pub fn is_handler(&self) -> bool {
        matches!(self, Self::Handler { .. })
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object)
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectRead => f.write_str("DirectRead"),
            Self::NullableUnwrap => f.write_str("NullableUnwrap"),
            Self::Enum(_) => f.write_str("Enum"),
            Self::Handler { name, .. } => f.debug_tuple("Handler").field(name).finish(),
            Self::Object => f.write_str("Object"),
        }
    }
}
