use rowmap_core::{
    stmt::{Type, TypeEnum, Value},
    Error, Result, RowAccess,
};

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

/// Reads a column and converts it to a target type.
///
/// Handlers are registered either under a name, for configuration to refer
/// to, or against a `(target, source)` type pair, where `source` may be
/// [`Type::Any`] to match every column type.
pub trait TypeHandler: Send + Sync + fmt::Debug {
    /// Reads the value at `index` of the current row as `target`.
    ///
    /// The handler decides how a null column is represented.
    fn read(&self, row: &dyn RowAccess, index: usize, target: &Type) -> Result<Value>;
}

/// Converts enum names and ordinals into variants of one enum.
///
/// Unrecognized names and out-of-range ordinals are conversion errors.
#[derive(Debug)]
pub struct EnumHandler {
    ty: TypeEnum,
}

impl EnumHandler {
    pub fn new(ty: TypeEnum) -> Self {
        Self { ty }
    }
}

impl TypeHandler for EnumHandler {
    fn read(&self, row: &dyn RowAccess, index: usize, _target: &Type) -> Result<Value> {
        self.ty.convert(row.raw_value(index, &Type::Any)?)
    }
}

/// The set of type handlers available to mappers.
///
/// Shared by reference between every mapper build; registration takes
/// `&self` so handlers can be added while mappers are being built.
#[derive(Debug, Default)]
pub struct TypeHandlerRegistry {
    by_type: RwLock<HashMap<(Type, Type), Arc<dyn TypeHandler>>>,
    named: RwLock<HashMap<String, Arc<dyn TypeHandler>>>,
}

impl TypeHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for reading `source` columns into `target` slots,
    /// replacing any previous handler for the pair.
    pub fn register(&self, target: Type, source: Type, handler: impl TypeHandler + 'static) {
        self.by_type
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((target, source), Arc::new(handler));
    }

    /// Registers `handler` under `name`, replacing any previous handler.
    pub fn register_named(&self, name: impl Into<String>, handler: impl TypeHandler + 'static) {
        self.named
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), Arc::new(handler));
    }

    /// Returns the handler for `enum_ty`, registering one the first time the
    /// enum is seen.
    pub fn register_enum(&self, enum_ty: &TypeEnum) -> Arc<dyn TypeHandler> {
        let key = (Type::Enum(enum_ty.clone()), Type::Any);

        if let Some(handler) = self.lookup(&key) {
            return handler;
        }

        self.by_type
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert_with(|| Arc::new(EnumHandler::new(enum_ty.clone())))
            .clone()
    }

    /// Finds the handler registered for exactly `(target, source)`.
    pub fn try_find(&self, target: &Type, source: &Type) -> Option<Arc<dyn TypeHandler>> {
        self.lookup(&(target.clone(), source.clone()))
    }

    /// Finds the handler registered under `name`.
    pub fn find_named(&self, name: &str) -> Result<Arc<dyn TypeHandler>> {
        self.named
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_type_handler(name))
    }

    fn lookup(&self, key: &(Type, Type)) -> Option<Arc<dyn TypeHandler>> {
        self.by_type
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}
