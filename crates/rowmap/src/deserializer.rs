use crate::{
    engine::{self, CacheKey, CompiledMapper, MapperCache, TypeHandlerRegistry},
    Entity, Request, Settings,
};
use rowmap_core::{Result, RowSource};

use std::sync::Arc;

/// Maps the rows of a result set onto entities.
///
/// Cloning is cheap: clones share the mapper cache and the type handler
/// registry.
#[derive(Debug, Clone, Default)]
pub struct Deserializer {
    cache: Arc<MapperCache>,
    handlers: Arc<TypeHandlerRegistry>,
    settings: Settings,
}

impl Deserializer {
    pub fn new(settings: Settings) -> Deserializer {
        Deserializer {
            settings,
            ..Deserializer::default()
        }
    }

    /// Uses `handlers` to resolve type handlers for new mappers.
    pub fn with_handlers(mut self, handlers: Arc<TypeHandlerRegistry>) -> Deserializer {
        self.handlers = handlers;
        self
    }

    /// Stores mappers in `cache`, which may be shared with other
    /// deserializers.
    pub fn with_cache(mut self, cache: Arc<MapperCache>) -> Deserializer {
        self.cache = cache;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn handlers(&self) -> &Arc<TypeHandlerRegistry> {
        &self.handlers
    }

    pub fn cache(&self) -> &Arc<MapperCache> {
        &self.cache
    }

    /// Returns the mapper for the current result set of `rows`, building it
    /// on first use.
    pub fn mapper<T, R>(&self, rows: &R, request: &Request) -> Result<Arc<CompiledMapper<T>>>
    where
        T: Entity,
        R: RowSource,
    {
        let result_index = rows.result_index();
        let key =
            CacheKey::new(result_index, request).ignore_db_null(self.settings.ignore_db_null);

        self.cache.get_or_build(key, |key| {
            engine::compile(
                key,
                &T::target_type(),
                &rows.columns(),
                request,
                result_index,
                &self.settings,
                &self.handlers,
            )
        })
    }

    /// Maps the first row of `rows`, or returns `None` when there are no rows.
    pub fn to_single<T, R>(&self, rows: &mut R, request: &Request) -> Result<Option<T>>
    where
        T: Entity,
        R: RowSource,
    {
        if !rows.has_rows() {
            return Ok(None);
        }

        let mapper = self.mapper::<T, R>(rows, request)?;

        if !rows.advance()? {
            return Ok(None);
        }

        mapper.map(&*rows).map(Some)
    }

    /// Maps every row of `rows`.
    pub fn to_list<T, R>(&self, rows: &mut R, request: &Request) -> Result<Vec<T>>
    where
        T: Entity,
        R: RowSource,
    {
        if !rows.has_rows() {
            return Ok(vec![]);
        }

        let mapper = self.mapper::<T, R>(rows, request)?;
        let mut ret = vec![];

        while rows.advance()? {
            ret.push(mapper.map(&*rows)?);
        }

        Ok(ret)
    }

    /// Like [`to_single`](Self::to_single), suspending while the row is
    /// fetched.
    pub async fn to_single_async<T, R>(&self, rows: &mut R, request: &Request) -> Result<Option<T>>
    where
        T: Entity,
        R: RowSource,
    {
        if !rows.has_rows() {
            return Ok(None);
        }

        let mapper = self.mapper::<T, R>(rows, request)?;

        if !rows.advance_async().await? {
            return Ok(None);
        }

        mapper.map(&*rows).map(Some)
    }

    /// Like [`to_list`](Self::to_list), suspending while each row is fetched.
    pub async fn to_list_async<T, R>(&self, rows: &mut R, request: &Request) -> Result<Vec<T>>
    where
        T: Entity,
        R: RowSource,
    {
        if !rows.has_rows() {
            return Ok(vec![]);
        }

        let mapper = self.mapper::<T, R>(rows, request)?;
        let mut ret = vec![];

        while rows.advance_async().await? {
            ret.push(mapper.map(&*rows)?);
        }

        Ok(ret)
    }
}
