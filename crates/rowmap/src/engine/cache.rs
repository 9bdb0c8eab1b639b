use super::CompiledMapper;
use crate::Request;
use rowmap_core::{err, Result};

use std::{
    any::{Any, TypeId},
    collections::{
        hash_map::{DefaultHasher, Entry},
        HashMap,
    },
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, PoisonError, RwLock},
};

/// Identifies one query shape: a statement and the position of the result
/// set within its response, plus the options a mapper for it is built with.
///
/// Two keys for the same statement compare unequal when their options differ,
/// so deserializers with different settings can share a cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    id: String,
    ignore_db_null: bool,
    change_tracking: bool,
}

impl CacheKey {
    /// Key for `request`'s result set at `result_index`, taking the request's
    /// change tracking flag.
    pub fn new(result_index: usize, request: &Request) -> CacheKey {
        CacheKey {
            id: format!("Index:{result_index}_{}", request.statement.identity()),
            ignore_db_null: false,
            change_tracking: request.change_tracking,
        }
    }

    pub fn ignore_db_null(mut self, ignore_db_null: bool) -> CacheKey {
        self.ignore_db_null = ignore_db_null;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

type Erased = Arc<dyn Any + Send + Sync>;

type Entries = HashMap<CacheKey, HashMap<TypeId, Erased>>;

const SHARDS: usize = 16;

/// Compiled mappers, by query shape and target type.
///
/// Entries never expire. Keys are spread over independently locked shards, so
/// storing a mapper only blocks lookups that hash to the same shard.
/// Concurrent misses on one key may each build a mapper; the first one stored
/// is kept and handed to every caller.
pub struct MapperCache {
    shards: Box<[RwLock<Entries>]>,
}

impl MapperCache {
    pub fn new() -> MapperCache {
        MapperCache {
            shards: (0..SHARDS).map(|_| RwLock::default()).collect(),
        }
    }

    fn shard_for(&self, key: &CacheKey) -> &RwLock<Entries> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % self.shards.len()]
    }

    /// Returns the mapper stored for `key` and `T`, if any.
    pub fn get<T: 'static>(&self, key: &CacheKey) -> Option<Arc<CompiledMapper<T>>> {
        let entries = self
            .shard_for(key)
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let erased = entries.get(key)?.get(&TypeId::of::<T>())?.clone();
        erased.downcast().ok()
    }

    /// Returns the mapper stored for `key` and `T`, calling `build` to create
    /// it on a miss.
    ///
    /// `build` runs without any lock held. A failed build stores nothing, so
    /// the next call for the key builds again.
    pub fn get_or_build<T, F>(&self, key: CacheKey, build: F) -> Result<Arc<CompiledMapper<T>>>
    where
        T: 'static,
        F: FnOnce(CacheKey) -> Result<CompiledMapper<T>>,
    {
        if let Some(mapper) = self.get::<T>(&key) {
            tracing::trace!(%key, "mapper cache hit");
            return Ok(mapper);
        }

        let built = Arc::new(build(key.clone())?);

        let mut entries = self
            .shard_for(&key)
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match entries.entry(key).or_default().entry(TypeId::of::<T>()) {
            Entry::Occupied(entry) => {
                tracing::warn!(
                    key = %built.key(),
                    "mapper built concurrently for the same key; discarding this one"
                );
                entry
                    .get()
                    .clone()
                    .downcast()
                    .map_err(|_| err!("mapper cached for `{}` has another type", built.key()))
            }
            Entry::Vacant(entry) => {
                entry.insert(built.clone());
                Ok(built)
            }
        }
    }

    /// Number of cached mappers.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| {
                shard
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .values()
                    .map(HashMap::len)
                    .sum::<usize>()
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.write().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }
}

impl Default for MapperCache {
    fn default() -> MapperCache {
        MapperCache::new()
    }
}

impl fmt::Debug for MapperCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperCache")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowmap_core::Error;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Barrier,
    };

    fn constant(key: CacheKey, n: i64) -> CompiledMapper<i64> {
        CompiledMapper::new(key, move |_| Ok(n))
    }

    #[test]
    fn key_format() {
        let key = CacheKey::new(2, &Request::named("Users.GetById"));
        assert_eq!(key.as_str(), "Index:2_Users.GetById");

        let key = CacheKey::new(0, &Request::sql("select 1"));
        assert_eq!(key.to_string(), "Index:0_select 1");
    }

    #[test]
    fn options_are_part_of_the_key() {
        let plain = CacheKey::new(0, &Request::sql("q"));
        let tracked = CacheKey::new(0, &Request::sql("q").change_tracking(true));
        let skipping = plain.clone().ignore_db_null(true);

        assert_ne!(plain, tracked);
        assert_ne!(plain, skipping);
        assert_eq!(skipping.as_str(), plain.as_str());
    }

    #[test]
    fn builds_once() {
        let cache = MapperCache::new();
        let key = CacheKey::new(0, &Request::sql("q"));
        let builds = AtomicUsize::new(0);

        for _ in 0..3 {
            cache
                .get_or_build(key.clone(), |key| {
                    builds.fetch_add(1, Ordering::SeqCst);
                    Ok(constant(key, 1))
                })
                .unwrap();
        }

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn scoped_by_target_type() {
        let cache = MapperCache::new();
        let key = CacheKey::new(0, &Request::sql("q"));

        cache
            .get_or_build(key.clone(), |key| Ok(constant(key, 1)))
            .unwrap();
        cache
            .get_or_build(key.clone(), |key| {
                Ok(CompiledMapper::new(key, |_| Ok(String::from("one"))))
            })
            .unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.get::<i64>(&key).is_some());
        assert!(cache.get::<bool>(&key).is_none());
    }

    #[test]
    fn failed_build_is_not_cached() {
        let cache = MapperCache::new();
        let key = CacheKey::new(0, &Request::sql("q"));

        let err = cache
            .get_or_build::<i64, _>(key.clone(), |_| Err(Error::no_usable_constructor("i64")))
            .unwrap_err();
        assert!(err.is_no_usable_constructor());
        assert!(cache.is_empty());

        cache
            .get_or_build(key.clone(), |key| Ok(constant(key, 7)))
            .unwrap();
        assert!(cache.get::<i64>(&key).is_some());
    }

    #[test]
    fn keys_spread_over_shards() {
        let cache = MapperCache::new();

        for n in 0..64 {
            let key = CacheKey::new(0, &Request::sql(format!("q{n}")));
            cache.get_or_build(key, |key| Ok(constant(key, n))).unwrap();
        }

        let used = cache
            .shards
            .iter()
            .filter(|shard| !shard.read().unwrap().is_empty())
            .count();
        assert_eq!(cache.len(), 64);
        assert!(used > 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_callers_converge() {
        let cache = MapperCache::new();
        let key = CacheKey::new(0, &Request::sql("q"));
        let barrier = Barrier::new(8);

        let mappers: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|n| {
                    let (cache, key, barrier) = (&cache, key.clone(), &barrier);
                    s.spawn(move || {
                        barrier.wait();
                        cache
                            .get_or_build(key, |key| Ok(constant(key, n)))
                            .unwrap()
                    })
                })
                .collect();

            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let stored = cache.get::<i64>(&key).unwrap();
        assert_eq!(cache.len(), 1);
        for mapper in &mappers {
            assert!(Arc::ptr_eq(mapper, &stored));
        }
    }
}
