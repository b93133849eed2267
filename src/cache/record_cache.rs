use super::observer::{CacheEvent, CacheKind, CacheObserver, LogObserver};
use super::{ensure_dir, write_atomic, CacheKey, Lookup};
use crate::api::RecipeSource;
use crate::error::{CacheError, CacheResult, SourceResult};
use crate::models::RecipeRecord;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Persistent cache for recipe details
/// Stores one JSON document per recipe id to avoid redundant API calls
pub struct RecordCache {
    cache_dir: PathBuf,
    observer: Arc<dyn CacheObserver>,
}

impl RecordCache {
    /// Create a record cache that logs its events
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self::with_observer(cache_dir, Arc::new(LogObserver))
    }

    pub fn with_observer(cache_dir: impl Into<PathBuf>, observer: Arc<dyn CacheObserver>) -> Self {
        let cache_dir = cache_dir.into();
        ensure_dir(&cache_dir);
        Self {
            cache_dir,
            observer,
        }
    }

    /// Get the cache directory path
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the full path for a cached recipe document
    pub fn path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.record_file())
    }

    fn emit(&self, event: CacheEvent) {
        self.observer.on_event(&event);
    }

    fn key(&self, id: &str) -> Option<CacheKey> {
        match CacheKey::new(id) {
            Ok(key) => Some(key),
            Err(_) => {
                self.emit(CacheEvent::InvalidKey {
                    kind: CacheKind::Record,
                    id: id.to_string(),
                });
                None
            }
        }
    }

    /// Check if a recipe document is present (it may still be corrupt)
    pub fn contains(&self, id: &str) -> bool {
        CacheKey::new(id)
            .map(|key| self.path(&key).is_file())
            .unwrap_or(false)
    }

    /// Get a recipe from cache
    pub fn get(&self, id: &str) -> Lookup<RecipeRecord> {
        let Some(key) = self.key(id) else {
            return Lookup::Miss;
        };
        let lookup = match std::fs::read(self.path(&key)) {
            Ok(bytes) => match serde_json::from_slice::<RecipeRecord>(&bytes) {
                Ok(record) if record.id == id => Lookup::Hit(record),
                Ok(record) => Lookup::Corrupt(format!("document belongs to id {:?}", record.id)),
                Err(e) => Lookup::Corrupt(e.to_string()),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Lookup::Miss,
            Err(e) => Lookup::Corrupt(e.to_string()),
        };

        let id = id.to_string();
        let kind = CacheKind::Record;
        self.emit(match &lookup {
            Lookup::Hit(_) => CacheEvent::Hit { kind, id },
            Lookup::Miss => CacheEvent::Miss { kind, id },
            Lookup::Corrupt(reason) => CacheEvent::Corrupt {
                kind,
                id,
                reason: reason.clone(),
            },
        });
        lookup
    }

    /// Store a recipe, replacing any previous document for the same id
    pub fn put(&self, record: &RecipeRecord) -> CacheResult<PathBuf> {
        let result = self.write(record);
        let id = record.id.clone();
        let kind = CacheKind::Record;
        self.emit(match &result {
            Ok(_) => CacheEvent::Stored { kind, id },
            Err(CacheError::InvalidKey(_)) => CacheEvent::InvalidKey { kind, id },
            Err(e) => CacheEvent::WriteFailed {
                kind,
                id,
                reason: e.to_string(),
            },
        });
        result
    }

    fn write(&self, record: &RecipeRecord) -> CacheResult<PathBuf> {
        let key = CacheKey::new(&record.id)?;
        std::fs::create_dir_all(&self.cache_dir)?;
        let content = serde_json::to_string_pretty(record)?;
        let path = self.path(&key);
        write_atomic(&path, content.as_bytes())?;
        Ok(path)
    }
}

/// Fetch a recipe, checking cache first
///
/// Only successful fetches are written back; a failed fetch leaves the cache
/// untouched so the next call asks the source again.
pub fn fetch_recipe_cached<S>(
    cache: &RecordCache,
    source: &S,
    id: &str,
) -> SourceResult<RecipeRecord>
where
    S: RecipeSource + ?Sized,
{
    if let Lookup::Hit(record) = cache.get(id) {
        return Ok(record);
    }

    log::info!("Cache miss for recipe {}, fetching from TheMealDB", id);
    let record = source.fetch_by_id(id)?;

    // Write failures are already reported to the observer
    let _ = cache.put(&record);

    Ok(record)
}
