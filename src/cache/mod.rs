//! Caching layer for recipe documents and thumbnails

pub mod image_cache;
pub mod key;
pub mod observer;
pub mod record_cache;

pub use image_cache::ImageCache;
pub use key::CacheKey;
pub use observer::{CacheEvent, CacheKind, CacheObserver, LogObserver, RecordingObserver};
pub use record_cache::{fetch_recipe_cached, RecordCache};

/// Outcome of a cache read
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// A usable artifact was read
    Hit(T),
    /// Nothing is stored under the id
    Miss,
    /// An artifact exists but is unusable; callers treat it as a miss
    Corrupt(String),
}

impl<T> Lookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Miss | Lookup::Corrupt(_) => None,
        }
    }
}

/// Default cache directory: ~/.cache/recipe_finder on Linux
pub fn default_cache_dir() -> std::path::PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("recipe_finder")
}

/// Replace `path` with `bytes` so readers see the old file or the new one,
/// never a partial write. The temporary sibling is removed on failure.
pub(crate) fn write_atomic(path: &std::path::Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    let result = std::fs::write(&tmp, bytes).and_then(|()| std::fs::rename(&tmp, path));
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

/// Creates the cache directory, logging instead of failing
pub(crate) fn ensure_dir(dir: &std::path::Path) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        log::warn!("Failed to create cache directory {:?}: {}", dir, e);
    }
}
