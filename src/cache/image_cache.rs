use super::observer::{CacheEvent, CacheKind, CacheObserver, LogObserver};
use super::{ensure_dir, write_atomic, CacheKey, Lookup};
use crate::api::RecipeSource;
use crate::error::{CacheError, CacheResult};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Largest output `resolve` will allocate (width x height)
pub const MAX_RESIZE_PIXELS: u64 = 4096 * 4096;

/// Persistent cache for recipe thumbnails
/// Stores one JPEG per recipe id; resized copies are never written back
pub struct ImageCache {
    cache_dir: PathBuf,
    observer: Arc<dyn CacheObserver>,
}

/// Re-encode a decoded image as JPEG, the single on-disk format
pub fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)?;
    Ok(bytes)
}

impl ImageCache {
    /// Create an image cache that logs its events
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self::with_observer(cache_dir, Arc::new(LogObserver))
    }

    pub fn with_observer(cache_dir: impl Into<PathBuf>, observer: Arc<dyn CacheObserver>) -> Self {
        let cache_dir = cache_dir.into();
        ensure_dir(&cache_dir);
        log::info!("Image cache directory: {:?}", cache_dir);
        Self {
            cache_dir,
            observer,
        }
    }

    /// Get the cache directory path
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the full path for a cached image
    pub fn path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.image_file())
    }

    fn emit(&self, event: CacheEvent) {
        self.observer.on_event(&event);
    }

    /// Check if an image file is present (it may still be undecodable)
    pub fn contains(&self, id: &str) -> bool {
        CacheKey::new(id)
            .map(|key| self.path(&key).is_file())
            .unwrap_or(false)
    }

    /// Get a cached image, decoded
    pub fn get(&self, id: &str) -> Lookup<DynamicImage> {
        let kind = CacheKind::Image;
        let Ok(key) = CacheKey::new(id) else {
            self.emit(CacheEvent::InvalidKey {
                kind,
                id: id.to_string(),
            });
            return Lookup::Miss;
        };

        let lookup = match std::fs::read(self.path(&key)) {
            Ok(bytes) => match image::load_from_memory(&bytes) {
                Ok(img) => Lookup::Hit(img),
                Err(e) => Lookup::Corrupt(e.to_string()),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Lookup::Miss,
            Err(e) => Lookup::Corrupt(e.to_string()),
        };

        let id = id.to_string();
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

    /// Store image bytes, replacing any previous file for the same id
    pub fn put(&self, id: &str, bytes: &[u8]) -> CacheResult<PathBuf> {
        let result = self.write(id, bytes);
        let kind = CacheKind::Image;
        let id = id.to_string();
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

    fn write(&self, id: &str, bytes: &[u8]) -> CacheResult<PathBuf> {
        let key = CacheKey::new(id)?;
        std::fs::create_dir_all(&self.cache_dir)?;
        let path = self.path(&key);
        write_atomic(&path, bytes)?;
        Ok(path)
    }

    fn store(&self, id: &str, img: &DynamicImage) {
        match encode_jpeg(img) {
            Ok(jpeg) => {
                // Write failures are already reported to the observer
                let _ = self.put(id, &jpeg);
            }
            Err(e) => self.emit(CacheEvent::WriteFailed {
                kind: CacheKind::Image,
                id: id.to_string(),
                reason: CacheError::from(e).to_string(),
            }),
        }
    }

    /// Load an image from cache or download it, then scale it to exactly
    /// `width` x `height`.
    ///
    /// Returns `None` when the image is neither cached nor downloadable, or
    /// when the requested size is empty or above [`MAX_RESIZE_PIXELS`].
    /// Nothing is cached on failure.
    pub fn resolve<S>(
        &self,
        source: &S,
        id: &str,
        source_url: &str,
        width: u32,
        height: u32,
    ) -> Option<DynamicImage>
    where
        S: RecipeSource + ?Sized,
    {
        let pixels = u64::from(width) * u64::from(height);
        if pixels == 0 || pixels > MAX_RESIZE_PIXELS {
            log::warn!("Refusing to resize image for {} to {}x{}", id, width, height);
            return None;
        }

        let original = match self.get(id) {
            Lookup::Hit(img) => img,
            Lookup::Miss | Lookup::Corrupt(_) => {
                log::info!("Image cache miss for {}, fetching {}", id, source_url);
                let bytes = match source.fetch_bytes(source_url) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        log::warn!("Failed to fetch image for {}: {}", id, e);
                        return None;
                    }
                };
                let img = match image::load_from_memory(&bytes) {
                    Ok(img) => img,
                    Err(e) => {
                        log::warn!("Downloaded image for {} is not decodable: {}", id, e);
                        return None;
                    }
                };
                self.store(id, &img);
                img
            }
        };

        Some(original.resize_exact(width, height, FilterType::Lanczos3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RecordingObserver;
    use image::{GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn create_test_cache() -> (ImageCache, Arc<RecordingObserver>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let observer = Arc::new(RecordingObserver::new());
        let cache = ImageCache::with_observer(temp_dir.path(), observer.clone());
        (cache, observer, temp_dir)
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 120, 40]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_path_construction() {
        let (cache, _observer, _temp_dir) = create_test_cache();
        let key = CacheKey::new("52772").unwrap();
        assert!(cache.path(&key).ends_with("52772.jpg"));
    }

    #[test]
    fn test_get_nonexistent_is_miss() {
        let (cache, _observer, _temp_dir) = create_test_cache();
        assert!(matches!(cache.get("52772"), Lookup::Miss));
        assert!(!cache.contains("52772"));
    }

    #[test]
    fn test_put_and_get_decodes() {
        let (cache, observer, _temp_dir) = create_test_cache();

        cache.put("52772", &png_bytes(40, 30)).unwrap();

        let img = cache.get("52772").into_option().unwrap();
        assert_eq!(img.dimensions(), (40, 30));
        assert_eq!(observer.count(|e| matches!(e, CacheEvent::Stored { .. })), 1);
    }

    #[test]
    fn test_put_overwrites_existing() {
        let (cache, _observer, _temp_dir) = create_test_cache();

        cache.put("52772", &png_bytes(10, 10)).unwrap();
        cache.put("52772", &png_bytes(20, 5)).unwrap();

        assert_eq!(cache.get("52772").into_option().unwrap().dimensions(), (20, 5));
    }

    #[test]
    fn test_failed_replace_keeps_previous_image() {
        let (cache, _observer, temp_dir) = create_test_cache();
        cache.put("52772", &png_bytes(10, 10)).unwrap();

        std::fs::create_dir(temp_dir.path().join("52772.jpg.tmp")).unwrap();
        assert!(matches!(
            cache.put("52772", &png_bytes(20, 5)),
            Err(CacheError::Io(_))
        ));

        assert_eq!(cache.get("52772").into_option().unwrap().dimensions(), (10, 10));
    }

    #[test]
    fn test_undecodable_file_is_corrupt() {
        let (cache, observer, _temp_dir) = create_test_cache();
        cache.put("52772", &[0xFF, 0xD8, 0xFF]).unwrap(); // truncated JPEG

        assert!(matches!(cache.get("52772"), Lookup::Corrupt(_)));
        assert_eq!(observer.count(|e| matches!(e, CacheEvent::Corrupt { .. })), 1);
    }

    #[test]
    fn test_invalid_id_is_rejected() {
        let (cache, _observer, _temp_dir) = create_test_cache();
        assert!(matches!(
            cache.put("../../evil", &png_bytes(2, 2)),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(matches!(cache.get("../../evil"), Lookup::Miss));
    }

    #[test]
    fn test_encode_jpeg_drops_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 6, Rgba([1, 2, 3, 128])));
        let jpeg = encode_jpeg(&img).unwrap();

        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
        assert_eq!(image::load_from_memory(&jpeg).unwrap().dimensions(), (8, 6));
    }
}
