use crate::error::CacheError;

/// Longest identifier accepted as a file name stem
pub const MAX_KEY_LEN: usize = 64;

/// A recipe identifier that is safe to use as a file name stem
///
/// TheMealDB ids are numeric strings, but they arrive over the network, so
/// anything that could escape the cache directory is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(id: &str) -> Result<Self, CacheError> {
        let valid = !id.is_empty()
            && id.len() <= MAX_KEY_LEN
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if valid {
            Ok(Self(id.to_string()))
        } else {
            Err(CacheError::InvalidKey(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the serialized recipe document
    pub fn record_file(&self) -> String {
        format!("{}_recipe.json", self.0)
    }

    /// File name of the cached image
    pub fn image_file(&self) -> String {
        format!("{}.jpg", self.0)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_mealdb_ids() {
        assert_eq!(CacheKey::new("52772").unwrap().as_str(), "52772");
        assert!(CacheKey::new("meal_52772-b").is_ok());
    }

    #[test]
    fn test_file_names() {
        let key = CacheKey::new("52772").unwrap();
        assert_eq!(key.record_file(), "52772_recipe.json");
        assert_eq!(key.image_file(), "52772.jpg");
    }

    #[test]
    fn test_rejects_traversal_and_separators() {
        let rejected = [
            "",
            "..",
            "../52772",
            "a/b",
            "a\\b",
            "52772.json",
            "id with space",
            "caf\u{e9}",
        ];
        for id in rejected {
            assert!(
                matches!(CacheKey::new(id), Err(CacheError::InvalidKey(_))),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_overlong_ids() {
        let id = "9".repeat(MAX_KEY_LEN + 1);
        assert!(CacheKey::new(&id).is_err());
        assert!(CacheKey::new(&id[..MAX_KEY_LEN]).is_ok());
    }
}
