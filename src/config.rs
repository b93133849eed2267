use crate::api::DEFAULT_BASE_URL;
use crate::cache::default_cache_dir;
use std::path::PathBuf;
use std::time::Duration;

/// Ingredients searched by "view all", three recipes each
pub const VIEW_ALL_INGREDIENTS: [&str; 3] = ["chicken", "beef", "salmon"];

/// Settings for the recipe finder and its remote source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderConfig {
    /// Directory holding `<id>_recipe.json` and `<id>.jpg` files
    pub cache_dir: PathBuf,
    pub base_url: String,
    /// Timeout for API calls
    pub request_timeout: Duration,
    /// Timeout for thumbnail downloads
    pub image_timeout: Duration,
    /// Maximum number of search hits loaded in full
    pub search_limit: usize,
    pub view_all_ingredients: Vec<String>,
    pub view_all_per_ingredient: usize,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            image_timeout: Duration::from_secs(5),
            search_limit: 10,
            view_all_ingredients: VIEW_ALL_INGREDIENTS.iter().map(|s| s.to_string()).collect(),
            view_all_per_ingredient: 3,
        }
    }
}

impl FinderConfig {
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FinderConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.image_timeout, Duration::from_secs(5));
        assert_eq!(config.search_limit, 10);
        assert_eq!(config.view_all_ingredients, vec!["chicken", "beef", "salmon"]);
        assert_eq!(config.view_all_per_ingredient, 3);
        assert!(config.cache_dir.ends_with("recipe_finder"));
    }

    #[test]
    fn test_builders_override() {
        let config = FinderConfig::default()
            .with_cache_dir("/tmp/recipes")
            .with_base_url("http://localhost:8080");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/recipes"));
        assert_eq!(config.base_url, "http://localhost:8080");
    }
}
