pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod finder;
pub mod models;

// Re-export commonly used items
pub use api::{MealDbClient, RecipeSource};
pub use cache::{fetch_recipe_cached, CacheEvent, CacheObserver, ImageCache, Lookup, RecordCache};
pub use config::FinderConfig;
pub use error::{CacheError, SourceError, SourceResult};
pub use finder::{filter, ProteinFilter, RecipeFinder, ThumbnailSize};
pub use models::{MealSummary, RecipeList, RecipeRecord};
