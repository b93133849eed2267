//! Remote recipe source (TheMealDB)

pub mod mealdb;


pub use mealdb::{MealDbClient, DEFAULT_BASE_URL};

use crate::error::SourceResult;
use crate::models::{MealSummary, RecipeRecord};

/// The narrow interface the caches and workflow need from the web service
pub trait RecipeSource {
    /// Meals using the given main ingredient; empty when nothing matches
    fn search_by_ingredient(&self, term: &str) -> SourceResult<Vec<MealSummary>>;

    fn fetch_by_id(&self, id: &str) -> SourceResult<RecipeRecord>;

    fn fetch_random(&self) -> SourceResult<RecipeRecord>;

    /// Raw bytes behind a URL, e.g. a thumbnail
    fn fetch_bytes(&self, url: &str) -> SourceResult<Vec<u8>>;
}

impl<S: RecipeSource + ?Sized> RecipeSource for &S {
    fn search_by_ingredient(&self, term: &str) -> SourceResult<Vec<MealSummary>> {
        (**self).search_by_ingredient(term)
    }

    fn fetch_by_id(&self, id: &str) -> SourceResult<RecipeRecord> {
        (**self).fetch_by_id(id)
    }

    fn fetch_random(&self) -> SourceResult<RecipeRecord> {
        (**self).fetch_random()
    }

    fn fetch_bytes(&self, url: &str) -> SourceResult<Vec<u8>> {
        (**self).fetch_bytes(url)
    }
}
