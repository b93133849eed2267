//! Query operations behind the list and detail views
//!
//! Every query returns a fresh [`RecipeList`] or [`RecipeRecord`] owned by the
//! caller. The finder itself keeps no "current list".

use crate::api::RecipeSource;
use crate::cache::{fetch_recipe_cached, CacheObserver, ImageCache, LogObserver, RecordCache};
use crate::config::FinderConfig;
use crate::error::{SourceError, SourceResult};
use crate::models::{MealSummary, RecipeList, RecipeRecord};
use image::DynamicImage;
use std::sync::Arc;

/// Target size for a rendered thumbnail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailSize {
    /// Recipe card in the result grid
    Grid,
    /// Header image of the detail view
    Detail,
    Custom(u32, u32),
}

impl ThumbnailSize {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ThumbnailSize::Grid => (120, 90),
            ThumbnailSize::Detail => (150, 150),
            ThumbnailSize::Custom(w, h) => (*w, *h),
        }
    }
}

/// Protein checkboxes of the result view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProteinFilter {
    pub chicken: bool,
    pub beef: bool,
    pub seafood: bool,
}

const SEAFOOD_NAME_WORDS: [&str; 3] = ["fish", "prawn", "salmon"];

impl ProteinFilter {
    pub fn is_empty(&self) -> bool {
        !(self.chicken || self.beef || self.seafood)
    }

    pub fn matches(&self, recipe: &RecipeRecord) -> bool {
        let category = recipe.category.to_lowercase();
        let name = recipe.name.to_lowercase();
        (self.chicken && (category.contains("chicken") || name.contains("chicken")))
            || (self.beef && (category.contains("beef") || name.contains("beef")))
            || (self.seafood
                && (category.contains("seafood")
                    || SEAFOOD_NAME_WORDS.iter().any(|w| name.contains(w))))
    }

    /// New snapshot with the matching recipes, order preserved.
    /// With no flag set every recipe is kept.
    pub fn apply(&self, list: &RecipeList) -> RecipeList {
        if self.is_empty() {
            return list.clone();
        }
        list.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

pub struct RecipeFinder<S> {
    source: S,
    records: RecordCache,
    images: ImageCache,
    config: FinderConfig,
}

impl<S: RecipeSource> RecipeFinder<S> {
    pub fn new(source: S, config: FinderConfig) -> Self {
        Self::with_observer(source, config, Arc::new(LogObserver))
    }

    /// Both caches share the cache directory and report to `observer`
    pub fn with_observer(
        source: S,
        config: FinderConfig,
        observer: Arc<dyn CacheObserver>,
    ) -> Self {
        let records = RecordCache::with_observer(&config.cache_dir, observer.clone());
        let images = ImageCache::with_observer(&config.cache_dir, observer);
        Self {
            source,
            records,
            images,
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn records(&self) -> &RecordCache {
        &self.records
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Recipe details, from cache when possible
    pub fn load_recipe(&self, id: &str) -> SourceResult<RecipeRecord> {
        fetch_recipe_cached(&self.records, &self.source, id)
    }

    /// Load up to `limit` summaries in full, skipping ids already collected
    /// and ids whose details cannot be loaded.
    fn load_summaries(&self, meals: &[MealSummary], limit: usize, out: &mut Vec<RecipeRecord>) {
        for meal in meals.iter().take(limit) {
            if out.iter().any(|r| r.id == meal.id) {
                continue;
            }
            match self.load_recipe(&meal.id) {
                Ok(record) => out.push(record),
                Err(e) => log::warn!("Skipping recipe {}: {}", meal.id, e),
            }
        }
    }

    /// Search by main ingredient and load the first hits in full
    pub fn search(&self, term: &str) -> SourceResult<RecipeList> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(RecipeList::default());
        }

        let meals = self.source.search_by_ingredient(term)?;
        log::info!("Found {} recipes for '{}'", meals.len(), term);

        let mut recipes = Vec::new();
        self.load_summaries(&meals, self.config.search_limit, &mut recipes);
        Ok(RecipeList::new(recipes))
    }

    /// A few recipes for each of the configured "view all" ingredients
    ///
    /// An ingredient whose search fails is skipped. The error is returned
    /// only when every search failed.
    pub fn view_all(&self) -> SourceResult<RecipeList> {
        let mut recipes = Vec::new();
        let mut last_error: Option<SourceError> = None;
        let mut any_succeeded = false;

        for ingredient in &self.config.view_all_ingredients {
            match self.source.search_by_ingredient(ingredient) {
                Ok(meals) => {
                    any_succeeded = true;
                    self.load_summaries(&meals, self.config.view_all_per_ingredient, &mut recipes);
                    log::debug!("Loaded {} recipes so far", recipes.len());
                }
                Err(e) => {
                    log::warn!("Search for '{}' failed: {}", ingredient, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !any_succeeded => Err(e),
            _ => Ok(RecipeList::new(recipes)),
        }
    }

    /// A random recipe, written through to the cache for offline reuse
    pub fn random(&self) -> SourceResult<RecipeRecord> {
        let record = self.source.fetch_random()?;
        // Write failures are already reported to the observer
        let _ = self.records.put(&record);
        Ok(record)
    }

    /// Recipe thumbnail scaled for the requested view
    pub fn thumbnail(&self, recipe: &RecipeRecord, size: ThumbnailSize) -> Option<DynamicImage> {
        let (width, height) = size.dimensions();
        self.images
            .resolve(&self.source, &recipe.id, &recipe.thumbnail_url, width, height)
    }
}

/// Apply the protein checkboxes to a snapshot
pub fn filter(list: &RecipeList, filter: &ProteinFilter) -> RecipeList {
    filter.apply(list)
}
