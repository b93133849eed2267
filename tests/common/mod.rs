//! Shared fixtures: an in-memory recipe source with call counters.

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use recipe_finder::{MealSummary, RecipeRecord, RecipeSource, SourceError, SourceResult};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;

pub fn recipe(id: &str, name: &str, category: &str) -> RecipeRecord {
    RecipeRecord {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        region: "British".to_string(),
        instructions: "Cook it.".to_string(),
        thumbnail_url: format!("https://www.themealdb.com/images/media/meals/{id}.jpg"),
        ingredients: vec!["1 tsp Salt".to_string(), "2 pinch Pepper".to_string()],
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 7) as u8, (y * 5) as u8, 90]));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn unavailable() -> SourceError {
    SourceError::HttpStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE)
}

/// Recipe source backed by maps, with switchable failure
#[derive(Default)]
pub struct StubSource {
    records: RefCell<HashMap<String, RecipeRecord>>,
    searches: RefCell<HashMap<String, Vec<String>>>,
    images: RefCell<HashMap<String, Vec<u8>>>,
    random: RefCell<Option<RecipeRecord>>,
    failing: Cell<bool>,
    failing_ids: RefCell<HashSet<String>>,
    failing_terms: RefCell<HashSet<String>>,
    pub lookups: Cell<usize>,
    pub search_calls: Cell<usize>,
    pub byte_fetches: Cell<usize>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(self, record: RecipeRecord) -> Self {
        self.records.borrow_mut().insert(record.id.clone(), record);
        self
    }

    /// Register a search term; its hits are the given recipes in order
    pub fn with_search(self, term: &str, recipes: Vec<RecipeRecord>) -> Self {
        let ids = recipes.iter().map(|r| r.id.clone()).collect();
        self.searches.borrow_mut().insert(term.to_string(), ids);
        let mut records = self.records.borrow_mut();
        for r in recipes {
            records.insert(r.id.clone(), r);
        }
        drop(records);
        self
    }

    pub fn with_image(self, url: &str, bytes: Vec<u8>) -> Self {
        self.images.borrow_mut().insert(url.to_string(), bytes);
        self
    }

    pub fn with_random(self, record: RecipeRecord) -> Self {
        *self.random.borrow_mut() = Some(record);
        self
    }

    /// Make every call fail as if the network were down
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn fail_id(&self, id: &str) {
        self.failing_ids.borrow_mut().insert(id.to_string());
    }

    pub fn fail_term(&self, term: &str) {
        self.failing_terms.borrow_mut().insert(term.to_string());
    }
}

impl RecipeSource for StubSource {
    fn search_by_ingredient(&self, term: &str) -> SourceResult<Vec<MealSummary>> {
        self.search_calls.set(self.search_calls.get() + 1);
        if self.failing.get() || self.failing_terms.borrow().contains(term) {
            return Err(unavailable());
        }
        let searches = self.searches.borrow();
        let records = self.records.borrow();
        Ok(searches
            .get(term)
            .map(|ids| {
                ids.iter()
                    .map(|id| MealSummary {
                        id: id.clone(),
                        name: records.get(id).map(|r| r.name.clone()),
                        thumbnail_url: records.get(id).map(|r| r.thumbnail_url.clone()),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn fetch_by_id(&self, id: &str) -> SourceResult<RecipeRecord> {
        self.lookups.set(self.lookups.get() + 1);
        if self.failing.get() || self.failing_ids.borrow().contains(id) {
            return Err(unavailable());
        }
        self.records
            .borrow()
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }

    fn fetch_random(&self) -> SourceResult<RecipeRecord> {
        if self.failing.get() {
            return Err(unavailable());
        }
        self.random
            .borrow()
            .clone()
            .ok_or_else(|| SourceError::NotFound("random recipe".to_string()))
    }

    fn fetch_bytes(&self, url: &str) -> SourceResult<Vec<u8>> {
        self.byte_fetches.set(self.byte_fetches.get() + 1);
        if self.failing.get() {
            return Err(unavailable());
        }
        self.images
            .borrow()
            .get(url)
            .cloned()
            .ok_or(SourceError::HttpStatus(reqwest::StatusCode::NOT_FOUND))
    }
}
