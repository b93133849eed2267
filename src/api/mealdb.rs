use super::RecipeSource;
use crate::config::FinderConfig;
use crate::error::{SourceError, SourceResult};
use crate::models::{MealSummary, MealsResponse, RawMeal, RecipeRecord};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Public test-key endpoint of TheMealDB JSON API v1
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

const USER_AGENT: &str = "Recipe-Finder/1.0";

/// Blocking TheMealDB client
#[derive(Debug, Clone)]
pub struct MealDbClient {
    client: reqwest::blocking::Client,
    base_url: String,
    image_timeout: Duration,
}

impl MealDbClient {
    /// Client for the public API with the default timeouts
    pub fn new() -> SourceResult<Self> {
        Self::from_config(&FinderConfig::default())
    }

    pub fn from_config(config: &FinderConfig) -> SourceResult<Self> {
        Self::with_base_url(&config.base_url, config.request_timeout, config.image_timeout)
    }

    /// Client for any base URL (mock servers in tests, mirrors)
    pub fn with_base_url(
        base_url: &str,
        request_timeout: Duration,
        image_timeout: Duration,
    ) -> SourceResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            image_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch an endpoint and decode the `{"meals": ...}` envelope.
    /// The body is decoded here rather than by reqwest so that a bad payload
    /// is `Malformed`, not a transport failure.
    fn get_meals(&self, endpoint: &str, query: &[(&str, &str)]) -> SourceResult<Vec<Value>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("Fetching from TheMealDB: {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send()?;

        if !response.status().is_success() {
            return Err(SourceError::HttpStatus(response.status()));
        }

        let body = response.bytes()?;
        let envelope: MealsResponse = serde_json::from_slice(&body)
            .map_err(|e| SourceError::Malformed(format!("{endpoint}: {e}")))?;
        Ok(envelope.meals.unwrap_or_default())
    }

    /// Turn a lookup/random result into exactly one record
    ///
    /// A meal with a missing or wrongly typed field is `NotFound`.
    fn single_meal(meals: Vec<Value>, what: &str) -> SourceResult<RecipeRecord> {
        let meal = meals
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NotFound(what.to_string()))?;
        let raw = RawMeal::deserialize(meal)
            .map_err(|e| SourceError::NotFound(format!("{what} ({e})")))?;
        raw.into_record()
            .map_err(|e| SourceError::NotFound(format!("{what} ({e})")))
    }
}

impl RecipeSource for MealDbClient {
    fn search_by_ingredient(&self, term: &str) -> SourceResult<Vec<MealSummary>> {
        log::info!("Searching TheMealDB for ingredient: {}", term);
        let meals = self.get_meals("filter.php", &[("i", term)])?;
        Ok(meals
            .into_iter()
            .filter_map(|meal| match MealSummary::deserialize(meal) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    log::warn!("Skipping malformed search hit for '{}': {}", term, e);
                    None
                }
            })
            .collect())
    }

    fn fetch_by_id(&self, id: &str) -> SourceResult<RecipeRecord> {
        log::info!("Fetching recipe {} from TheMealDB", id);
        let meals = self.get_meals("lookup.php", &[("i", id)])?;
        Self::single_meal(meals, id)
    }

    fn fetch_random(&self) -> SourceResult<RecipeRecord> {
        log::info!("Fetching random recipe from TheMealDB");
        let meals = self.get_meals("random.php", &[])?;
        Self::single_meal(meals, "random recipe")
    }

    fn fetch_bytes(&self, url: &str) -> SourceResult<Vec<u8>> {
        log::debug!("Fetching image: {}", url);

        let response = self.client.get(url).timeout(self.image_timeout).send()?;

        if response.status().is_success() {
            Ok(response.bytes()?.to_vec())
        } else {
            Err(SourceError::HttpStatus(response.status()))
        }
    }
}
