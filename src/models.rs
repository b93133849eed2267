use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of ingredient/measure slots TheMealDB exposes per meal
pub const INGREDIENT_SLOTS: usize = 20;

/// Placeholder for missing classification fields
pub const UNKNOWN: &str = "Unknown";

/// A single recipe as shown in the list and detail views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub region: String,
    pub instructions: String,
    pub thumbnail_url: String,
    /// "<measure> <ingredient>" lines in upstream slot order
    pub ingredients: Vec<String>,
}

/// Minimal search hit returned by the ingredient filter endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MealSummary {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal", default)]
    pub name: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail_url: Option<String>,
}

/// Meal object as delivered by the lookup and random endpoints
///
/// Every field is optional so that a sparse or partially null payload still
/// deserializes; [`RawMeal::into_record`] decides what is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeal {
    #[serde(rename = "idMeal", default)]
    pub id: Option<String>,
    #[serde(rename = "strMeal", default)]
    pub name: Option<String>,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
    #[serde(rename = "strArea", default)]
    pub area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
    /// strIngredientN / strMeasureN and any other upstream keys
    #[serde(flatten)]
    pub slots: HashMap<String, serde_json::Value>,
}

/// Why an upstream meal could not become a [`RecipeRecord`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField(pub &'static str);

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "meal payload is missing {}", self.0)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl RawMeal {
    fn slot(&self, key: &str) -> &str {
        match self.slots.get(key) {
            Some(serde_json::Value::String(s)) => s.trim(),
            _ => "",
        }
    }

    /// Builds display lines from the fixed set of ingredient slots.
    /// Missing, null or non-string slots count as empty.
    pub fn ingredients(&self) -> Vec<String> {
        (1..=INGREDIENT_SLOTS)
            .filter_map(|i| {
                let ingredient = self.slot(&format!("strIngredient{i}"));
                if ingredient.is_empty() {
                    return None;
                }
                let measure = self.slot(&format!("strMeasure{i}"));
                Some(if measure.is_empty() {
                    ingredient.to_string()
                } else {
                    format!("{measure} {ingredient}")
                })
            })
            .collect()
    }

    pub fn into_record(self) -> Result<RecipeRecord, MissingField> {
        let ingredients = self.ingredients();
        Ok(RecipeRecord {
            id: non_blank(self.id).ok_or(MissingField("idMeal"))?,
            name: non_blank(self.name).ok_or(MissingField("strMeal"))?,
            category: non_blank(self.category).unwrap_or_else(|| UNKNOWN.to_string()),
            region: non_blank(self.area).unwrap_or_else(|| UNKNOWN.to_string()),
            instructions: self.instructions.ok_or(MissingField("strInstructions"))?,
            thumbnail_url: non_blank(self.thumbnail).ok_or(MissingField("strMealThumb"))?,
            ingredients,
        })
    }
}

/// Envelope shared by all TheMealDB endpoints; `meals` is null when empty
///
/// Meals stay untyped here so that one malformed meal does not fail the
/// whole body.
#[derive(Debug, Deserialize)]
pub struct MealsResponse {
    pub meals: Option<Vec<serde_json::Value>>,
}

/// Immutable snapshot of recipes returned by a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeList {
    recipes: Vec<RecipeRecord>,
}

impl RecipeList {
    pub fn new(recipes: Vec<RecipeRecord>) -> Self {
        Self { recipes }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RecipeRecord> {
        self.recipes.iter()
    }

    pub fn get(&self, index: usize) -> Option<&RecipeRecord> {
        self.recipes.get(index)
    }

    /// Look up a recipe in this snapshot by id
    pub fn find(&self, id: &str) -> Option<&RecipeRecord> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn as_slice(&self) -> &[RecipeRecord] {
        &self.recipes
    }
}

impl<'a> IntoIterator for &'a RecipeList {
    type Item = &'a RecipeRecord;
    type IntoIter = std::slice::Iter<'a, RecipeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}

impl FromIterator<RecipeRecord> for RecipeList {
    fn from_iter<I: IntoIterator<Item = RecipeRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
