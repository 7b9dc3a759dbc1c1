use serde::{Deserialize, Serialize};

use super::Preferences;

/// A recipe stored in the corpus
///
/// Owned and persisted by the caller; the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct RecipeRecord {
    pub id: i64,
    pub title: String,
    /// Free-text ingredient list, one ingredient per line or comma separated
    pub ingredients: String,
    /// Free-text preparation steps
    pub preparation: String,
    /// 1 (trivial) to 5 (expert)
    pub difficulty: i32,
    /// 1 (indulgent) to 5 (very healthy)
    pub healthiness: i32,
    /// Total time in minutes
    pub time_to_make: i32,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub likes_count: i64,
    /// Only visible recipes may be matched
    pub visible: bool,
    pub author_name: String,
}

/// Result of the request parser
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedRequest {
    /// Lower-cased, de-duplicated, in first-seen order
    pub ingredients: Vec<String>,
    pub preferences: Preferences,
    /// Kept for diagnostics only
    pub original_text: String,
}

impl ParsedRequest {
    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }
}

/// How well a recipe covers the user's ingredients
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MatchScore {
    /// User ingredients found in the recipe
    pub matched: Vec<String>,
    /// Recipe ingredients the user did not mention (at most 5)
    pub missing: Vec<String>,
    /// `matched / user ingredients`, in [0, 1]
    pub percentage: f64,
    pub total_recipe_ingredients: usize,
}

impl MatchScore {
    /// Percentage as a whole number for display
    pub fn percent(&self) -> u32 {
        (self.percentage * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredCandidate {
    pub recipe: RecipeRecord,
    pub score: MatchScore,
}

/// Recipe produced by a generation backend
///
/// Only ever built from a backend's JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedRecipe {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub preparation: String,
    /// Minutes
    pub time_to_make: u32,
    /// 1-5
    pub difficulty: u8,
    /// 1-5
    pub healthiness: u8,
    pub tips: Option<String>,
}
