use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::{
    models::{MatchScore, RecipeRecord, ScoredCandidate},
    services::vocabulary::{mentions, Vocabulary},
};

pub const MIN_MATCH_THRESHOLD: f64 = 0.4;
pub const MAX_RECIPE_MATCHES: usize = 5;
pub const MAX_MISSING_INGREDIENTS: usize = 5;

/// Normalized ingredients shorter than this are discarded
const MIN_INGREDIENT_CHARS: usize = 2;

const LIST_SEPARATORS: &[char] = &['\n', '\r', ',', ';', '•', '·', '▪', '●'];

/// Leading quantity: "2", "1/2", "1.5", "½", "2-3", optionally glued to a unit ("500g")
static QUANTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[\d½¼¾⅓⅔⅛]+(?:[.,/-]\d+)?\s*)+").expect("Invalid quantity regex")
});

static UNIT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:kg|g|mg|ml|l|lbs?|oz|cups?|tbsps?|tsps?|tablespoons?|teaspoons?|cloves?|pinch(?:es)?|slices?|cans?|pieces?|grams?|kilos?|liters?|litres?|pounds?|ounces?|xícaras?|colheres?|dentes?|fatias?|latas?|pitadas?)\.?(?:\s+|$)(?:(?:of|de)\s+)?",
    )
    .expect("Invalid unit regex")
});

const BULLET_PREFIX: &[char] = &['-', '*', '+', '–', '—', '•', '·', '▪', '●'];

/// Scores recipes by how many of the user's ingredients they use
///
/// Two names match when either contains the other or both sit in one
/// synonym class.
pub struct CorpusMatcher<'a> {
    vocabulary: &'a Vocabulary,
}

impl Default for CorpusMatcher<'static> {
    fn default() -> Self {
        Self::new(Vocabulary::embedded())
    }
}

impl<'a> CorpusMatcher<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Scores, filters, sorts and truncates the candidate list
    ///
    /// Equal percentages keep the input order.
    pub fn score(&self, candidates: &[RecipeRecord], ingredients: &[String]) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|recipe| ScoredCandidate {
                score: self.score_recipe(recipe, ingredients),
                recipe: recipe.clone(),
            })
            .filter(|candidate| candidate.score.percentage >= MIN_MATCH_THRESHOLD)
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.percentage.total_cmp(&a.score.percentage));
        scored.truncate(MAX_RECIPE_MATCHES);

        tracing::debug!(
            candidates = candidates.len(),
            matches = scored.len(),
            "Corpus scored"
        );

        scored
    }

    /// Scores a single recipe
    pub fn score_recipe(&self, recipe: &RecipeRecord, ingredients: &[String]) -> MatchScore {
        let recipe_ingredients = normalize_ingredient_list(&recipe.ingredients);

        let matched: Vec<String> = ingredients
            .iter()
            .filter(|user| {
                recipe_ingredients
                    .iter()
                    .any(|item| self.ingredient_matches(user, item))
            })
            .cloned()
            .collect();

        let missing: Vec<String> = recipe_ingredients
            .iter()
            .filter(|item| {
                !ingredients
                    .iter()
                    .any(|user| self.ingredient_matches(user, item))
            })
            .take(MAX_MISSING_INGREDIENTS)
            .cloned()
            .collect();

        let percentage = if ingredients.is_empty() {
            0.0
        } else {
            matched.len() as f64 / ingredients.len() as f64
        };

        MatchScore {
            matched,
            missing,
            percentage,
            total_recipe_ingredients: recipe_ingredients.len(),
        }
    }

    /// Symmetric ingredient match predicate
    pub fn ingredient_matches(&self, a: &str, b: &str) -> bool {
        let a = a.trim().to_lowercase();
        let b = b.trim().to_lowercase();
        if a.is_empty() || b.is_empty() {
            return false;
        }

        if a.contains(&b) || b.contains(&a) {
            return true;
        }

        let classes_a = self.synonym_classes(&a);
        if classes_a.is_empty() {
            return false;
        }
        let classes_b = self.synonym_classes(&b);
        !classes_a.is_disjoint(&classes_b)
    }

    /// Indexes of the synonym classes `name` belongs to
    ///
    /// A name belongs to a class when it mentions one of the class members
    /// as a word ("chicken breasts" belongs to the chicken class).
    fn synonym_classes(&self, name: &str) -> BTreeSet<usize> {
        self.vocabulary
            .synonyms
            .iter()
            .enumerate()
            .filter(|(_, class)| class.iter().any(|member| mentions(name, member)))
            .map(|(index, _)| index)
            .collect()
    }
}

/// Splits a free-text ingredient blob into normalized names
pub fn normalize_ingredient_list(blob: &str) -> Vec<String> {
    blob.split(LIST_SEPARATORS)
        .filter_map(normalize_ingredient)
        .collect()
}

/// Lower-cases and strips bullets, leading quantity and unit
pub fn normalize_ingredient(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    let without_bullet = lowered.trim_start_matches(BULLET_PREFIX).trim_start();

    let without_quantity = QUANTITY_REGEX.replace(without_bullet, "");
    let stripped = if without_quantity.len() != without_bullet.len() {
        UNIT_REGEX.replace(&without_quantity, "").into_owned()
    } else {
        without_quantity.into_owned()
    };

    let name = stripped.trim();
    if name.chars().count() < MIN_INGREDIENT_CHARS {
        None
    } else {
        Some(name.to_string())
    }
}
