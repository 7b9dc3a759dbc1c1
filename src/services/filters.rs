use crate::{
    models::{Difficulty, Preferences, RecipeRecord, SearchOptions},
    services::vocabulary::{mentions_any, Vocabulary},
};

/// Minimum healthiness score for "healthy" requests
pub const HEALTHY_MIN_SCORE: i32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum RecipeFilter<'a> {
    Visible,
    Healthy,
    Difficulty(Difficulty),
    MaxTime(u32),
    /// Lower-cased substring of the cuisine label
    Cuisine(String),
    Category(i64),
    /// Excludes recipes whose ingredients mention any meat keyword
    MeatFree(&'a [String]),
}

impl RecipeFilter<'_> {
    pub fn matches(&self, recipe: &RecipeRecord) -> bool {
        match self {
            RecipeFilter::Visible => recipe.visible,
            RecipeFilter::Healthy => recipe.healthiness >= HEALTHY_MIN_SCORE,
            RecipeFilter::Difficulty(band) => band.accepts(recipe.difficulty),
            RecipeFilter::MaxTime(limit) => i64::from(recipe.time_to_make) <= i64::from(*limit),
            RecipeFilter::Cuisine(needle) => recipe
                .cuisine
                .as_deref()
                .is_some_and(|label| label.to_lowercase().contains(needle.as_str())),
            RecipeFilter::Category(id) => recipe.category_id == Some(*id),
            RecipeFilter::MeatFree(keywords) => {
                !mentions_any(&recipe.ingredients.to_lowercase(), keywords)
            }
        }
    }
}

/// AND-composition of recipe filters
#[derive(Debug, Clone, Default)]
pub struct PreferenceFilterChain<'a> {
    filters: Vec<RecipeFilter<'a>>,
}

impl<'a> PreferenceFilterChain<'a> {
    /// A chain that only enforces visibility
    pub fn new() -> Self {
        Self {
            filters: vec![RecipeFilter::Visible],
        }
    }

    /// Builds the chain for a request
    ///
    /// Absent preferences add no predicate. Vegetarian and vegan both apply
    /// the meat exclusion; no dairy or egg exclusion exists.
    pub fn from_preferences(
        preferences: &Preferences,
        options: &SearchOptions,
        vocabulary: &'a Vocabulary,
    ) -> Self {
        let mut chain = Self::new();

        if preferences.healthy {
            chain.push(RecipeFilter::Healthy);
        }
        if let Some(band) = preferences.difficulty {
            chain.push(RecipeFilter::Difficulty(band));
        }
        if let Some(limit) = preferences.time_limit_minutes {
            chain.push(RecipeFilter::MaxTime(limit));
        }
        if let Some(cuisine) = options
            .cuisine
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            chain.push(RecipeFilter::Cuisine(cuisine.to_lowercase()));
        }
        if let Some(id) = options.category_id {
            chain.push(RecipeFilter::Category(id));
        }
        if preferences.excludes_meat() {
            chain.push(RecipeFilter::MeatFree(&vocabulary.meat_keywords));
        }

        chain
    }

    pub fn push(&mut self, filter: RecipeFilter<'a>) {
        self.filters.push(filter);
    }

    pub fn filters(&self) -> &[RecipeFilter<'a>] {
        &self.filters
    }

    pub fn accepts(&self, recipe: &RecipeRecord) -> bool {
        self.filters.iter().all(|filter| filter.matches(recipe))
    }

    /// Returns the recipes passing every filter, in corpus order
    pub fn apply(&self, corpus: &[RecipeRecord]) -> Vec<RecipeRecord> {
        let filtered: Vec<RecipeRecord> = corpus
            .iter()
            .filter(|recipe| self.accepts(recipe))
            .cloned()
            .collect();

        tracing::debug!(
            corpus = corpus.len(),
            kept = filtered.len(),
            filters = self.filters.len(),
            "Preference filters applied"
        );

        filtered
    }
}
