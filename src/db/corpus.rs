use async_trait::async_trait;
use std::{path::Path, sync::Arc};

use crate::{
    error::{AppError, AppResult},
    models::{RecipeRecord, SearchOptions},
};

/// Filters a corpus store understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusQuery {
    pub visible_only: bool,
    /// Case-insensitive substring of the cuisine label
    pub cuisine: Option<String>,
    pub category_id: Option<i64>,
}

impl Default for CorpusQuery {
    fn default() -> Self {
        Self {
            visible_only: true,
            cuisine: None,
            category_id: None,
        }
    }
}

impl From<&SearchOptions> for CorpusQuery {
    fn from(options: &SearchOptions) -> Self {
        Self {
            visible_only: true,
            cuisine: options
                .cuisine
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            category_id: options.category_id,
        }
    }
}

impl CorpusQuery {
    pub fn matches(&self, recipe: &RecipeRecord) -> bool {
        if self.visible_only && !recipe.visible {
            return false;
        }
        if let Some(id) = self.category_id {
            if recipe.category_id != Some(id) {
                return false;
            }
        }
        match &self.cuisine {
            Some(needle) => recipe
                .cuisine
                .as_deref()
                .is_some_and(|label| label.to_lowercase().contains(&needle.to_lowercase())),
            None => true,
        }
    }
}

/// Read-only source of recipe records
#[async_trait]
pub trait CorpusStore: Send + Sync {
    async fn query(&self, query: &CorpusQuery) -> AppResult<Vec<RecipeRecord>>;
}

/// Corpus held in memory, shared between requests
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    recipes: Arc<Vec<RecipeRecord>>,
}

impl InMemoryCorpus {
    pub fn new(recipes: Vec<RecipeRecord>) -> Self {
        Self {
            recipes: Arc::new(recipes),
        }
    }

    /// Loads a JSON array of recipe records
    pub async fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Corpus(format!("cannot read {}: {}", path.display(), e)))?;

        let recipes: Vec<RecipeRecord> = serde_json::from_str(&contents)
            .map_err(|e| AppError::Corpus(format!("invalid corpus {}: {}", path.display(), e)))?;

        tracing::info!(path = %path.display(), recipes = recipes.len(), "Loaded recipe corpus");
        Ok(Self::new(recipes))
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[async_trait]
impl CorpusStore for InMemoryCorpus {
    async fn query(&self, query: &CorpusQuery) -> AppResult<Vec<RecipeRecord>> {
        Ok(self
            .recipes
            .iter()
            .filter(|recipe| query.matches(recipe))
            .cloned()
            .collect())
    }
}
