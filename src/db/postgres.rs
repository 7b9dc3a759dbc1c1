use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::corpus::{CorpusQuery, CorpusStore};
use crate::{error::AppResult, models::RecipeRecord};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Cuisine is a literal case-insensitive substring, same as `CorpusQuery::matches`
const CORPUS_QUERY: &str = r#"
    SELECT r.id,
           r.title,
           r.ingredients,
           r.preparation,
           r.difficulty,
           r.healthiness,
           r.time_to_make,
           r.category_id,
           c.name AS category,
           r.cuisine,
           r.likes_count,
           r.visible,
           u.display_name AS author_name
    FROM recipes r
    LEFT JOIN categories c ON c.id = r.category_id
    JOIN users u ON u.id = r.user_id
    WHERE ($1 = false OR r.visible = true)
      AND ($2::bigint IS NULL OR r.category_id = $2)
      AND ($3::text IS NULL OR position(lower($3) in lower(r.cuisine)) > 0)
    ORDER BY r.id
    "#;

/// Recipes read from the application's existing tables
///
/// Expects `recipes`, `categories` and `users` tables; the schema itself is
/// owned by the application that writes recipes.
#[derive(Clone)]
pub struct PgCorpusStore {
    pool: PgPool,
}

impl PgCorpusStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CorpusStore for PgCorpusStore {
    async fn query(&self, query: &CorpusQuery) -> AppResult<Vec<RecipeRecord>> {
        let recipes = sqlx::query_as::<_, RecipeRecord>(CORPUS_QUERY)
            .bind(query.visible_only)
            .bind(query.category_id)
            .bind(query.cuisine.as_deref())
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            recipes = recipes.len(),
            category_id = ?query.category_id,
            cuisine = ?query.cuisine,
            "Corpus queried from database"
        );

        Ok(recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuisine_filter_has_no_wildcards() {
        assert!(!CORPUS_QUERY.to_lowercase().contains("like"));
        assert!(CORPUS_QUERY.contains("position(lower($3) in lower(r.cuisine)) > 0"));
    }
}
