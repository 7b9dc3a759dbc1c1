use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recipe_assistant::{
    config::Config,
    db::{create_pool, CorpusStore, InMemoryCorpus, PgCorpusStore},
    routes::{create_router, AppState},
    services::RecipeEngine,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_assistant=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let corpus: Arc<dyn CorpusStore> = match (&config.database_url, &config.corpus_path) {
        (Some(database_url), _) => {
            let pool = create_pool(database_url).await?;
            tracing::info!("Using PostgreSQL recipe corpus");
            Arc::new(PgCorpusStore::new(pool))
        }
        (None, Some(path)) => {
            let corpus = InMemoryCorpus::from_json_file(path).await?;
            if corpus.is_empty() {
                tracing::warn!(path = %path, "Corpus file holds no recipes");
            }
            Arc::new(corpus)
        }
        (None, None) => {
            tracing::warn!("No DATABASE_URL or CORPUS_PATH set, starting with an empty corpus");
            Arc::new(InMemoryCorpus::default())
        }
    };

    let engine = RecipeEngine::from_config(&config)?;
    tracing::info!(
        default_tier = %engine.default_tier(),
        free_model = %config.free_model_name,
        paid_model_configured = config.paid_model_api_key.is_some(),
        "Recipe engine ready"
    );

    let app = create_router(AppState::new(engine, corpus)).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
