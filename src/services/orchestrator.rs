use serde::Serialize;
use std::{sync::Arc, time::Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    error::AppResult,
    models::{ChatRequest, EngineResponse, GeneratedRecipe, ParsedRequest, ProviderTier, RecipeRecord},
    services::{
        filters::PreferenceFilterChain,
        formatter::ResponseFormatter,
        matcher::CorpusMatcher,
        providers::{
            parse::parse_generated_recipe, prompt::build_prompt, FreeModelBackend,
            GenerationBackend, PaidModelBackend, ProviderFailure,
        },
        request_parser::RequestParser,
        vocabulary::{mentions, Vocabulary},
    },
};

/// Below this many ingredients no backend is ever called
pub const MIN_GENERATION_INGREDIENTS: usize = 3;

/// Staple suggestions offered with an insufficient-ingredients response
pub const MAX_SUGGESTIONS: usize = 5;

/// Result of an advisory availability probe
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProviderStatus {
    pub tier: ProviderTier,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Recommendation-or-generation engine
///
/// Runs parse, filter and match, and only calls a generation backend when
/// nothing matched and enough ingredients are known. Every outcome,
/// backend failure included, comes back as an `EngineResponse`.
#[derive(Clone)]
pub struct RecipeEngine {
    vocabulary: Arc<Vocabulary>,
    free_model: Option<Arc<dyn GenerationBackend>>,
    paid_model: Option<Arc<dyn GenerationBackend>>,
    default_tier: ProviderTier,
    formatter: ResponseFormatter,
}

impl RecipeEngine {
    /// An engine with no generation backends; only the local tier works
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            vocabulary,
            free_model: None,
            paid_model: None,
            default_tier: ProviderTier::Local,
            formatter: ResponseFormatter,
        }
    }

    /// Builds both network backends from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let free_model = FreeModelBackend::new(
            config.free_model_url.clone(),
            config.free_model_name.clone(),
            config.free_model_timeout(),
        )?;
        let paid_model = PaidModelBackend::new(
            config.paid_model_url.clone(),
            config.paid_model_name.clone(),
            config.paid_model_api_key.clone(),
            config.paid_model_timeout(),
        )?;

        Ok(Self::new(Arc::new(Vocabulary::embedded().clone()))
            .with_free_model(Arc::new(free_model))
            .with_paid_model(Arc::new(paid_model))
            .with_default_tier(config.default_tier))
    }

    pub fn with_free_model(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.free_model = Some(backend);
        self
    }

    pub fn with_paid_model(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.paid_model = Some(backend);
        self
    }

    pub fn with_default_tier(mut self, tier: ProviderTier) -> Self {
        self.default_tier = tier;
        self
    }

    pub fn default_tier(&self) -> ProviderTier {
        self.default_tier
    }

    /// Runs one request to completion
    pub async fn chat(&self, request: &ChatRequest, corpus: &[RecipeRecord]) -> EngineResponse {
        self.chat_with_cancel(request, corpus, CancellationToken::new())
            .await
    }

    /// Like `chat`, but a cancelled token aborts an in-flight backend call
    pub async fn chat_with_cancel(
        &self,
        request: &ChatRequest,
        corpus: &[RecipeRecord],
        cancel: CancellationToken,
    ) -> EngineResponse {
        let parsed = RequestParser::new(&self.vocabulary).parse(&request.message);
        tracing::info!(
            ingredients = parsed.ingredient_count(),
            preferences_set = !parsed.preferences.is_unconstrained(),
            "Request parsed"
        );
        tracing::debug!(ingredients = ?parsed.ingredients, preferences = ?parsed.preferences, "Parsed request detail");

        let chain = PreferenceFilterChain::from_preferences(
            &parsed.preferences,
            &request.options,
            &self.vocabulary,
        );
        let filtered = chain.apply(corpus);
        let candidates = CorpusMatcher::new(&self.vocabulary).score(&filtered, &parsed.ingredients);
        tracing::info!(
            corpus = corpus.len(),
            filtered = filtered.len(),
            matches = candidates.len(),
            "Local search finished"
        );

        if let Some(response) = self.formatter.recommendation(candidates) {
            return finish(response);
        }

        if parsed.ingredient_count() < MIN_GENERATION_INGREDIENTS {
            let suggestions = self.suggestions(&parsed);
            return finish(self.formatter.insufficient(parsed.ingredients, suggestions));
        }

        let tier = request.tier.unwrap_or(self.default_tier);
        let backend = match tier {
            ProviderTier::Local => return finish(self.formatter.no_match(parsed.ingredients)),
            ProviderTier::FreeModel => self.free_model.as_ref(),
            ProviderTier::PaidModel => self.paid_model.as_ref(),
        };

        let result = match backend {
            Some(backend) => {
                let prompt = build_prompt(&parsed, &request.history);
                generate(backend.as_ref(), &prompt, &cancel).await
            }
            None => Err(ProviderFailure::Unavailable(format!(
                "no backend configured for {}",
                tier
            ))),
        };

        let response = match result {
            Ok(recipe) => self.formatter.generated(recipe, tier),
            Err(failure) => {
                tracing::warn!(
                    tier = %tier,
                    reason = failure.reason().as_str(),
                    error = %failure,
                    "Generation failed"
                );
                self.formatter.provider_error(tier, &failure)
            }
        };
        finish(response)
    }

    /// Probes every tier; Local is always available
    pub async fn available_tiers(&self) -> Vec<ProviderStatus> {
        let (free_model, paid_model) = tokio::join!(
            probe(ProviderTier::FreeModel, self.free_model.as_ref()),
            probe(ProviderTier::PaidModel, self.paid_model.as_ref()),
        );

        vec![
            ProviderStatus {
                tier: ProviderTier::Local,
                available: true,
                model: None,
            },
            free_model,
            paid_model,
        ]
    }

    /// Staples the user has not mentioned, in vocabulary order
    fn suggestions(&self, parsed: &ParsedRequest) -> Vec<String> {
        let text = parsed.original_text.to_lowercase();

        self.vocabulary
            .staples
            .iter()
            .filter(|staple| !mentions(&text, staple))
            .filter(|staple| !parsed.ingredients.contains(staple))
            .take(MAX_SUGGESTIONS)
            .cloned()
            .collect()
    }
}

async fn generate(
    backend: &dyn GenerationBackend,
    prompt: &str,
    cancel: &CancellationToken,
) -> Result<GeneratedRecipe, ProviderFailure> {
    let started = Instant::now();
    tracing::info!(
        tier = %backend.tier(),
        model = %backend.model_name(),
        prompt_chars = prompt.len(),
        "Calling generation backend"
    );

    let raw = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ProviderFailure::Cancelled),
        result = backend.generate(prompt) => result,
    }?;

    tracing::info!(
        tier = %backend.tier(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        response_chars = raw.len(),
        "Generation backend answered"
    );

    parse_generated_recipe(&raw)
}

async fn probe(tier: ProviderTier, backend: Option<&Arc<dyn GenerationBackend>>) -> ProviderStatus {
    match backend {
        Some(backend) => ProviderStatus {
            tier,
            available: backend.is_available().await,
            model: Some(backend.model_name()),
        },
        None => ProviderStatus {
            tier,
            available: false,
            model: None,
        },
    }
}

fn finish(response: EngineResponse) -> EngineResponse {
    tracing::info!(
        outcome = response.kind(),
        provider = %response.provider_tag(),
        "Engine finished"
    );
    response
}
