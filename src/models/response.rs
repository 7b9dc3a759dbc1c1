use serde::{Deserialize, Serialize};

use super::{GeneratedRecipe, ProviderTier, ScoredCandidate};

/// Machine-readable reason attached to a provider error
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    ProviderUnavailable,
    ProviderTimeout,
    ProviderMalformedOutput,
    ProviderApiError,
    NetworkError,
    Cancelled,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::ProviderUnavailable => "provider_unavailable",
            FailureReason::ProviderTimeout => "provider_timeout",
            FailureReason::ProviderMalformedOutput => "provider_malformed_output",
            FailureReason::ProviderApiError => "provider_api_error",
            FailureReason::NetworkError => "network_error",
            FailureReason::Cancelled => "cancelled",
        }
    }
}

/// Terminal output of every engine invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineResponse {
    /// Existing recipes matched the request; no backend was called
    Recommendation {
        best: ScoredCandidate,
        alternatives: Vec<ScoredCandidate>,
        message: String,
    },
    /// Too little to go on (also used when nothing could be extracted)
    InsufficientIngredients {
        found: Vec<String>,
        suggestions: Vec<String>,
        message: String,
    },
    /// Enough ingredients, no match, and generation is not enabled
    NoMatchNoGenerate {
        ingredients: Vec<String>,
        message: String,
    },
    Generated {
        recipe: GeneratedRecipe,
        provider_tag: ProviderTier,
        message: String,
    },
    ProviderError {
        provider_tag: ProviderTier,
        raw_text: Option<String>,
        reason: FailureReason,
        message: String,
    },
}

impl EngineResponse {
    /// The tier that produced this response
    pub fn provider_tag(&self) -> ProviderTier {
        match self {
            EngineResponse::Generated { provider_tag, .. }
            | EngineResponse::ProviderError { provider_tag, .. } => *provider_tag,
            _ => ProviderTier::Local,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            EngineResponse::Recommendation { message, .. }
            | EngineResponse::InsufficientIngredients { message, .. }
            | EngineResponse::NoMatchNoGenerate { message, .. }
            | EngineResponse::Generated { message, .. }
            | EngineResponse::ProviderError { message, .. } => message,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            EngineResponse::Recommendation { .. } => "recommendation",
            EngineResponse::InsufficientIngredients { .. } => "insufficient_ingredients",
            EngineResponse::NoMatchNoGenerate { .. } => "no_match_no_generate",
            EngineResponse::Generated { .. } => "generated",
            EngineResponse::ProviderError { .. } => "provider_error",
        }
    }
}
