use async_trait::async_trait;
use thiserror::Error;

use crate::models::{FailureReason, ProviderTier};

pub mod free_model;
pub mod paid_model;
pub mod parse;
pub mod prompt;

pub use free_model::FreeModelBackend;
pub use paid_model::PaidModelBackend;

/// Sampling temperature sent to every backend
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Why a generation call produced no usable text
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderFailure {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider timed out")]
    Timeout,

    #[error("Malformed provider output: {detail}")]
    MalformedOutput { raw: String, detail: String },

    #[error("Provider returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Generation cancelled")]
    Cancelled,
}

impl ProviderFailure {
    pub fn reason(&self) -> FailureReason {
        match self {
            ProviderFailure::Unavailable(_) => FailureReason::ProviderUnavailable,
            ProviderFailure::Timeout => FailureReason::ProviderTimeout,
            ProviderFailure::MalformedOutput { .. } => FailureReason::ProviderMalformedOutput,
            ProviderFailure::Api { .. } => FailureReason::ProviderApiError,
            ProviderFailure::Network(_) => FailureReason::NetworkError,
            ProviderFailure::Cancelled => FailureReason::Cancelled,
        }
    }

    /// Backend text worth keeping for diagnostics, if any
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            ProviderFailure::MalformedOutput { raw, .. } => Some(raw),
            ProviderFailure::Api { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderFailure::Timeout
        } else if e.is_decode() {
            ProviderFailure::MalformedOutput {
                raw: String::new(),
                detail: e.to_string(),
            }
        } else {
            ProviderFailure::Network(e.to_string())
        }
    }
}

/// A language model endpoint that turns a prompt into raw text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Sends the prompt and returns the model's raw output
    async fn generate(&self, prompt: &str) -> Result<String, ProviderFailure>;

    /// Advisory availability probe
    async fn is_available(&self) -> bool;

    fn tier(&self) -> ProviderTier;

    /// Model name for logging
    fn model_name(&self) -> String;
}

/// Reads a non-success response into an `Api` failure
pub(crate) async fn api_failure(response: reqwest::Response) -> ProviderFailure {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ProviderFailure::Api { status, body }
}
