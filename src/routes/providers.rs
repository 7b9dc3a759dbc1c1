use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;
use crate::{models::ProviderTier, services::ProviderStatus};

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub default_tier: ProviderTier,
    pub providers: Vec<ProviderStatus>,
}

/// Handler for tier availability probes
pub async fn list(State(state): State<AppState>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        default_tier: state.engine.default_tier(),
        providers: state.engine.available_tiers().await,
    })
}
