use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{api_failure, GenerationBackend, ProviderFailure, GENERATION_TEMPERATURE};
use crate::{error::AppResult, models::ProviderTier};

/// Output token budget for one generated recipe
pub const MAX_OUTPUT_TOKENS: u32 = 1500;

/// Health probes never wait as long as a generation
const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Clone)]
pub struct FreeModelBackend {
    http_client: HttpClient,
    base_url: String,
    model: String,
}

impl FreeModelBackend {
    /// Creates a backend whose client gives up after `timeout`
    pub fn new(base_url: String, model: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

#[async_trait]
impl GenerationBackend for FreeModelBackend {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderFailure> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: GENERATION_TEMPERATURE,
                num_predict: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self.http_client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(api_failure(response).await);
        }

        let body = response.text().await?;
        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| ProviderFailure::MalformedOutput {
                raw: body.clone(),
                detail: format!("unexpected response envelope: {}", e),
            })?;

        parsed.response.ok_or_else(|| ProviderFailure::MalformedOutput {
            raw: body,
            detail: "response field missing".to_string(),
        })
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);

        match self
            .http_client
            .get(&url)
            .timeout(HEALTH_PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, url = %url, "Free model health probe failed");
                false
            }
        }
    }

    fn tier(&self) -> ProviderTier {
        ProviderTier::FreeModel
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::{get, post}, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn backend(base_url: String, timeout: Duration) -> FreeModelBackend {
        FreeModelBackend::new(base_url, "llama3.2".to_string(), timeout).unwrap()
    }

    #[tokio::test]
    async fn test_generate_sends_contract_and_reads_response() {
        let app = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "llama3.2");
                assert_eq!(body["stream"], false);
                assert_eq!(body["options"]["num_predict"], 1500);
                assert!(body["prompt"].as_str().unwrap().contains("chicken"));
                Json(json!({ "response": "{\"title\": \"Stew\"}", "done": true }))
            }),
        );
        let base = spawn_server(app).await;

        let raw = backend(base, Duration::from_secs(5))
            .generate("use chicken")
            .await
            .unwrap();
        assert_eq!(raw, "{\"title\": \"Stew\"}");
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_failure() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
        );
        let base = spawn_server(app).await;

        let err = backend(base, Duration::from_secs(5))
            .generate("anything")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderFailure::Api {
                status: 500,
                body: "model not loaded".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({ "response": "late" }))
            }),
        );
        let base = spawn_server(app).await;

        let err = backend(base, Duration::from_millis(100))
            .generate("anything")
            .await
            .unwrap_err();
        assert_eq!(err, ProviderFailure::Timeout);
    }

    #[tokio::test]
    async fn test_health_probe() {
        let app = Router::new().route("/api/tags", get(|| async { Json(json!({ "models": [] })) }));
        let base = spawn_server(app).await;
        assert!(backend(base, Duration::from_secs(5)).is_available().await);

        // Nothing listens on the discard port
        let offline = backend("http://127.0.0.1:9".to_string(), Duration::from_secs(1));
        assert!(!offline.is_available().await);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let offline = backend("http://127.0.0.1:9".to_string(), Duration::from_secs(1));
        let err = offline.generate("anything").await.unwrap_err();
        assert!(matches!(err, ProviderFailure::Network(_)));
    }
}
