use serde::Deserialize;
use std::time::Duration;

use crate::models::ProviderTier;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// PostgreSQL connection URL; when unset the corpus is held in memory
    #[serde(default)]
    pub database_url: Option<String>,

    /// JSON file with recipe records for the in-memory corpus
    #[serde(default)]
    pub corpus_path: Option<String>,

    /// Self-hosted model server base URL
    #[serde(default = "default_free_model_url")]
    pub free_model_url: String,

    #[serde(default = "default_free_model_name")]
    pub free_model_name: String,

    #[serde(default = "default_free_model_timeout_secs")]
    pub free_model_timeout_secs: u64,

    /// Hosted chat-completion API base URL
    #[serde(default = "default_paid_model_url")]
    pub paid_model_url: String,

    #[serde(default = "default_paid_model_name")]
    pub paid_model_name: String,

    /// Credential for the hosted API; the paid tier is unavailable without it
    #[serde(default)]
    pub paid_model_api_key: Option<String>,

    #[serde(default = "default_paid_model_timeout_secs")]
    pub paid_model_timeout_secs: u64,

    /// Tier used when a request does not name one
    #[serde(default)]
    pub default_tier: ProviderTier,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_free_model_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_free_model_name() -> String {
    "llama3.2".to_string()
}

fn default_free_model_timeout_secs() -> u64 {
    120
}

fn default_paid_model_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_paid_model_name() -> String {
    "gpt-4o-mini".to_string()
}

fn default_paid_model_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn free_model_timeout(&self) -> Duration {
        Duration::from_secs(self.free_model_timeout_secs)
    }

    pub fn paid_model_timeout(&self) -> Duration {
        Duration::from_secs(self.paid_model_timeout_secs)
    }
}
