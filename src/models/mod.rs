use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod conversation;
pub mod preferences;
pub mod recipe;
pub mod response;

pub use conversation::{append_turn, ConversationTurn, Role, DEFAULT_HISTORY_CAP};
pub use preferences::{CookingMethod, DietaryRestriction, Difficulty, Preferences};
pub use recipe::{GeneratedRecipe, MatchScore, ParsedRequest, RecipeRecord, ScoredCandidate};
pub use response::{EngineResponse, FailureReason};

/// Generation strategy used when no existing recipe matches
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProviderTier {
    /// Corpus search only, never calls a network backend
    #[default]
    Local,
    /// Self-hosted language model endpoint
    FreeModel,
    /// Metered cloud language model API
    PaidModel,
}

impl ProviderTier {
    pub fn tag(&self) -> &'static str {
        match self {
            ProviderTier::Local => "local",
            ProviderTier::FreeModel => "free_model",
            ProviderTier::PaidModel => "paid_model",
        }
    }
}

impl Display for ProviderTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Caller-supplied constraints that do not come from the request text
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchOptions {
    /// Case-insensitive substring of the recipe's cuisine label
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// One engine invocation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub tier: Option<ProviderTier>,
    #[serde(flatten)]
    pub options: SearchOptions,
    /// Prior turns, oldest first
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tier: None,
            options: SearchOptions::default(),
            history: Vec::new(),
        }
    }

    pub fn with_tier(mut self, tier: ProviderTier) -> Self {
        self.tier = Some(tier);
        self
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }
}
