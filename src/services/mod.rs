pub mod filters;
pub mod formatter;
pub mod matcher;
pub mod orchestrator;
pub mod providers;
pub mod request_parser;
pub mod vocabulary;

pub use orchestrator::{ProviderStatus, RecipeEngine};
