use crate::{
    models::{EngineResponse, GeneratedRecipe, ProviderTier, ScoredCandidate},
    services::providers::ProviderFailure,
};

/// Builds `EngineResponse` values; the only producer of user-facing messages
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFormatter;

impl ResponseFormatter {
    /// Recommendation from a non-empty, already ranked candidate list
    pub fn recommendation(&self, mut candidates: Vec<ScoredCandidate>) -> Option<EngineResponse> {
        if candidates.is_empty() {
            return None;
        }
        let best = candidates.remove(0);

        let mut message = format!(
            "I found \"{}\", a {}% match for your ingredients.",
            best.recipe.title,
            best.score.percent()
        );
        if !best.score.matched.is_empty() {
            message.push_str(&format!(" You already have: {}.", best.score.matched.join(", ")));
        }
        if !best.score.missing.is_empty() {
            message.push_str(&format!(" You may also need: {}.", best.score.missing.join(", ")));
        }
        if !candidates.is_empty() {
            message.push_str(&format!(
                " There {} {} more option{} below.",
                if candidates.len() == 1 { "is" } else { "are" },
                candidates.len(),
                if candidates.len() == 1 { "" } else { "s" }
            ));
        }

        Some(EngineResponse::Recommendation {
            best,
            alternatives: candidates,
            message,
        })
    }

    pub fn insufficient(&self, found: Vec<String>, suggestions: Vec<String>) -> EngineResponse {
        let message = if found.is_empty() {
            let mut message = "I couldn't spot any ingredients in your message. Could you list \
                               what you have, for example \"chicken, rice and onion\"?"
                .to_string();
            if !suggestions.is_empty() {
                message.push_str(&format!(" Common choices: {}.", suggestions.join(", ")));
            }
            message
        } else {
            let mut message = format!(
                "I only found {} ({}) and no saved recipe matches. Tell me at least 3 \
                 ingredients so I can suggest something.",
                found.join(", "),
                found.len()
            );
            if !suggestions.is_empty() {
                message.push_str(&format!(" You could add: {}.", suggestions.join(", ")));
            }
            message
        };

        EngineResponse::InsufficientIngredients {
            found,
            suggestions,
            message,
        }
    }

    pub fn no_match(&self, ingredients: Vec<String>) -> EngineResponse {
        let message = format!(
            "No saved recipe matches {}. Enable a generation tier (free_model or paid_model) \
             to get a new recipe created for these ingredients.",
            ingredients.join(", ")
        );

        EngineResponse::NoMatchNoGenerate {
            ingredients,
            message,
        }
    }

    pub fn generated(&self, recipe: GeneratedRecipe, tier: ProviderTier) -> EngineResponse {
        let message = format!(
            "Here is a new recipe: \"{}\" ({} min, difficulty {}/5, healthiness {}/5).",
            recipe.title, recipe.time_to_make, recipe.difficulty, recipe.healthiness
        );

        EngineResponse::Generated {
            recipe,
            provider_tag: tier,
            message,
        }
    }

    pub fn provider_error(&self, tier: ProviderTier, failure: &ProviderFailure) -> EngineResponse {
        let detail = match failure {
            ProviderFailure::Unavailable(_) => "the generator is not available right now",
            ProviderFailure::Timeout => "the generator took too long to answer",
            ProviderFailure::MalformedOutput { .. } => "the generator returned an unreadable recipe",
            ProviderFailure::Api { .. } => "the generator rejected the request",
            ProviderFailure::Network(_) => "the generator could not be reached",
            ProviderFailure::Cancelled => "the request was cancelled",
        };
        let message = format!(
            "Sorry, I couldn't create a recipe with {}: {} ({}).",
            tier,
            detail,
            failure.reason().as_str()
        );

        EngineResponse::ProviderError {
            provider_tag: tier,
            raw_text: failure.raw_text().map(str::to_string),
            reason: failure.reason(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FailureReason, MatchScore, RecipeRecord};

    fn candidate(id: i64, percentage: f64) -> ScoredCandidate {
        ScoredCandidate {
            recipe: RecipeRecord {
                id,
                title: format!("Recipe {}", id),
                ingredients: "rice".to_string(),
                preparation: String::new(),
                difficulty: 2,
                healthiness: 3,
                time_to_make: 20,
                category_id: None,
                category: None,
                cuisine: None,
                likes_count: 0,
                visible: true,
                author_name: "tester".to_string(),
            },
            score: MatchScore {
                matched: vec!["rice".to_string()],
                missing: vec!["salt".to_string()],
                percentage,
                total_recipe_ingredients: 2,
            },
        }
    }

    #[test]
    fn test_recommendation_splits_best_and_alternatives() {
        let response = ResponseFormatter
            .recommendation(vec![candidate(1, 1.0), candidate(2, 0.5)])
            .unwrap();

        match response {
            EngineResponse::Recommendation {
                best,
                alternatives,
                message,
            } => {
                assert_eq!(best.recipe.id, 1);
                assert_eq!(alternatives.len(), 1);
                assert!(message.contains("100%"));
                assert!(message.contains("salt"));
                assert!(message.contains("1 more option "));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_recommendation_requires_candidates() {
        assert!(ResponseFormatter.recommendation(Vec::new()).is_none());
    }

    #[test]
    fn test_empty_parse_asks_for_clarification() {
        let response = ResponseFormatter.insufficient(Vec::new(), vec!["rice".to_string()]);
        assert!(response.message().contains("couldn't spot any ingredients"));
        assert!(response.message().contains("rice"));
    }

    #[test]
    fn test_insufficient_mentions_found_ingredients() {
        let response = ResponseFormatter.insufficient(vec!["egg".to_string()], Vec::new());
        assert!(response.message().contains("egg"));
        assert!(response.message().contains("at least 3"));
    }

    #[test]
    fn test_provider_error_carries_reason_and_raw_text() {
        let failure = ProviderFailure::MalformedOutput {
            raw: "oops".to_string(),
            detail: "no object".to_string(),
        };
        let response = ResponseFormatter.provider_error(ProviderTier::FreeModel, &failure);

        match &response {
            EngineResponse::ProviderError {
                provider_tag,
                raw_text,
                reason,
                message,
            } => {
                assert_eq!(*provider_tag, ProviderTier::FreeModel);
                assert_eq!(raw_text.as_deref(), Some("oops"));
                assert_eq!(*reason, FailureReason::ProviderMalformedOutput);
                assert!(message.contains("provider_malformed_output"));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
