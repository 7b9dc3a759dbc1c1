use std::fmt::Write;

use crate::models::{ConversationTurn, ParsedRequest};

/// Prior turns embedded in a generation prompt
pub const MAX_HISTORY_TURNS: usize = 6;

const SYSTEM_INSTRUCTIONS: &str = "You are a cooking assistant. Create one original recipe \
that uses the ingredients below. You may add common pantry items such as salt, pepper, oil \
and water.";

const OUTPUT_CONTRACT: &str = r#"Respond with ONLY a JSON object, no markdown and no text before or after it, using exactly these keys:
{
  "title": "recipe name",
  "description": "one or two sentences",
  "ingredients": "one ingredient with quantity per line",
  "preparation": "numbered steps, one per line",
  "time_to_make": 30,
  "difficulty": 2,
  "healthiness": 4,
  "tips": "optional serving or storage tips"
}
time_to_make is in minutes. difficulty and healthiness are integers from 1 to 5."#;

/// Builds the generation prompt for a parsed request
///
/// Every present preference is spelled out; absent ones are omitted.
pub fn build_prompt(request: &ParsedRequest, history: &[ConversationTurn]) -> String {
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(SYSTEM_INSTRUCTIONS);
    prompt.push_str("\n\n");

    let recent = &history[history.len().saturating_sub(MAX_HISTORY_TURNS)..];
    if !recent.is_empty() {
        prompt.push_str("Conversation so far:\n");
        for turn in recent {
            let _ = writeln!(prompt, "{}: {}", turn.role.as_str(), turn.content.trim());
        }
        prompt.push('\n');
    }

    let _ = writeln!(prompt, "Ingredients: {}", request.ingredients.join(", "));

    let requirements = requirements(request);
    if !requirements.is_empty() {
        prompt.push_str("Requirements:\n");
        for requirement in requirements {
            let _ = writeln!(prompt, "- {}", requirement);
        }
    }

    prompt.push('\n');
    prompt.push_str(OUTPUT_CONTRACT);
    prompt
}

fn requirements(request: &ParsedRequest) -> Vec<String> {
    let preferences = &request.preferences;
    let mut lines = Vec::new();

    if preferences.healthy {
        lines.push("healthy, light recipe (healthiness 3 or higher)".to_string());
    }
    if let Some(method) = preferences.cooking_method {
        lines.push(format!("cooking method: {}", method.label()));
    }
    if let Some(minutes) = preferences.time_limit_minutes {
        lines.push(format!("ready in at most {} minutes", minutes));
    }
    for restriction in &preferences.dietary_restrictions {
        lines.push(format!("must be {}", restriction.label()));
    }
    if let Some(difficulty) = preferences.difficulty {
        lines.push(format!("difficulty: {}", difficulty.label()));
    }

    lines
}
