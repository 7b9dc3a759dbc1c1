use serde_json::{Map, Value};

use super::ProviderFailure;
use crate::models::GeneratedRecipe;

const MIN_SCALE: i64 = 1;
const MAX_SCALE: i64 = 5;

/// Returns the first balanced `{...}` block of `raw`
///
/// Braces inside JSON strings are ignored, so commentary or markdown fences
/// around the object do not matter.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in raw[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extracts, parses and coerces a recipe from raw backend text
pub fn parse_generated_recipe(raw: &str) -> Result<GeneratedRecipe, ProviderFailure> {
    let malformed = |detail: String| ProviderFailure::MalformedOutput {
        raw: raw.to_string(),
        detail,
    };

    let json = extract_json_object(raw)
        .ok_or_else(|| malformed("no JSON object found in response".to_string()))?;

    let value: Value =
        serde_json::from_str(json).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

    let fields = value
        .as_object()
        .ok_or_else(|| malformed("response is not a JSON object".to_string()))?;

    let title = text_field(fields, "title");
    if title.trim().is_empty() {
        return Err(malformed("recipe has no title".to_string()));
    }

    let tips = text_field(fields, "tips");

    Ok(GeneratedRecipe {
        title: title.trim().to_string(),
        description: text_field(fields, "description"),
        ingredients: text_field(fields, "ingredients"),
        preparation: text_field(fields, "preparation"),
        time_to_make: coerce_int(fields.get("time_to_make"))
            .map_or(0, |minutes| minutes.clamp(0, i64::from(u32::MAX)) as u32),
        difficulty: scale_field(fields, "difficulty"),
        healthiness: scale_field(fields, "healthiness"),
        tips: Some(tips).filter(|t| !t.trim().is_empty()),
    })
}

/// Reads a text field; arrays become one entry per line
fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn scale_field(fields: &Map<String, Value>, key: &str) -> u8 {
    coerce_int(fields.get(key))
        .unwrap_or(MIN_SCALE)
        .clamp(MIN_SCALE, MAX_SCALE) as u8
}

/// Integer from a JSON number or a string with a leading number ("30 minutes")
pub fn coerce_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let trimmed = s.trim_start();
            let digits: String = trimmed
                .char_indices()
                .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '-'))
                .map(|(_, c)| c)
                .collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WELL_FORMED: &str = r#"{
        "title": "Garlic Chicken",
        "description": "Weeknight dinner",
        "ingredients": "chicken\ngarlic",
        "preparation": "Sear, then simmer.",
        "time_to_make": "30",
        "difficulty": "2",
        "healthiness": "4",
        "tips": "Rest the meat."
    }"#;

    #[test]
    fn test_parse_coerces_string_numbers() {
        let recipe = parse_generated_recipe(WELL_FORMED).unwrap();
        assert_eq!(recipe.title, "Garlic Chicken");
        assert_eq!(recipe.time_to_make, 30);
        assert_eq!(recipe.difficulty, 2);
        assert_eq!(recipe.healthiness, 4);
        assert_eq!(recipe.tips, Some("Rest the meat.".to_string()));
    }

    #[test]
    fn test_parse_ignores_fences_and_commentary() {
        let raw = format!("Sure! Here you go:\n```json\n{}\n```\nEnjoy {{your meal}}", WELL_FORMED);
        let recipe = parse_generated_recipe(&raw).unwrap();
        assert_eq!(recipe.title, "Garlic Chicken");
    }

    #[test]
    fn test_extract_handles_braces_in_strings() {
        let raw = r#"noise {"title": "A {weird} title", "n": {"x": "}"}} trailing }"#;
        assert_eq!(
            extract_json_object(raw),
            Some(r#"{"title": "A {weird} title", "n": {"x": "}"}}"#)
        );
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("{ never closed"), None);
    }

    #[test]
    fn test_invalid_json_preserves_raw_text() {
        let raw = "I cannot help with that {title: oops}";
        let err = parse_generated_recipe(raw).unwrap_err();
        match &err {
            ProviderFailure::MalformedOutput { raw: kept, .. } => assert_eq!(kept, raw),
            other => panic!("unexpected failure: {:?}", other),
        }
        assert_eq!(err.raw_text(), Some(raw));
    }

    #[test]
    fn test_missing_object_is_malformed() {
        let err = parse_generated_recipe("just prose").unwrap_err();
        assert!(matches!(err, ProviderFailure::MalformedOutput { .. }));
    }

    #[test]
    fn test_missing_title_is_malformed() {
        let err = parse_generated_recipe(r#"{"description": "untitled"}"#).unwrap_err();
        assert!(err.to_string().contains("no title"));
    }

    #[test]
    fn test_numbers_clamped_and_lists_joined() {
        let raw = json!({
            "title": "Soup",
            "ingredients": ["water", "salt"],
            "time_to_make": 12.6,
            "difficulty": 9,
            "healthiness": "0",
        })
        .to_string();

        let recipe = parse_generated_recipe(&raw).unwrap();
        assert_eq!(recipe.ingredients, "water\nsalt");
        assert_eq!(recipe.time_to_make, 13);
        assert_eq!(recipe.difficulty, 5);
        assert_eq!(recipe.healthiness, 1);
        assert_eq!(recipe.tips, None);
        assert_eq!(recipe.preparation, "");
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int(Some(&json!("45 minutes"))), Some(45));
        assert_eq!(coerce_int(Some(&json!(" 20"))), Some(20));
        assert_eq!(coerce_int(Some(&json!(7))), Some(7));
        assert_eq!(coerce_int(Some(&json!("about an hour"))), None);
        assert_eq!(coerce_int(Some(&json!(null))), None);
        assert_eq!(coerce_int(None), None);
    }
}
