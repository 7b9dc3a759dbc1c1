use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::{
    models::{CookingMethod, DietaryRestriction, Difficulty, ParsedRequest, Preferences},
    services::vocabulary::{find_term, mentions_any, Vocabulary},
};

/// Time limit implied by "quick"-style words when no number is given
pub const QUICK_TIME_LIMIT_MINUTES: u32 = 30;

/// Connector candidates shorter than this are ignored
const MIN_CONNECTOR_WORD_CHARS: usize = 3;

static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}+").expect("Invalid word regex"));

static DURATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,4})\s*(\p{L}+)").expect("Invalid duration regex"));

/// Keyword and pattern heuristics turning free text into a `ParsedRequest`
///
/// No I/O. Garbage input yields an empty ingredient list rather than an error.
pub struct RequestParser<'a> {
    vocabulary: &'a Vocabulary,
}

impl Default for RequestParser<'static> {
    fn default() -> Self {
        Self::new(Vocabulary::embedded())
    }
}

impl<'a> RequestParser<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn parse(&self, text: &str) -> ParsedRequest {
        let lowered = text.to_lowercase();

        ParsedRequest {
            ingredients: self.extract_ingredients(&lowered),
            preferences: self.detect_preferences(&lowered),
            original_text: text.to_string(),
        }
    }

    /// Vocabulary scan plus connector heuristic, ordered by position in the text
    fn extract_ingredients(&self, text: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = Vec::new();
        let mut claimed: Vec<(usize, usize)> = Vec::new();

        // Longest names first so "chicken breast" wins over "chicken"
        let mut names: Vec<&String> = self.vocabulary.ingredients.iter().collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()));

        for name in names {
            let free_span = all_occurrences(text, name)
                .into_iter()
                .find(|span| !overlaps_any(*span, &claimed));

            if let Some(span) = free_span {
                claimed.push(span);
                found.push((span.0, name.clone()));
            }
        }

        let words: Vec<_> = WORD_REGEX.find_iter(text).collect();
        for pair in words.windows(2) {
            let (connector, candidate) = (pair[0].as_str(), pair[1]);
            if !self.vocabulary.is_connector(connector) {
                continue;
            }

            let word = candidate.as_str();
            if word.chars().count() < MIN_CONNECTOR_WORD_CHARS
                || self.vocabulary.is_stop_word(word)
                || self.vocabulary.is_connector(word)
                || self.vocabulary.is_preference_keyword(word)
                || overlaps_any((candidate.start(), candidate.end()), &claimed)
            {
                continue;
            }

            claimed.push((candidate.start(), candidate.end()));
            found.push((candidate.start(), word.to_string()));
        }

        found.sort_by_key(|(position, _)| *position);

        let mut seen = HashSet::new();
        found
            .into_iter()
            .map(|(_, name)| name)
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    fn detect_preferences(&self, text: &str) -> Preferences {
        let keywords = &self.vocabulary.keywords;
        let mut preferences = Preferences::new();

        preferences.healthy = mentions_any(text, &keywords.healthy);

        preferences.cooking_method = if mentions_any(text, &keywords.oven) {
            Some(CookingMethod::Oven)
        } else if mentions_any(text, &keywords.pan) {
            Some(CookingMethod::Pan)
        } else if mentions_any(text, &keywords.boil) {
            Some(CookingMethod::Boil)
        } else {
            None
        };

        match self.explicit_minutes(text) {
            Some(minutes) => preferences.set_time_limit(minutes),
            None if mentions_any(text, &keywords.quick) => {
                preferences.set_time_limit(QUICK_TIME_LIMIT_MINUTES)
            }
            None => {}
        }

        if mentions_any(text, &keywords.vegetarian) {
            preferences.add_restriction(DietaryRestriction::Vegetarian);
        }
        if mentions_any(text, &keywords.vegan) {
            preferences.add_restriction(DietaryRestriction::Vegan);
        }

        preferences.difficulty = if mentions_any(text, &keywords.easy) {
            Some(Difficulty::Easy)
        } else if mentions_any(text, &keywords.hard) {
            Some(Difficulty::Hard)
        } else {
            None
        };

        preferences
    }

    /// First "<N> minutes" pattern with a positive N
    fn explicit_minutes(&self, text: &str) -> Option<u32> {
        DURATION_REGEX.captures_iter(text).find_map(|caps| {
            if !self.vocabulary.is_time_unit(&caps[2]) {
                return None;
            }
            caps[1].parse::<u32>().ok().filter(|minutes| *minutes > 0)
        })
    }
}

fn all_occurrences(text: &str, term: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut from = 0;
    while from < text.len() {
        match find_term(&text[from..], term) {
            Some((start, end)) => {
                spans.push((from + start, from + end));
                from += end;
            }
            None => break,
        }
    }
    spans
}

fn overlaps_any(span: (usize, usize), claimed: &[(usize, usize)]) -> bool {
    claimed
        .iter()
        .any(|(start, end)| span.0 < *end && *start < span.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_vocabulary() -> Vocabulary {
        Vocabulary::from_json(
            r#"{
                "ingredients": ["chicken", "chicken breast", "tomato", "garlic", "rice"],
                "connectors": ["with", "and"],
                "stop_words": ["the", "some"],
                "time_units": ["minutes", "min"],
                "keywords": {
                    "healthy": ["healthy", "light"],
                    "oven": ["oven"],
                    "pan": ["pan"],
                    "boil": ["boil"],
                    "quick": ["quick", "simple"],
                    "vegetarian": ["vegetarian"],
                    "vegan": ["vegan"],
                    "easy": ["easy", "simple"],
                    "hard": ["hard", "complex"]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_extracts_vocabulary_in_text_order() {
        let vocabulary = small_vocabulary();
        let parsed = RequestParser::new(&vocabulary).parse("I have Garlic, rice and TOMATOES");
        assert_eq!(parsed.ingredients, vec!["garlic", "rice", "tomato"]);
        assert_eq!(parsed.original_text, "I have Garlic, rice and TOMATOES");
    }

    #[test]
    fn test_longer_vocabulary_entry_wins() {
        let vocabulary = small_vocabulary();
        let parsed = RequestParser::new(&vocabulary).parse("chicken breast with rice");
        assert_eq!(parsed.ingredients, vec!["chicken breast", "rice"]);
    }

    #[test]
    fn test_connector_heuristic_adds_unknown_words() {
        let vocabulary = small_vocabulary();
        let parsed = RequestParser::new(&vocabulary).parse("rice with saffron and the peas");
        assert_eq!(parsed.ingredients, vec!["rice", "saffron"]);
    }

    #[test]
    fn test_connector_heuristic_skips_preference_keywords() {
        let parser = RequestParser::default();

        let parsed = parser.parse("I have chicken with baked potatoes");
        assert_eq!(parsed.ingredients, vec!["chicken", "potato"]);
        assert_eq!(parsed.preferences.cooking_method, Some(CookingMethod::Oven));

        let parsed = parser.parse("tofu and vegan cheese");
        assert_eq!(parsed.ingredients, vec!["tofu", "cheese"]);
        assert_eq!(parsed.ingredient_count(), 2);
    }

    #[test]
    fn test_plus_and_add_connectors() {
        let parser = RequestParser::default();
        let parsed = parser.parse("rice plus saffron, add quinoa");
        assert_eq!(parsed.ingredients, vec!["rice", "saffron", "quinoa"]);

        let parsed = parser.parse("rice plus fried onions");
        assert!(!parsed.ingredients.contains(&"fried".to_string()));
    }

    #[test]
    fn test_connector_heuristic_skips_short_and_stop_words() {
        let vocabulary = small_vocabulary();
        let parsed = RequestParser::new(&vocabulary).parse("with ox and some with it");
        assert!(parsed.ingredients.is_empty());
    }

    #[test]
    fn test_duplicates_removed() {
        let vocabulary = small_vocabulary();
        let parsed =
            RequestParser::new(&vocabulary).parse("rice, RICE and rice with kale and kale");
        assert_eq!(parsed.ingredients, vec!["rice", "kale"]);
    }

    #[test]
    fn test_empty_and_garbage_input() {
        let vocabulary = small_vocabulary();
        let parser = RequestParser::new(&vocabulary);
        assert!(parser.parse("").ingredients.is_empty());
        assert!(parser.parse("?!? 123 ...").ingredients.is_empty());
        assert!(parser.parse("").preferences.is_unconstrained());
    }

    #[test]
    fn test_cooking_method_precedence() {
        let vocabulary = small_vocabulary();
        let parser = RequestParser::new(&vocabulary);
        assert_eq!(
            parser.parse("boil it or use the oven").preferences.cooking_method,
            Some(CookingMethod::Oven)
        );
        assert_eq!(
            parser.parse("a pan, then boil").preferences.cooking_method,
            Some(CookingMethod::Pan)
        );
        assert_eq!(
            parser.parse("just boil").preferences.cooking_method,
            Some(CookingMethod::Boil)
        );
        assert_eq!(parser.parse("rice").preferences.cooking_method, None);
    }

    #[test]
    fn test_explicit_time_beats_quick() {
        let vocabulary = small_vocabulary();
        let parser = RequestParser::new(&vocabulary);
        assert_eq!(
            parser.parse("something quick, 15 minutes max").preferences.time_limit_minutes,
            Some(15)
        );
        assert_eq!(
            parser.parse("quick dinner").preferences.time_limit_minutes,
            Some(QUICK_TIME_LIMIT_MINUTES)
        );
        assert_eq!(parser.parse("in 20min").preferences.time_limit_minutes, Some(20));
        assert_eq!(parser.parse("2 tomatoes").preferences.time_limit_minutes, None);
        assert_eq!(parser.parse("0 minutes").preferences.time_limit_minutes, None);
    }

    #[test]
    fn test_dietary_restrictions_accumulate() {
        let vocabulary = small_vocabulary();
        let parsed = RequestParser::new(&vocabulary).parse("vegetarian or vegan please");
        assert!(parsed
            .preferences
            .dietary_restrictions
            .contains(&DietaryRestriction::Vegetarian));
        assert!(parsed
            .preferences
            .dietary_restrictions
            .contains(&DietaryRestriction::Vegan));
    }

    #[test]
    fn test_difficulty_detection() {
        let vocabulary = small_vocabulary();
        let parser = RequestParser::new(&vocabulary);
        assert_eq!(
            parser.parse("something simple").preferences.difficulty,
            Some(Difficulty::Easy)
        );
        assert_eq!(
            parser.parse("a complex dish").preferences.difficulty,
            Some(Difficulty::Hard)
        );
        assert_eq!(parser.parse("rice").preferences.difficulty, None);
    }

    #[test]
    fn test_healthy_flag() {
        let vocabulary = small_vocabulary();
        let parser = RequestParser::new(&vocabulary);
        assert!(parser.parse("something LIGHT").preferences.healthy);
        assert!(!parser.parse("delightful rice").preferences.healthy);
    }

    #[test]
    fn test_parse_is_pure() {
        let parser = RequestParser::default();
        let text = "Quick vegan dinner with tofu, rice and broccoli in the oven, 25 minutes";
        assert_eq!(parser.parse(text), parser.parse(text));
    }

    #[test]
    fn test_default_vocabulary_example() {
        let parsed = RequestParser::default().parse("I have chicken, tomatoes and garlic");
        assert_eq!(parsed.ingredients, vec!["chicken", "tomato", "garlic"]);
        assert!(parsed.preferences.is_unconstrained());
    }
}
