use serde::Deserialize;
use std::sync::LazyLock;

const EMBEDDED_VOCABULARY: &str = include_str!("../../data/vocabulary.json");

static DEFAULT_VOCABULARY: LazyLock<Vocabulary> = LazyLock::new(|| {
    Vocabulary::from_json(EMBEDDED_VOCABULARY).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Embedded vocabulary is invalid, using empty tables");
        Vocabulary::default()
    })
});

/// Keyword sets for each detectable preference
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferenceKeywords {
    #[serde(default)]
    pub healthy: Vec<String>,
    #[serde(default)]
    pub oven: Vec<String>,
    #[serde(default)]
    pub pan: Vec<String>,
    #[serde(default)]
    pub boil: Vec<String>,
    #[serde(default)]
    pub quick: Vec<String>,
    #[serde(default)]
    pub vegetarian: Vec<String>,
    #[serde(default)]
    pub vegan: Vec<String>,
    #[serde(default)]
    pub easy: Vec<String>,
    #[serde(default)]
    pub hard: Vec<String>,
}

impl PreferenceKeywords {
    fn all(&self) -> impl Iterator<Item = &String> {
        [
            &self.healthy,
            &self.oven,
            &self.pan,
            &self.boil,
            &self.quick,
            &self.vegetarian,
            &self.vegan,
            &self.easy,
            &self.hard,
        ]
        .into_iter()
        .flatten()
    }
}

/// Word lists driving the parser, matcher and filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Vocabulary {
    /// Known ingredient names
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Words after which the next word is taken as an ingredient
    #[serde(default)]
    pub connectors: Vec<String>,
    /// Words never taken as ingredients by the connector heuristic
    #[serde(default)]
    pub stop_words: Vec<String>,
    /// Words accepted after a number as "minutes"
    #[serde(default)]
    pub time_units: Vec<String>,
    #[serde(default)]
    pub keywords: PreferenceKeywords,
    /// Groups of mutually matching ingredient names
    #[serde(default)]
    pub synonyms: Vec<Vec<String>>,
    #[serde(default)]
    pub meat_keywords: Vec<String>,
    /// Common ingredients offered as suggestions
    #[serde(default)]
    pub staples: Vec<String>,
}

impl Vocabulary {
    /// Parses a vocabulary table, lower-casing every entry
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut vocabulary: Vocabulary = serde_json::from_str(json)?;
        vocabulary.normalize();
        Ok(vocabulary)
    }

    /// The embedded default tables
    pub fn embedded() -> &'static Vocabulary {
        &DEFAULT_VOCABULARY
    }

    fn normalize(&mut self) {
        let lists = [
            &mut self.ingredients,
            &mut self.connectors,
            &mut self.stop_words,
            &mut self.time_units,
            &mut self.meat_keywords,
            &mut self.staples,
            &mut self.keywords.healthy,
            &mut self.keywords.oven,
            &mut self.keywords.pan,
            &mut self.keywords.boil,
            &mut self.keywords.quick,
            &mut self.keywords.vegetarian,
            &mut self.keywords.vegan,
            &mut self.keywords.easy,
            &mut self.keywords.hard,
        ];
        for list in lists {
            lower_all(list);
        }
        for class in &mut self.synonyms {
            lower_all(class);
        }
    }

    pub fn is_connector(&self, word: &str) -> bool {
        self.connectors.iter().any(|c| c == word)
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.iter().any(|s| s == word)
    }

    pub fn is_time_unit(&self, word: &str) -> bool {
        self.time_units.iter().any(|u| u == word)
    }

    /// True when `word` is one of the preference keywords
    pub fn is_preference_keyword(&self, word: &str) -> bool {
        self.keywords.all().any(|k| k == word)
    }
}

fn lower_all(list: &mut [String]) {
    for entry in list.iter_mut() {
        *entry = entry.trim().to_lowercase();
    }
}

/// Finds `term` in `text` starting at a word boundary
///
/// The match may end at a word boundary or continue with a plural
/// suffix ("s"/"es"). Both inputs are expected lower-case. Returns the
/// byte span of the match including any suffix.
pub fn find_term(text: &str, term: &str) -> Option<(usize, usize)> {
    if term.is_empty() {
        return None;
    }

    let mut from = 0;
    while let Some(offset) = text[from..].find(term) {
        let start = from + offset;
        let end = start + term.len();

        let starts_word = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());

        if starts_word {
            let rest = &text[end..];
            for suffix in ["", "s", "es"] {
                if let Some(after) = rest.strip_prefix(suffix) {
                    let ends_word = after.chars().next().map_or(true, |c| !c.is_alphanumeric());
                    if ends_word {
                        return Some((start, end + suffix.len()));
                    }
                }
            }
        }

        // Step past the first char of this occurrence
        from = start + text[start..].chars().next().map_or(1, |c| c.len_utf8());
    }

    None
}

/// True when `text` mentions `term` as a word (see [`find_term`])
pub fn mentions(text: &str, term: &str) -> bool {
    find_term(text, term).is_some()
}

/// True when `text` mentions any of `terms`
pub fn mentions_any(text: &str, terms: &[String]) -> bool {
    terms.iter().any(|term| mentions(text, term))
}
