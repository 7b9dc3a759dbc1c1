use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// How the user wants the dish cooked
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CookingMethod {
    Oven,
    Pan,
    Boil,
}

impl CookingMethod {
    pub fn label(&self) -> &'static str {
        match self {
            CookingMethod::Oven => "oven",
            CookingMethod::Pan => "pan",
            CookingMethod::Boil => "boiled",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
}

impl DietaryRestriction {
    pub fn label(&self) -> &'static str {
        match self {
            DietaryRestriction::Vegetarian => "vegetarian",
            DietaryRestriction::Vegan => "vegan",
        }
    }
}

/// Requested difficulty band
///
/// Recipe difficulty is stored on a 1-5 scale; the bands overlap at 2 and 4.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Whether a stored 1-5 difficulty level falls inside this band
    pub fn accepts(&self, level: i32) -> bool {
        match self {
            Difficulty::Easy => level <= 2,
            Difficulty::Medium => (2..=4).contains(&level),
            Difficulty::Hard => level >= 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Preferences detected in a user request
///
/// Every field is independent. An absent field (or `false` for `healthy`)
/// means "no constraint", never "the opposite".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    pub healthy: bool,
    pub cooking_method: Option<CookingMethod>,
    /// Always positive when present
    pub time_limit_minutes: Option<u32>,
    pub dietary_restrictions: BTreeSet<DietaryRestriction>,
    pub difficulty: Option<Difficulty>,
}

impl Preferences {
    /// Creates preferences with no constraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time limit, ignoring zero
    pub fn set_time_limit(&mut self, minutes: u32) {
        if minutes > 0 {
            self.time_limit_minutes = Some(minutes);
        }
    }

    pub fn add_restriction(&mut self, restriction: DietaryRestriction) {
        self.dietary_restrictions.insert(restriction);
    }

    /// True when the vegetarian meat exclusion applies (vegan implies it)
    pub fn excludes_meat(&self) -> bool {
        !self.dietary_restrictions.is_empty()
    }

    /// True when no preference was detected
    pub fn is_unconstrained(&self) -> bool {
        !self.healthy
            && self.cooking_method.is_none()
            && self.time_limit_minutes.is_none()
            && self.dietary_restrictions.is_empty()
            && self.difficulty.is_none()
    }
}
