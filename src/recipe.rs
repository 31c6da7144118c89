//! Normalized recipe records.
//!
//! A [`Recipe`] is produced once by the catalog client and treated as
//! read-only afterwards. Optional catalog fields stay optional here: "absent"
//! and "zero" are different states until a consumer asks for a value.
//!
//! # Default policy
//!
//! Every consumer that needs a number (ranking, filtering) goes through
//! [`Recipe::nutrient_amount`] and [`Recipe::prep_minutes`], which read an
//! absent value as `0`. Display helpers read an absent value as `unknown`.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

/// Well-known nutrient names as reported by the catalog.
pub mod nutrient {
    pub const CALORIES: &str = "Calories";
    pub const CARBOHYDRATES: &str = "Carbohydrates";
    pub const PROTEIN: &str = "Protein";
    pub const FAT: &str = "Fat";
}

/// Placeholder rendered for values the catalog did not report.
pub const UNKNOWN: &str = "unknown";

/// Opaque catalog identifier.
///
/// The catalog reports numeric ids; both numbers and strings are accepted so a
/// persisted plan survives a catalog that switches representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for RecipeId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RecipeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

/// Sparse mapping from nutrient name to amount, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nutrients(IndexMap<String, f64>);

impl Nutrients {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount reported for `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Record an amount. The first amount reported for a name wins.
    pub fn insert(&mut self, name: impl Into<String>, amount: f64) {
        self.0.entry(name.into()).or_insert(amount);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, amount)| (name.as_str(), *amount))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Nutrients {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut nutrients = Self::new();
        for (name, amount) in iter {
            nutrients.insert(name, amount);
        }
        nutrients
    }
}

/// A recipe as returned by the catalog, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub nutrients: Nutrients,
    /// Human-readable ingredient lines, used verbatim.
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl Recipe {
    /// Amount of `name` for ranking and filtering; absent reads as `0`.
    #[must_use]
    pub fn nutrient_amount(&self, name: &str) -> f64 {
        self.nutrients.get(name).unwrap_or(0.0)
    }

    /// Calories for ranking and filtering; absent reads as `0`.
    #[must_use]
    pub fn calories(&self) -> f64 {
        self.nutrient_amount(nutrient::CALORIES)
    }

    /// Preparation time for ranking and filtering; absent reads as `0`.
    #[must_use]
    pub fn prep_minutes(&self) -> u32 {
        self.ready_in_minutes.unwrap_or(0)
    }

    /// Link to the catalog's detail page: `{site}{title}-{id}`.
    #[must_use]
    pub fn detail_url(&self, site: &Url) -> Url {
        let mut url = site.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&format!("{}-{}", self.title, self.id));
        }
        url
    }

    /// `"<amount> kcal"`, or `"unknown kcal"` when not reported.
    #[must_use]
    pub fn display_calories(&self) -> String {
        format!("{} kcal", display_amount(self.nutrients.get(nutrient::CALORIES)))
    }

    /// Carbohydrates, protein and fat in grams.
    #[must_use]
    pub fn display_macros(&self) -> String {
        let grams = |name: &str| match self.nutrients.get(name) {
            Some(amount) => format!("{amount}g"),
            None => UNKNOWN.to_string(),
        };
        format!(
            "Carbs: {}, Protein: {}, Fat: {}",
            grams(nutrient::CARBOHYDRATES),
            grams(nutrient::PROTEIN),
            grams(nutrient::FAT)
        )
    }

    #[must_use]
    pub fn display_prep_time(&self) -> String {
        match self.ready_in_minutes {
            Some(minutes) => format!("{minutes} minutes"),
            None => UNKNOWN.to_string(),
        }
    }
}

fn display_amount(amount: Option<f64>) -> String {
    amount.map_or_else(|| UNKNOWN.to_string(), |a| a.to_string())
}
