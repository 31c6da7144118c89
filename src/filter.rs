//! Inclusive ceiling filters over a result set.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::recipe::Recipe;

/// Display-time ceilings. An unset ceiling admits everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayFilter {
    /// Inclusive upper bound on calories.
    #[serde(default)]
    pub max_calories: Option<f64>,
    /// Inclusive upper bound on preparation time, in minutes.
    #[serde(default)]
    pub max_time: Option<u32>,
}

impl DisplayFilter {
    /// Build a filter, rejecting negative or non-finite calorie ceilings.
    pub fn new(max_calories: Option<f64>, max_time: Option<u32>) -> Result<Self> {
        let filter = Self {
            max_calories,
            max_time,
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<()> {
        match self.max_calories {
            Some(c) if !c.is_finite() || c < 0.0 => Err(Error::InvalidFilter(format!(
                "max_calories must be a non-negative number, got {c}"
            ))),
            _ => Ok(()),
        }
    }

    /// Whether `recipe` is within every set ceiling.
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.max_calories.is_none_or(|max| recipe.calories() <= max)
            && self.max_time.is_none_or(|max| recipe.prep_minutes() <= max)
    }
}

/// Keep the recipes that pass `filter`, in input order.
#[must_use]
pub fn filter(recipes: &[Recipe], filter: &DisplayFilter) -> Vec<Recipe> {
    recipes
        .iter()
        .filter(|recipe| filter.matches(recipe))
        .cloned()
        .collect()
}
