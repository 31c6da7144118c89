//! Shopping list derived from a meal plan.
//!
//! The list is never stored: it is recomputed from the plan whenever it is
//! needed. Ingredient lines are de-duplicated by exact string equality, with
//! the first occurrence deciding the position.

use indexmap::IndexSet;
use serde::Serialize;

use crate::meal_plan::MealPlan;

/// Unique ingredient lines in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ShoppingList(IndexSet<String>);

impl ShoppingList {
    /// Collect every ingredient line of `plan`, in plan order then recipe order.
    #[must_use]
    pub fn build(plan: &MealPlan) -> Self {
        let items = plan
            .iter()
            .flat_map(|recipe| recipe.ingredients.iter())
            .cloned()
            .collect();
        Self(items)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        self.0.contains(item)
    }

    /// Item at `index`, for copying a single line out of the list.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get_index(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}
