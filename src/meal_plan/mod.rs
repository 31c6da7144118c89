//! The persisted meal plan.
//!
//! [`MealPlanStore`] is the only owner of the plan. Every mutation serializes
//! the full sequence into its [`PlanStorage`] slot before the in-memory copy
//! is replaced, so a failed write leaves both copies at the previous state.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use recipe_planner::meal_plan::{MealPlanStore, MemoryStorage};
//! use recipe_planner::recipe::{Nutrients, Recipe, RecipeId};
//!
//! let mut store = MealPlanStore::load(Arc::new(MemoryStorage::new()));
//! let recipe = Recipe {
//!     id: RecipeId::from(1),
//!     title: "Omelette".to_string(),
//!     image_url: None,
//!     ready_in_minutes: Some(10),
//!     nutrients: Nutrients::new(),
//!     ingredients: vec!["2 eggs".to_string()],
//! };
//!
//! store.add(recipe).unwrap();
//! assert_eq!(store.plan().len(), 1);
//! ```

mod storage;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::recipe::Recipe;

pub use storage::{FileStorage, MemoryStorage, PlanStorage};

/// Ordered recipes chosen by the user. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealPlan(Vec<Recipe>);

impl MealPlan {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Recipe> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipe> {
        self.0.iter()
    }

    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.0
    }
}

impl From<Vec<Recipe>> for MealPlan {
    fn from(recipes: Vec<Recipe>) -> Self {
        Self(recipes)
    }
}

impl<'a> IntoIterator for &'a MealPlan {
    type Item = &'a Recipe;
    type IntoIter = std::slice::Iter<'a, Recipe>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Owner of the meal plan and its durable copy.
#[derive(Debug)]
pub struct MealPlanStore {
    storage: Arc<dyn PlanStorage>,
    plan: MealPlan,
}

impl MealPlanStore {
    /// Read the plan from `storage`.
    ///
    /// A missing, empty, unreadable or corrupt slot yields an empty plan.
    pub fn load(storage: Arc<dyn PlanStorage>) -> Self {
        let plan = read_plan(storage.as_ref());
        debug!(name: "meal_plan.loaded", recipes = plan.len(), "Meal plan loaded");
        Self { storage, plan }
    }

    #[must_use]
    pub fn plan(&self) -> &MealPlan {
        &self.plan
    }

    /// Append `recipe` and persist.
    pub fn add(&mut self, recipe: Recipe) -> Result<&MealPlan> {
        let mut recipes = self.plan.0.clone();
        recipes.push(recipe);
        self.commit(MealPlan(recipes))
    }

    /// Delete the recipe at `index` and persist.
    ///
    /// An out-of-range index deletes nothing; the plan is still persisted.
    pub fn remove(&mut self, index: usize) -> Result<&MealPlan> {
        let recipes = self
            .plan
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, recipe)| recipe.clone())
            .collect();
        self.commit(MealPlan(recipes))
    }

    fn commit(&mut self, next: MealPlan) -> Result<&MealPlan> {
        let json = serde_json::to_string(&next)?;
        self.storage.write(&json)?;
        self.plan = next;
        debug!(name: "meal_plan.persisted", recipes = self.plan.len(), "Meal plan persisted");
        Ok(&self.plan)
    }
}

fn read_plan(storage: &dyn PlanStorage) -> MealPlan {
    let contents = match storage.read() {
        Ok(Some(contents)) if !contents.trim().is_empty() => contents,
        Ok(_) => return MealPlan::default(),
        Err(e) => {
            warn!(name: "meal_plan.read_failed", error = %e, "Meal plan unreadable, starting empty");
            return MealPlan::default();
        }
    };

    match serde_json::from_str::<Option<MealPlan>>(&contents) {
        Ok(plan) => plan.unwrap_or_default(),
        Err(e) => {
            warn!(name: "meal_plan.corrupt", error = %e, "Meal plan corrupt, starting empty");
            MealPlan::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::recipe::{Nutrients, RecipeId};

    fn recipe(id: u64) -> Recipe {
        Recipe {
            id: RecipeId::from(id),
            title: format!("recipe {id}"),
            image_url: None,
            ready_in_minutes: Some(20),
            nutrients: Nutrients::new(),
            ingredients: vec![format!("ingredient {id}")],
        }
    }

    fn ids(plan: &MealPlan) -> Vec<&str> {
        plan.iter().map(|r| r.id.as_str()).collect()
    }

    fn store_with(storage: &MemoryStorage) -> MealPlanStore {
        MealPlanStore::load(Arc::new(storage.clone()))
    }

    #[derive(Debug)]
    struct BrokenStorage;

    impl PlanStorage for BrokenStorage {
        fn read(&self) -> Result<Option<String>> {
            Err(std::io::Error::other("disk gone").into())
        }

        fn write(&self, _contents: &str) -> Result<()> {
            Err(std::io::Error::other("disk gone").into())
        }
    }

    #[test]
    fn test_load_empty_slot() {
        assert!(store_with(&MemoryStorage::new()).plan().is_empty());
        assert!(store_with(&MemoryStorage::with_contents("  ")).plan().is_empty());
        assert!(store_with(&MemoryStorage::with_contents("null")).plan().is_empty());
    }

    #[test]
    fn test_load_corrupt_slot_recovers() {
        let storage = MemoryStorage::with_contents("{not json");
        assert!(store_with(&storage).plan().is_empty());

        let storage = MemoryStorage::with_contents(r#"{"title": "not a list"}"#);
        assert!(store_with(&storage).plan().is_empty());
    }

    #[test]
    fn test_load_unreadable_slot_recovers() {
        let store = MealPlanStore::load(Arc::new(BrokenStorage));
        assert!(store.plan().is_empty());
    }

    #[test]
    fn test_add_appends_and_persists() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);

        store.add(recipe(1)).unwrap();
        let plan = store.add(recipe(2)).unwrap();
        assert_eq!(ids(plan), vec!["1", "2"]);

        let reloaded = store_with(&storage);
        assert_eq!(reloaded.plan(), store.plan());
    }

    #[test]
    fn test_duplicates_allowed() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        store.add(recipe(7)).unwrap();
        store.add(recipe(7)).unwrap();
        assert_eq!(ids(store.plan()), vec!["7", "7"]);
    }

    #[test]
    fn test_remove_by_position() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        for id in [1, 2, 3, 2] {
            store.add(recipe(id)).unwrap();
        }

        store.remove(1).unwrap();
        assert_eq!(ids(store.plan()), vec!["1", "3", "2"]);
        assert_eq!(ids(store_with(&storage).plan()), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        store.add(recipe(1)).unwrap();
        store.add(recipe(2)).unwrap();

        let plan = store.remove(5).unwrap();
        assert_eq!(ids(plan), vec!["1", "2"]);
        assert_eq!(ids(store_with(&storage).plan()), vec!["1", "2"]);
    }

    #[test]
    fn test_remove_on_empty_plan_persists_empty_list() {
        let storage = MemoryStorage::new();
        let mut store = store_with(&storage);
        store.remove(0).unwrap();
        assert_eq!(storage.contents().as_deref(), Some("[]"));
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let mut store = MealPlanStore::load(Arc::new(BrokenStorage));
        let err = store.add(recipe(1)).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert!(store.plan().is_empty());
    }
}
