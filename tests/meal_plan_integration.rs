//! Meal plan durability through the file-backed slot.

use std::fs;
use std::sync::Arc;

use recipe_planner::meal_plan::{FileStorage, MealPlanStore};
use recipe_planner::recipe::{Recipe, RecipeId, nutrient};
use recipe_planner::shopping_list::ShoppingList;

fn recipe(id: u64, ingredients: &[&str]) -> Recipe {
    Recipe {
        id: RecipeId::from(id),
        title: format!("Recipe {id}"),
        image_url: Some(format!("https://img.spoonacular.com/recipes/{id}-312x231.jpg")),
        ready_in_minutes: Some(30),
        nutrients: [(nutrient::CALORIES, 410.0), (nutrient::FAT, 12.5)]
            .into_iter()
            .collect(),
        ingredients: ingredients.iter().map(ToString::to_string).collect(),
    }
}

fn open(storage: &FileStorage) -> MealPlanStore {
    MealPlanStore::load(Arc::new(storage.clone()))
}

#[test]
fn test_add_then_fresh_load() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("meal_plan.json"));

    let mut store = open(&storage);
    store.add(recipe(1, &["2 eggs"])).unwrap();
    store.add(recipe(2, &["1 cup flour"])).unwrap();

    let reloaded = open(&storage);
    assert_eq!(reloaded.plan().len(), 2);
    assert_eq!(reloaded.plan().get(1), Some(&recipe(2, &["1 cup flour"])));
}

#[test]
fn test_remove_then_fresh_load_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("meal_plan.json"));

    let mut store = open(&storage);
    for id in 1..=4 {
        store.add(recipe(id, &[])).unwrap();
    }
    store.remove(1).unwrap();

    let ids: Vec<String> = open(&storage)
        .plan()
        .iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(ids, vec!["1", "3", "4"]);
}

#[test]
fn test_corrupt_file_loads_empty_and_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meal_plan.json");
    fs::write(&path, "[{\"id\": 1, \"title\":").unwrap();
    let storage = FileStorage::new(&path);

    let mut store = open(&storage);
    assert!(store.plan().is_empty());

    store.add(recipe(5, &["1 lemon"])).unwrap();
    assert_eq!(open(&storage).plan().len(), 1);
}

#[test]
fn test_shopping_list_from_reloaded_plan() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("meal_plan.json"));

    let mut store = open(&storage);
    store.add(recipe(1, &["2 eggs", "1 cup flour"])).unwrap();
    store.add(recipe(2, &["1 cup flour", "1 tsp salt"])).unwrap();

    let list = ShoppingList::build(open(&storage).plan());
    assert_eq!(list.into_vec(), vec!["2 eggs", "1 cup flour", "1 tsp salt"]);
}
