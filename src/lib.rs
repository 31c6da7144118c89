//! Recipe Planner
//!
//! Search an external recipe catalog, narrow and order the results by
//! nutrition and preparation time, keep a persistent meal plan, and derive a
//! de-duplicated shopping list from it.
//!
//! # Architecture
//!
//! - **Catalog**: async query seam with a reqwest-backed Spoonacular client
//! - **Pipeline**: pure filter and stable rank over normalized recipes
//! - **Meal plan**: the only persisted state, written through on every change
//! - **Surfaces**: Axum JSON API and a clap CLI over the same core
//!
//! # Modules
//!
//! - [`recipe`]: normalized recipe record and the absent-value policy
//! - [`catalog`]: catalog trait, search criteria and HTTP client
//! - [`filter`]: inclusive ceiling filters
//! - [`rank`]: stable ordering by calories or prep time
//! - [`search`]: empty-query rejection and the single-flight loading state
//! - [`meal_plan`]: meal plan store and durable slots
//! - [`shopping_list`]: ingredient list derived from a meal plan

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod meal_plan;
pub mod rank;
pub mod recipe;
pub mod search;
pub mod server;
pub mod shopping_list;

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use url::Url;

use catalog::{RecipeCatalog, SpoonacularClient};
use config::AppConfig;
use meal_plan::{FileStorage, MealPlanStore, PlanStorage};
use recipe::Recipe;
use search::SearchSession;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Catalog front with the loading gate.
    pub search: Arc<SearchSession>,
    /// Ranked results of the last search that returned anything.
    pub results: Arc<RwLock<Vec<Recipe>>>,
    /// Single writer for the meal plan.
    pub meal_plan: Arc<Mutex<MealPlanStore>>,
    /// Base for recipe detail-page links.
    pub site_url: Arc<Url>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn RecipeCatalog>,
        storage: Arc<dyn PlanStorage>,
        site_url: Url,
    ) -> Self {
        Self {
            search: Arc::new(SearchSession::new(catalog)),
            results: Arc::new(RwLock::new(Vec::new())),
            meal_plan: Arc::new(Mutex::new(MealPlanStore::load(storage))),
            site_url: Arc::new(site_url),
        }
    }

    /// Wire the Spoonacular client and the file-backed meal plan from `config`.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let catalog = SpoonacularClient::from_config(&config.catalog)?;
        let storage = FileStorage::new(&config.storage.meal_plan_path);
        let site_url = Url::parse(&config.catalog.site_url)?;
        Ok(Self::new(Arc::new(catalog), Arc::new(storage), site_url))
    }
}
