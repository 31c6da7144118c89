//! Spoonacular `complexSearch` client.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::{CatalogError, RecipeCatalog, SearchCriteria};
use crate::config::CatalogConfig;
use crate::recipe::{Recipe, RecipeId};

const SEARCH_PATH: &str = "recipes/complexSearch";

/// Catalog client for the Spoonacular recipe API.
///
/// Nutrition is always requested so ranking and filtering have calories to
/// work with.
#[derive(Clone)]
pub struct SpoonacularClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl std::fmt::Debug for SpoonacularClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpoonacularClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl SpoonacularClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Catalog root (e.g. "https://api.spoonacular.com")
    /// * `api_key` - Credential sent as the `apiKey` query parameter
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, CatalogError> {
        Self::with_client(base_url, api_key, reqwest::Client::new())
    }

    /// Create a new client with a custom reqwest client.
    pub fn with_client(
        base_url: &str,
        api_key: impl Into<String>,
        http: reqwest::Client,
    ) -> Result<Self, CatalogError> {
        let endpoint = Url::parse(&format!(
            "{}/{SEARCH_PATH}",
            base_url.trim_end_matches('/')
        ))?;
        Ok(Self {
            http,
            endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Self::new(&config.base_url, config.api_key.clone())
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn query_params<'a>(&'a self, criteria: &'a SearchCriteria) -> [(&'static str, &'a str); 5] {
        [
            ("apiKey", self.api_key.as_str()),
            ("query", criteria.query.as_str()),
            ("type", criteria.category.map_or("", |c| c.as_str())),
            ("cuisine", criteria.cuisine.map_or("", |c| c.as_str())),
            ("addRecipeNutrition", "true"),
        ]
    }
}

#[async_trait]
impl RecipeCatalog for SpoonacularClient {
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Recipe>, CatalogError> {
        debug!(
            name: "catalog.search.started",
            query = %criteria.query,
            category = ?criteria.category,
            cuisine = ?criteria.cuisine,
            "Searching catalog"
        );

        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&self.query_params(criteria))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = serde_json::from_slice(&response.bytes().await?)?;
        let recipes = normalize_response(body);

        debug!(
            name: "catalog.search.completed",
            results = recipes.len(),
            "Catalog search completed"
        );
        Ok(recipes)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire format
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecipe {
    id: RecipeId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient_minutes")]
    ready_in_minutes: Option<u32>,
    #[serde(default)]
    nutrition: Option<RawNutrition>,
    #[serde(default)]
    extended_ingredients: Option<Vec<RawIngredient>>,
}

#[derive(Debug, Deserialize)]
struct RawNutrition {
    #[serde(default)]
    nutrients: Option<Vec<RawNutrient>>,
}

#[derive(Debug, Deserialize)]
struct RawNutrient {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawIngredient {
    #[serde(default)]
    original: Option<String>,
}

/// Whole, non-negative minutes that fit a `u32`; anything else is absent.
fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|minutes| u32::try_from(minutes).ok()))
}

impl From<RawRecipe> for Recipe {
    fn from(raw: RawRecipe) -> Self {
        let nutrients = raw
            .nutrition
            .and_then(|n| n.nutrients)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|n| Some((n.name?, n.amount?)))
            .collect();
        let ingredients = raw
            .extended_ingredients
            .unwrap_or_default()
            .into_iter()
            .filter_map(|i| i.original)
            .collect();

        Self {
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            image_url: raw.image,
            ready_in_minutes: raw.ready_in_minutes,
            nutrients,
            ingredients,
        }
    }
}

/// Project a `complexSearch` body into recipes.
///
/// A missing or non-array `results` reads as zero matches. Entries that do not
/// look like recipes are skipped.
fn normalize_response(mut body: Value) -> Vec<Recipe> {
    let Some(Value::Array(results)) = body.get_mut("results").map(Value::take) else {
        debug!(name: "catalog.search.no_results_field", "Response has no results array");
        return Vec::new();
    };

    results
        .into_iter()
        .enumerate()
        .filter_map(|(position, raw)| match serde_json::from_value::<RawRecipe>(raw) {
            Ok(raw) => Some(Recipe::from(raw)),
            Err(e) => {
                warn!(
                    name: "catalog.search.skipped_entry",
                    position,
                    error = %e,
                    "Skipping malformed catalog entry"
                );
                None
            }
        })
        .collect()
}
