use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use url::Url;

use crate::AppState;
use crate::catalog::SearchCriteria;
use crate::config::AppConfig;
use crate::filter::DisplayFilter;
use crate::meal_plan::{MealPlan, MealPlanStore};
use crate::rank::RankMetric;
use crate::recipe::Recipe;
use crate::search::{NO_RECIPES_FOUND, SearchError, refine};
use crate::shopping_list::ShoppingList;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;

    info!(
        name: "catalog.config.loaded",
        base_url = %config.catalog.base_url,
        meal_plan = %config.storage.meal_plan_path.display(),
        "Catalog configuration loaded"
    );

    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// API routes over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", post(api_search))
        .route("/api/recipes", get(api_recipes))
        .route("/api/meal-plan", get(api_get_meal_plan).post(api_add_to_meal_plan))
        .route("/api/meal-plan/{index}", delete(api_remove_from_meal_plan))
        .route("/api/shopping-list", get(api_shopping_list))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Sort and ceilings applied to the current result set.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub sort: RankMetric,
    #[serde(default)]
    pub max_calories: Option<f64>,
    #[serde(default)]
    pub max_time: Option<u32>,
}

impl ViewQuery {
    fn display_filter(&self) -> Result<DisplayFilter, (StatusCode, String)> {
        DisplayFilter::new(self.max_calories, self.max_time)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
    }
}

/// Request body for the search API.
#[derive(Debug, Deserialize)]
struct SearchRequest {
    #[serde(flatten)]
    criteria: SearchCriteria,
    #[serde(flatten)]
    view: ViewQuery,
}

/// A recipe with its display strings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCard {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub calories_label: String,
    pub prep_time_label: String,
    pub macros_label: String,
    pub detail_url: String,
}

impl RecipeCard {
    fn new(recipe: Recipe, site: &Url) -> Self {
        Self {
            calories_label: recipe.display_calories(),
            prep_time_label: recipe.display_prep_time(),
            macros_label: recipe.display_macros(),
            detail_url: recipe.detail_url(site).to_string(),
            recipe,
        }
    }
}

/// Displayed result set.
#[derive(Debug, Serialize)]
struct RecipesResponse {
    recipes: Vec<RecipeCard>,
    /// Shown when a search came back empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    /// Set when the catalog fetch failed rather than matched nothing.
    failed: bool,
}

#[derive(Debug, Serialize)]
struct MealPlanResponse {
    count: usize,
    recipes: Vec<RecipeCard>,
}

impl MealPlanResponse {
    fn new(plan: &MealPlan, site: &Url) -> Self {
        Self {
            count: plan.len(),
            recipes: plan
                .iter()
                .map(|recipe| RecipeCard::new(recipe.clone(), site))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ShoppingListResponse {
    items: ShoppingList,
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn current_view(
    state: &AppState,
    view: &ViewQuery,
) -> Result<Vec<RecipeCard>, (StatusCode, String)> {
    let display = view.display_filter()?;
    let results = state.results.read().await;
    Ok(refine(&results, &display, view.sort)
        .into_iter()
        .map(|recipe| RecipeCard::new(recipe, &state.site_url))
        .collect())
}

/// POST /api/search - Fetch from the catalog and replace the result set.
async fn api_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<RecipesResponse>, (StatusCode, String)> {
    req.view.display_filter()?;

    let (message, failed) = match state.search.submit(&req.criteria).await {
        Ok(recipes) if recipes.is_empty() => (Some(NO_RECIPES_FOUND), false),
        Ok(recipes) => {
            *state.results.write().await = crate::rank::rank(recipes, req.view.sort);
            (None, false)
        }
        Err(SearchError::Catalog(_)) => (Some(NO_RECIPES_FOUND), true),
        Err(e @ SearchError::EmptyQuery) => return Err((StatusCode::BAD_REQUEST, e.to_string())),
        Err(e @ SearchError::InFlight) => return Err((StatusCode::CONFLICT, e.to_string())),
    };

    Ok(Json(RecipesResponse {
        recipes: current_view(&state, &req.view).await?,
        message,
        failed,
    }))
}

/// GET /api/recipes - Re-derive the displayed view without refetching.
async fn api_recipes(
    State(state): State<AppState>,
    Query(view): Query<ViewQuery>,
) -> Result<Json<RecipesResponse>, (StatusCode, String)> {
    Ok(Json(RecipesResponse {
        recipes: current_view(&state, &view).await?,
        message: None,
        failed: false,
    }))
}

/// GET /api/meal-plan - List the meal plan.
async fn api_get_meal_plan(State(state): State<AppState>) -> Json<MealPlanResponse> {
    let store = state.meal_plan.lock().await;
    Json(MealPlanResponse::new(store.plan(), &state.site_url))
}

/// POST /api/meal-plan - Append a recipe.
async fn api_add_to_meal_plan(
    State(state): State<AppState>,
    Json(recipe): Json<Recipe>,
) -> Result<Json<MealPlanResponse>, (StatusCode, String)> {
    update_meal_plan(&state, move |store| store.add(recipe)).await
}

/// DELETE /api/meal-plan/:index - Remove the recipe at a position.
async fn api_remove_from_meal_plan(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<MealPlanResponse>, (StatusCode, String)> {
    update_meal_plan(&state, move |store| store.remove(index)).await
}

/// Run a meal plan mutation on the blocking pool; the write-through to
/// storage is synchronous. The store stays locked until it returns.
async fn update_meal_plan<F>(
    state: &AppState,
    mutate: F,
) -> Result<Json<MealPlanResponse>, (StatusCode, String)>
where
    F: FnOnce(&mut MealPlanStore) -> crate::error::Result<&MealPlan> + Send + 'static,
{
    let mut store = Arc::clone(&state.meal_plan).lock_owned().await;
    let site_url = Arc::clone(&state.site_url);

    tokio::task::spawn_blocking(move || {
        mutate(&mut *store).map(|plan| MealPlanResponse::new(plan, &site_url))
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
    .map(Json)
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// GET /api/shopping-list - Derive the shopping list from the meal plan.
async fn api_shopping_list(State(state): State<AppState>) -> Json<ShoppingListResponse> {
    let store = state.meal_plan.lock().await;
    Json(ShoppingListResponse {
        items: ShoppingList::build(store.plan()),
    })
}
