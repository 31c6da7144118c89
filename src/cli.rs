//! Terminal subcommands over the planner core.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Args, Subcommand};
use url::Url;

use crate::catalog::{Category, Cuisine, SearchCriteria, SpoonacularClient};
use crate::config::AppConfig;
use crate::filter::DisplayFilter;
use crate::meal_plan::{FileStorage, MealPlan, MealPlanStore};
use crate::rank::RankMetric;
use crate::recipe::Recipe;
use crate::search::{NO_RECIPES_FOUND, SearchError, SearchSession, refine};
use crate::server;
use crate::shopping_list::ShoppingList;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server
    Serve,
    /// Search the catalog
    Search(SearchArgs),
    /// Show or edit the meal plan
    Plan {
        #[command(subcommand)]
        action: Option<PlanAction>,
    },
    /// Print the shopping list for the meal plan
    ShoppingList,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query
    pub query: String,

    #[arg(long, value_enum)]
    pub category: Option<Category>,

    #[arg(long, value_enum)]
    pub cuisine: Option<Cuisine>,

    #[arg(long, value_enum, default_value_t = RankMetric::Calories)]
    pub sort: RankMetric,

    /// Inclusive calorie ceiling
    #[arg(long)]
    pub max_calories: Option<f64>,

    /// Inclusive preparation time ceiling, in minutes
    #[arg(long)]
    pub max_time: Option<u32>,

    /// Add the listed result at this position to the meal plan
    #[arg(long)]
    pub add: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum PlanAction {
    /// List the meal plan
    List,
    /// Remove the recipe at a position
    Remove { index: usize },
}

/// Run `command`. No command means `serve`.
pub async fn dispatch(command: Option<Command>, config: Arc<AppConfig>) -> anyhow::Result<()> {
    match command.unwrap_or(Command::Serve) {
        Command::Serve => server::start_server(config).await,
        Command::Search(args) => cmd_search(args, &config).await,
        Command::Plan { action } => cmd_plan(action.unwrap_or(PlanAction::List), &config),
        Command::ShoppingList => {
            let store = open_store(&config);
            print!("{}", render_shopping_list(&ShoppingList::build(store.plan())));
            Ok(())
        }
    }
}

fn open_store(config: &AppConfig) -> MealPlanStore {
    MealPlanStore::load(Arc::new(FileStorage::new(&config.storage.meal_plan_path)))
}

fn site_url(config: &AppConfig) -> anyhow::Result<Url> {
    Url::parse(&config.catalog.site_url).context("invalid catalog.site_url")
}

async fn cmd_search(args: SearchArgs, config: &AppConfig) -> anyhow::Result<()> {
    let display = DisplayFilter::new(args.max_calories, args.max_time)?;
    let session = SearchSession::new(Arc::new(SpoonacularClient::from_config(&config.catalog)?));
    let criteria = SearchCriteria {
        query: args.query,
        category: args.category,
        cuisine: args.cuisine,
    };

    let results = match session.submit(&criteria).await {
        Ok(results) => results,
        // Logged by the session; shown like an empty match set.
        Err(SearchError::Catalog(_)) => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    let recipes = refine(&results, &display, args.sort);

    if recipes.is_empty() {
        println!("{NO_RECIPES_FOUND}");
        return Ok(());
    }
    print!("{}", render_recipes(&recipes, &site_url(config)?));

    if let Some(position) = args.add {
        let recipe = recipes
            .get(position)
            .cloned()
            .ok_or_else(|| anyhow!("no result at position {position}"))?;
        let title = recipe.title.clone();
        let mut store = open_store(config);
        let plan = store.add(recipe)?;
        println!("Added {title:?} to the meal plan ({} recipes)", plan.len());
    }
    Ok(())
}

fn cmd_plan(action: PlanAction, config: &AppConfig) -> anyhow::Result<()> {
    let mut store = open_store(config);
    let plan = match action {
        PlanAction::List => store.plan(),
        PlanAction::Remove { index } => store.remove(index)?,
    };
    print!("{}", render_plan(plan));
    Ok(())
}

pub fn render_recipes(recipes: &[Recipe], site: &Url) -> String {
    let mut out = String::new();
    for (i, recipe) in recipes.iter().enumerate() {
        let _ = writeln!(out, "[{i}] {}", recipe.title);
        let _ = writeln!(
            out,
            "    {} | {} | {}",
            recipe.display_calories(),
            recipe.display_prep_time(),
            recipe.display_macros()
        );
        let _ = writeln!(out, "    {}", recipe.detail_url(site));
    }
    out
}

pub fn render_plan(plan: &MealPlan) -> String {
    let mut out = format!("Meal plan ({} recipes)\n", plan.len());
    for (i, recipe) in plan.iter().enumerate() {
        let _ = writeln!(
            out,
            "[{i}] {} ({} | {})",
            recipe.title,
            recipe.display_prep_time(),
            recipe.display_calories()
        );
    }
    out
}

pub fn render_shopping_list(list: &ShoppingList) -> String {
    let mut out = String::new();
    for (i, item) in list.iter().enumerate() {
        let _ = writeln!(out, "[{i}] {item}");
    }
    out
}
