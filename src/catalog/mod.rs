//! Recipe catalog queries.
//!
//! The catalog is an external HTTP service. [`RecipeCatalog::search`] returns
//! a tagged result: `Ok` with the (possibly empty) matches, or a
//! [`CatalogError`] describing why the fetch failed. Callers that only want
//! to show "no recipes found" can collapse both, but the distinction is kept
//! at this boundary.
//!
//! # Architecture
//!
//! - [`RecipeCatalog`]: the query seam, substituted by fakes in tests
//! - [`SpoonacularClient`]: reqwest-backed implementation
//! - [`SearchCriteria`], [`Category`], [`Cuisine`]: what a search asks for

mod spoonacular;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recipe::Recipe;

pub use spoonacular::SpoonacularClient;

/// Why a catalog fetch produced no usable response.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport failure (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Catalog error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The response body was not JSON.
    #[error("Malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured catalog URL is unusable.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Dish type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Category {
    #[serde(rename = "main course")]
    MainCourse,
    #[serde(rename = "dessert")]
    Dessert,
    #[serde(rename = "appetizer")]
    Appetizer,
    #[serde(rename = "salad")]
    Salad,
    #[serde(rename = "side dish")]
    SideDish,
}

impl Category {
    /// Value sent as the catalog's `type` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MainCourse => "main course",
            Self::Dessert => "dessert",
            Self::Appetizer => "appetizer",
            Self::Salad => "salad",
            Self::SideDish => "side dish",
        }
    }
}

/// Cuisine filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Cuisine {
    Italian,
    Mexican,
    Asian,
    Indian,
    French,
}

impl Cuisine {
    /// Value sent as the catalog's `cuisine` parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Italian => "Italian",
            Self::Mexican => "Mexican",
            Self::Asian => "Asian",
            Self::Indian => "Indian",
            Self::French => "French",
        }
    }
}

/// What to search for. Absent category or cuisine means "all".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub query: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub cuisine: Option<Cuisine>,
}

impl SearchCriteria {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: None,
            cuisine: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_cuisine(mut self, cuisine: Cuisine) -> Self {
        self.cuisine = Some(cuisine);
        self
    }
}

/// Full-text recipe search against an external catalog.
#[async_trait]
pub trait RecipeCatalog: Send + Sync + std::fmt::Debug {
    /// Run `criteria` against the catalog.
    ///
    /// The query is not re-validated here; callers reject empty queries.
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Recipe>, CatalogError>;
}
