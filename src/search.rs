//! Search submission and the loading state.
//!
//! A [`SearchSession`] rejects empty queries before the catalog is touched and
//! admits one search at a time: while a fetch is outstanding, further
//! submissions fail with [`SearchError::InFlight`]. A started fetch always
//! runs to completion.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::warn;

use crate::catalog::{CatalogError, RecipeCatalog, SearchCriteria};
use crate::filter::{DisplayFilter, filter};
use crate::rank::{RankMetric, rank};
use crate::recipe::Recipe;

/// User-visible message for an empty result, whatever the cause.
pub const NO_RECIPES_FOUND: &str = "No recipes found. Try a different keyword.";

#[derive(Error, Debug)]
pub enum SearchError {
    /// The query was empty; no request was made.
    #[error("Search query must not be empty")]
    EmptyQuery,

    /// Another search is still loading.
    #[error("A search is already in progress")]
    InFlight,

    /// The catalog fetch failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Single-flight front for a [`RecipeCatalog`].
#[derive(Debug)]
pub struct SearchSession {
    catalog: Arc<dyn RecipeCatalog>,
    loading: AtomicBool,
}

impl SearchSession {
    pub fn new(catalog: Arc<dyn RecipeCatalog>) -> Self {
        Self {
            catalog,
            loading: AtomicBool::new(false),
        }
    }

    /// Whether a search is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Validate `criteria` and run it against the catalog.
    pub async fn submit(&self, criteria: &SearchCriteria) -> Result<Vec<Recipe>, SearchError> {
        if criteria.query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let _loading = LoadingGuard::acquire(&self.loading).ok_or(SearchError::InFlight)?;

        match self.catalog.search(criteria).await {
            Ok(recipes) => Ok(recipes),
            Err(e) => {
                warn!(
                    name: "catalog.search.failed",
                    query = %criteria.query,
                    error = %e,
                    "Catalog search failed"
                );
                Err(e.into())
            }
        }
    }
}

/// Clears the loading flag when the search finishes, however it finishes.
#[derive(Debug)]
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Displayed view of a result set: filter, then rank.
#[must_use]
pub fn refine(recipes: &[Recipe], display: &DisplayFilter, metric: RankMetric) -> Vec<Recipe> {
    rank(filter(recipes, display), metric)
}
