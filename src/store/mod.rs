//! Recipe storage backends behind a common read contract.

pub mod memory;
pub mod sqlite;

use crate::db::models::Recipe;
use crate::error::Result;
use crate::query::filter::{Filter, SortOrder};
use async_trait::async_trait;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Read path the listing and suggestion engines depend on
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Recipes matching `filter`, ordered by `sort`, after skipping `skip` and taking at most `limit`
    async fn find(
        &self,
        filter: &Filter,
        sort: SortOrder,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Recipe>>;

    /// Number of recipes matching `filter`
    async fn count(&self, filter: &Filter) -> Result<usize>;
}
