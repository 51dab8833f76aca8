use crate::db::models::Recipe;
use crate::error::Result;
use crate::query::filter::{Filter, SortOrder};
use crate::store::RecipeStore;
use async_trait::async_trait;
use std::cmp::Ordering;
use tokio::sync::RwLock;

/// Recipe store over an in-memory vector, kept in insertion order
#[derive(Debug, Default)]
pub struct MemoryStore {
    recipes: RwLock<Vec<Recipe>>,
}

impl MemoryStore {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: RwLock::new(recipes),
        }
    }
}

/// Same ordering the SQLite store applies, with id as the final tie-break
fn compare(sort: SortOrder, a: &Recipe, b: &Recipe) -> Ordering {
    let newest_first = b
        .created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id));

    match sort {
        SortOrder::Latest => newest_first,
        SortOrder::Popular => b.like_count().cmp(&a.like_count()).then(newest_first),
        SortOrder::Trending => b.views.cmp(&a.views).then(newest_first),
        SortOrder::Natural => a.id.cmp(&b.id),
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn find(
        &self,
        filter: &Filter,
        sort: SortOrder,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Recipe>> {
        let recipes = self.recipes.read().await;

        let mut matched: Vec<&Recipe> = recipes.iter().filter(|r| filter.matches(r)).collect();
        if sort != SortOrder::Natural {
            matched.sort_by(|a, b| compare(sort, a, b));
        }

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &Filter) -> Result<usize> {
        let recipes = self.recipes.read().await;
        Ok(recipes.iter().filter(|r| filter.matches(r)).count())
    }
}
