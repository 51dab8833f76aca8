//! Store-independent recipe filter expressions.
//!
//! A [`Filter`] is a small expression tree. The in-memory store evaluates it
//! directly with [`Filter::matches`]. The SQLite store translates the same tree
//! into a parameterized WHERE clause.

use crate::db::models::{Difficulty, Recipe};
use serde::{Deserialize, Serialize};

/// Full Unicode lowercase. The SQLite store keeps `*_folded` columns in this form.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Case-insensitive substring test used by every text condition
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Matches every recipe
    All,
    /// Term appears in any ingredient name
    IngredientName(String),
    /// Term appears in the title
    Title(String),
    /// Term appears in the description
    Description(String),
    Cuisine(String),
    Difficulty(Difficulty),
    /// Recipe carries at least one of the tags
    AnyTag(Vec<String>),
    /// `prep_time + cook_time <= minutes`
    MaxTotalTime(i64),
    Published(bool),
    Author(String),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    /// Term appears in the title, the description, or any ingredient name
    pub fn text(term: &str) -> Self {
        Filter::Or(vec![
            Filter::Title(term.to_string()),
            Filter::Description(term.to_string()),
            Filter::IngredientName(term.to_string()),
        ])
    }

    /// Combine conditions with AND, collapsing trivial cases
    pub fn all_of(mut parts: Vec<Filter>) -> Self {
        parts.retain(|p| *p != Filter::All);
        match parts.len() {
            0 => Filter::All,
            1 => parts.remove(0),
            _ => Filter::And(parts),
        }
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            Filter::All => true,
            Filter::IngredientName(term) => recipe
                .ingredients
                .iter()
                .any(|i| contains_ignore_case(&i.name, term)),
            Filter::Title(term) => contains_ignore_case(&recipe.title, term),
            Filter::Description(term) => contains_ignore_case(&recipe.description, term),
            Filter::Cuisine(cuisine) => recipe.cuisine == *cuisine,
            Filter::Difficulty(difficulty) => recipe.difficulty == *difficulty,
            Filter::AnyTag(tags) => recipe.tags.iter().any(|t| tags.contains(t)),
            Filter::MaxTotalTime(minutes) => recipe.total_time() <= *minutes,
            Filter::Published(published) => recipe.is_published == *published,
            Filter::Author(author) => recipe.author_id == *author,
            Filter::And(parts) => parts.iter().all(|p| p.matches(recipe)),
            Filter::Or(parts) => parts.iter().any(|p| p.matches(recipe)),
        }
    }
}

/// Result ordering understood by every store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first
    #[default]
    Latest,
    /// Most liked first, then newest
    Popular,
    /// Most viewed first, then newest
    Trending,
    /// Insertion order (oldest id first)
    Natural,
}

impl SortOrder {
    /// Parse a client-supplied sort key. Unknown keys fall back to `Latest`.
    pub fn from_param(value: &str) -> Self {
        match value {
            "popular" => SortOrder::Popular,
            "trending" => SortOrder::Trending,
            _ => SortOrder::Latest,
        }
    }
}
