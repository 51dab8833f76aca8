//! Recipe listing and ingredient suggestion engines.

pub mod filter;
pub mod listing;
pub mod suggest;

pub use filter::{contains_ignore_case, Filter, SortOrder};
pub use listing::{ListingEngine, ListingPage, ListingParams, ListingQuery, Pagination};
pub use suggest::{ScoredRecipe, SuggestionEngine};
