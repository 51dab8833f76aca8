use crate::db::models::{Ingredient, Recipe};
use crate::query::{Pagination, ScoredRecipe};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_published() -> bool {
    true
}

/// Recipe fields submitted on create and update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub servings: i64,
    #[serde(default)]
    pub difficulty: Option<String>,
    pub cuisine: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_published")]
    pub is_published: bool,
}

/// Recipe as returned to API clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub id: i64,
    pub author_id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub total_time: i64,
    pub servings: i64,
    pub difficulty: String,
    pub cuisine: String,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub likes: Vec<String>,
    pub like_count: usize,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
}

impl From<Recipe> for RecipeView {
    fn from(recipe: Recipe) -> Self {
        let total_time = recipe.total_time();
        let like_count = recipe.like_count();
        Self {
            id: recipe.id,
            author_id: recipe.author_id,
            title: recipe.title,
            description: recipe.description,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            total_time,
            servings: recipe.servings,
            difficulty: recipe.difficulty.to_string(),
            cuisine: recipe.cuisine,
            tags: recipe.tags,
            image: recipe.image_url,
            likes: recipe.likes,
            like_count,
            views: recipe.views,
            is_published: recipe.is_published,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
            is_liked: None,
            is_saved: None,
        }
    }
}

/// GET /api/recipes response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponse {
    pub recipes: Vec<RecipeView>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionView {
    #[serde(flatten)]
    pub recipe: RecipeView,
    pub match_score: u32,
}

impl From<ScoredRecipe> for SuggestionView {
    fn from(scored: ScoredRecipe) -> Self {
        Self {
            recipe: scored.recipe.into(),
            match_score: scored.match_score,
        }
    }
}

/// POST /api/recipes/suggest response. `ingredients` echoes the terms used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<SuggestionView>,
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeMutationResponse {
    pub message: String,
    pub recipe: RecipeView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub message: String,
    pub likes: i64,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub message: String,
    pub is_saved: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: String,
}
