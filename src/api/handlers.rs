use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{debug, info};

use crate::api::identity::{ensure_author, optional_user, require_user};
use crate::{
    api::models::*,
    config::Settings,
    db,
    query::{Filter, ListingEngine, ListingParams, ListingQuery, SortOrder, SuggestionEngine},
    store::{RecipeStore, SqliteStore},
    utils::validation::validate_recipe,
    Error, Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub store: SqliteStore,
    pub settings: Settings,
}

impl AppState {
    pub fn new(pool: sqlx::SqlitePool, settings: Settings) -> Self {
        Self {
            store: SqliteStore::new(pool.clone()),
            pool,
            settings,
        }
    }
}

/// GET /api/recipes - Filtered, sorted, paginated listing
pub async fn list_recipes(
    State(state): State<AppState>,
    params: std::result::Result<Query<ListingParams>, QueryRejection>,
) -> Result<Json<ListingResponse>> {
    // repeated keys fail to deserialize; keep the JSON error body for them
    let Query(params) = params.map_err(|e| Error::InvalidParameter(e.body_text()))?;
    debug!("List request: {:?}", params);

    let query = ListingQuery::from_params(&params, &state.settings.pagination)?;
    let page = ListingEngine::new(&state.store).list(&query).await?;

    Ok(Json(ListingResponse {
        recipes: page.recipes.into_iter().map(RecipeView::from).collect(),
        pagination: page.pagination,
    }))
}

/// POST /api/recipes/suggest - Rank published recipes by ingredient overlap
pub async fn suggest_recipes(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>> {
    debug!("Suggest request: {:?}", request.ingredients);

    let ingredients = request.ingredients.ok_or(Error::EmptyIngredientList)?;
    let engine = SuggestionEngine::new(&state.store, &state.settings.suggestions);
    let suggestions = engine.suggest(&ingredients).await?;

    Ok(Json(SuggestResponse {
        suggestions: suggestions.into_iter().map(SuggestionView::from).collect(),
        ingredients,
    }))
}

/// GET /api/recipes/:id - Recipe details, counting the view
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<RecipeView>> {
    debug!("Get recipe request: {}", id);

    // 404 before touching the counter
    db::recipes::get_recipe_row(&state.pool, id).await?;
    db::recipes::increment_views(&state.pool, id).await?;

    let recipe = db::recipes::get_recipe(&state.pool, id).await?;
    let mut view = RecipeView::from(recipe);

    if let Some(user_id) = optional_user(&headers) {
        view.is_liked = Some(view.likes.contains(&user_id));
        view.is_saved = Some(db::saves::is_saved(&state.pool, &user_id, id).await?);
    }

    Ok(Json(view))
}

/// POST /api/recipes - Create a recipe owned by the caller
pub async fn create_recipe(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RecipeInput>,
) -> Result<(StatusCode, Json<RecipeMutationResponse>)> {
    let user_id = require_user(&headers)?;
    let draft = validate_recipe(&input)?;

    let recipe = db::recipes::create_recipe(&state.pool, &user_id, &draft).await?;
    info!("Recipe {} created by {}", recipe.id, user_id);

    Ok((
        StatusCode::CREATED,
        Json(RecipeMutationResponse {
            message: "Recipe created successfully".to_string(),
            recipe: recipe.into(),
        }),
    ))
}

/// PUT /api/recipes/:id - Replace a recipe (author only)
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<RecipeInput>,
) -> Result<Json<RecipeMutationResponse>> {
    let user_id = require_user(&headers)?;
    let existing = db::recipes::get_recipe_row(&state.pool, id).await?;
    ensure_author(&user_id, &existing.author_id)?;

    let draft = validate_recipe(&input)?;
    let recipe = db::recipes::update_recipe(&state.pool, id, &draft).await?;
    info!("Recipe {} updated by {}", id, user_id);

    Ok(Json(RecipeMutationResponse {
        message: "Recipe updated successfully".to_string(),
        recipe: recipe.into(),
    }))
}

/// DELETE /api/recipes/:id - Remove a recipe (author only)
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>> {
    let user_id = require_user(&headers)?;
    let existing = db::recipes::get_recipe_row(&state.pool, id).await?;
    ensure_author(&user_id, &existing.author_id)?;

    db::recipes::delete_recipe(&state.pool, id).await?;
    info!("Recipe {} deleted by {}", id, user_id);

    Ok(Json(MessageResponse {
        message: "Recipe deleted successfully".to_string(),
    }))
}

/// POST /api/recipes/:id/like - Toggle the caller's like
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<LikeResponse>> {
    let user_id = require_user(&headers)?;
    db::recipes::get_recipe_row(&state.pool, id).await?;

    let is_liked = db::likes::toggle_like(&state.pool, id, &user_id).await?;
    let likes = db::likes::count_likes(&state.pool, id).await?;

    Ok(Json(LikeResponse {
        message: if is_liked { "Recipe liked" } else { "Recipe unliked" }.to_string(),
        likes,
        is_liked,
    }))
}

/// GET /api/users/:id/recipes - An author's recipes, newest first
pub async fn list_user_recipes(
    State(state): State<AppState>,
    Path(author_id): Path<String>,
) -> Result<Json<Vec<RecipeView>>> {
    debug!("List recipes for author {}", author_id);

    let recipes = state
        .store
        .find(&Filter::Author(author_id), SortOrder::Latest, 0, usize::MAX)
        .await?;

    Ok(Json(recipes.into_iter().map(RecipeView::from).collect()))
}

/// GET /api/me/saved - The caller's saved recipes, most recently saved first
pub async fn list_saved(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<RecipeView>>> {
    let user_id = require_user(&headers)?;

    let rows = db::saves::list_saved_rows(&state.pool, &user_id).await?;
    let recipes = db::recipes::hydrate(&state.pool, rows).await?;

    Ok(Json(
        recipes
            .into_iter()
            .map(|recipe| {
                let mut view = RecipeView::from(recipe);
                view.is_saved = Some(true);
                view
            })
            .collect(),
    ))
}

/// POST /api/me/saved/:recipe_id - Toggle a recipe in the caller's saved set
pub async fn toggle_saved(
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<SaveResponse>> {
    let user_id = require_user(&headers)?;
    db::recipes::get_recipe_row(&state.pool, recipe_id).await?;

    let is_saved = db::saves::toggle_saved(&state.pool, &user_id, recipe_id).await?;

    Ok(Json(SaveResponse {
        message: if is_saved {
            "Recipe saved"
        } else {
            "Recipe removed from saved"
        }
        .to_string(),
        is_saved,
    }))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadinessResponse>> {
    let db_healthy = sqlx::query("SELECT 1").fetch_one(&state.pool).await.is_ok();

    Ok(Json(ReadinessResponse {
        ready: db_healthy,
        database: if db_healthy { "ok" } else { "error" }.to_string(),
    }))
}
