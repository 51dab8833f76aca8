use crate::db::{ingredients, likes, models::*, tags, DbPool};
use crate::error::{Error, Result};
use crate::query::filter::fold_case;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Create a new recipe owned by `author_id`
pub async fn create_recipe(pool: &DbPool, author_id: &str, draft: &RecipeDraft) -> Result<Recipe> {
    insert_recipe(pool, author_id, draft, Utc::now()).await
}

/// Insert a recipe with an explicit creation timestamp
pub async fn insert_recipe(
    pool: &DbPool,
    author_id: &str,
    draft: &RecipeDraft,
    created_at: DateTime<Utc>,
) -> Result<Recipe> {
    let mut tx = pool.begin().await?;

    let recipe_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO recipes (
            author_id, title, description, title_folded, description_folded, instructions,
            prep_time, cook_time, servings, difficulty, cuisine, image_url, is_published,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(author_id)
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(fold_case(&draft.title))
    .bind(fold_case(&draft.description))
    .bind(&draft.instructions)
    .bind(draft.prep_time)
    .bind(draft.cook_time)
    .bind(draft.servings)
    .bind(draft.difficulty.as_str())
    .bind(&draft.cuisine)
    .bind(&draft.image_url)
    .bind(draft.is_published)
    .bind(created_at)
    .bind(created_at)
    .fetch_one(&mut *tx)
    .await?;

    ingredients::replace_ingredients(&mut tx, recipe_id, &draft.ingredients).await?;
    tags::set_recipe_tags(&mut tx, recipe_id, &draft.tags).await?;

    tx.commit().await?;
    debug!("Created recipe {} for author {}", recipe_id, author_id);

    get_recipe(pool, recipe_id).await
}

/// Get the bare recipe row by ID
pub async fn get_recipe_row(pool: &DbPool, recipe_id: i64) -> Result<RecipeRow> {
    let row = sqlx::query_as::<_, RecipeRow>("SELECT * FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Recipe {recipe_id} not found")))?;

    Ok(row)
}

/// Get recipe by ID with ingredients, tags, and likes
pub async fn get_recipe(pool: &DbPool, recipe_id: i64) -> Result<Recipe> {
    let row = get_recipe_row(pool, recipe_id).await?;
    let mut recipes = hydrate(pool, vec![row]).await?;
    recipes
        .pop()
        .ok_or_else(|| Error::NotFound(format!("Recipe {recipe_id} not found")))
}

/// Most ids bound into a single `IN (...)` list, well under SQLite's variable limit
const HYDRATE_BATCH: usize = 500;

/// Attach owned collections to recipe rows, keeping the row order
pub async fn hydrate(pool: &DbPool, rows: Vec<RecipeRow>) -> Result<Vec<Recipe>> {
    hydrate_in_batches(pool, rows, HYDRATE_BATCH).await
}

async fn hydrate_in_batches(
    pool: &DbPool,
    rows: Vec<RecipeRow>,
    batch_size: usize,
) -> Result<Vec<Recipe>> {
    let mut recipes = Vec::with_capacity(rows.len());
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        let batch: Vec<RecipeRow> = rows.by_ref().take(batch_size.max(1)).collect();
        recipes.extend(hydrate_batch(pool, batch).await?);
    }
    Ok(recipes)
}

async fn hydrate_batch(pool: &DbPool, rows: Vec<RecipeRow>) -> Result<Vec<Recipe>> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();

    // Batch fetch collections for all recipes (avoid N+1 query problem)
    let mut ingredients_map = ingredients::get_ingredients_for_recipes(pool, &ids).await?;
    let mut tags_map = tags::get_tags_for_recipes(pool, &ids).await?;
    let mut likes_map = likes::get_likes_for_recipes(pool, &ids).await?;

    rows.into_iter()
        .map(|row| {
            let id = row.id;
            Recipe::from_row(
                row,
                ingredients_map.remove(&id).unwrap_or_default(),
                tags_map.remove(&id).unwrap_or_default(),
                likes_map.remove(&id).unwrap_or_default(),
            )
        })
        .collect()
}

/// Replace every editable field of a recipe
pub async fn update_recipe(pool: &DbPool, recipe_id: i64, draft: &RecipeDraft) -> Result<Recipe> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE recipes
        SET title = ?, description = ?, title_folded = ?, description_folded = ?,
            instructions = ?, prep_time = ?, cook_time = ?, servings = ?, difficulty = ?,
            cuisine = ?, image_url = ?, is_published = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(fold_case(&draft.title))
    .bind(fold_case(&draft.description))
    .bind(&draft.instructions)
    .bind(draft.prep_time)
    .bind(draft.cook_time)
    .bind(draft.servings)
    .bind(draft.difficulty.as_str())
    .bind(&draft.cuisine)
    .bind(&draft.image_url)
    .bind(draft.is_published)
    .bind(Utc::now())
    .bind(recipe_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(Error::NotFound(format!("Recipe {recipe_id} not found")));
    }

    ingredients::replace_ingredients(&mut tx, recipe_id, &draft.ingredients).await?;
    tags::set_recipe_tags(&mut tx, recipe_id, &draft.tags).await?;

    tx.commit().await?;

    get_recipe(pool, recipe_id).await
}

/// Increment the view counter of a recipe
pub async fn increment_views(pool: &DbPool, recipe_id: i64) -> Result<()> {
    sqlx::query("UPDATE recipes SET views = views + 1 WHERE id = ?")
        .bind(recipe_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Delete recipe. Ingredients, tag links, likes, and saves cascade.
pub async fn delete_recipe(pool: &DbPool, recipe_id: i64) -> Result<()> {
    let deleted = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(Error::NotFound(format!("Recipe {recipe_id} not found")));
    }

    let orphaned = tags::delete_unused_tags(pool).await?;
    debug!("Deleted recipe {} ({} orphaned tags removed)", recipe_id, orphaned);

    Ok(())
}

/// Count all recipes
pub async fn count_all_recipes(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}
