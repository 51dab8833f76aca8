use crate::db::{models::RecipeRow, DbPool};
use crate::error::Result;
use chrono::Utc;

/// Toggle a recipe in a user's saved set. Returns true when the recipe is now saved.
pub async fn toggle_saved(pool: &DbPool, user_id: &str, recipe_id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM recipe_saves WHERE user_id = ? AND recipe_id = ?")
        .bind(user_id)
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed == 0 {
        sqlx::query("INSERT INTO recipe_saves (user_id, recipe_id, saved_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(recipe_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(removed == 0)
}

/// Whether a user has saved a recipe
pub async fn is_saved(pool: &DbPool, user_id: &str, recipe_id: i64) -> Result<bool> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM recipe_saves WHERE user_id = ? AND recipe_id = ?")
            .bind(user_id)
            .bind(recipe_id)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

/// Rows of a user's saved recipes, most recently saved first
pub async fn list_saved_rows(pool: &DbPool, user_id: &str) -> Result<Vec<RecipeRow>> {
    let rows = sqlx::query_as::<_, RecipeRow>(
        r#"
        SELECT r.*
        FROM recipes r
        JOIN recipe_saves s ON s.recipe_id = r.id
        WHERE s.user_id = ?
        ORDER BY s.saved_at DESC, r.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
