use crate::db::DbPool;
use crate::error::Result;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use std::collections::HashMap;

/// Toggle a user's like on a recipe. Returns true when the recipe is now liked.
pub async fn toggle_like(pool: &DbPool, recipe_id: i64, user_id: &str) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM recipe_likes WHERE recipe_id = ? AND user_id = ?")
        .bind(recipe_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed == 0 {
        sqlx::query("INSERT INTO recipe_likes (recipe_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(recipe_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(removed == 0)
}

/// Count likes on a recipe
pub async fn count_likes(pool: &DbPool, recipe_id: i64) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipe_likes WHERE recipe_id = ?")
        .bind(recipe_id)
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Get the liking user ids of several recipes, keyed by recipe id
pub async fn get_likes_for_recipes(
    pool: &DbPool,
    recipe_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT recipe_id, user_id FROM recipe_likes WHERE recipe_id IN (");
    let mut ids = builder.separated(", ");
    for id in recipe_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ORDER BY recipe_id, created_at");

    let rows: Vec<(i64, String)> = builder.build_query_as().fetch_all(pool).await?;

    let mut map: HashMap<i64, Vec<String>> = HashMap::new();
    for (recipe_id, user_id) in rows {
        map.entry(recipe_id).or_default().push(user_id);
    }

    for &recipe_id in recipe_ids {
        map.entry(recipe_id).or_default();
    }

    Ok(map)
}
