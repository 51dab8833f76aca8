use crate::db::{models::Tag, DbPool};
use crate::error::Result;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;

/// Look up a tag by its normalized name, creating it on first use
pub async fn get_or_create_tag(conn: &mut SqliteConnection, name: &str) -> Result<Tag> {
    let normalized = name.trim().to_lowercase();

    sqlx::query("INSERT INTO tags (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(&normalized)
        .execute(&mut *conn)
        .await?;

    let tag = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = ?")
        .bind(&normalized)
        .fetch_one(&mut *conn)
        .await?;

    Ok(tag)
}

/// Replace the tag set of a recipe
pub async fn set_recipe_tags(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    tag_names: &[String],
) -> Result<()> {
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    for name in tag_names {
        let tag = get_or_create_tag(conn, name).await?;
        sqlx::query("INSERT OR IGNORE INTO recipe_tags (recipe_id, tag_id) VALUES (?, ?)")
            .bind(recipe_id)
            .bind(tag.id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Tag names of several recipes, keyed by recipe id and sorted by name.
/// Every requested id gets an entry, possibly empty.
pub async fn get_tags_for_recipes(
    pool: &DbPool,
    recipe_ids: &[i64],
) -> Result<HashMap<i64, Vec<String>>> {
    let mut map: HashMap<i64, Vec<String>> =
        recipe_ids.iter().map(|&id| (id, Vec::new())).collect();
    if recipe_ids.is_empty() {
        return Ok(map);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT rt.recipe_id, t.name FROM recipe_tags rt \
         JOIN tags t ON t.id = rt.tag_id WHERE rt.recipe_id IN (",
    );
    let mut ids = builder.separated(", ");
    for id in recipe_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ORDER BY rt.recipe_id, t.name");

    let rows: Vec<(i64, String)> = builder.build_query_as().fetch_all(pool).await?;
    for (recipe_id, name) in rows {
        map.entry(recipe_id).or_default().push(name);
    }

    Ok(map)
}

/// Remove tags no recipe refers to. Returns how many were deleted.
pub async fn delete_unused_tags(pool: &DbPool) -> Result<u64> {
    let deleted = sqlx::query(
        "DELETE FROM tags WHERE NOT EXISTS (SELECT 1 FROM recipe_tags rt WHERE rt.tag_id = tags.id)",
    )
    .execute(pool)
    .await?
    .rows_affected();

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_pool, run_migrations};

    #[tokio::test]
    async fn test_get_or_create_tag_normalizes() {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let first = get_or_create_tag(&mut conn, "  Dessert ").await.unwrap();
        let second = get_or_create_tag(&mut conn, "dessert").await.unwrap();

        assert_eq!(first.name, "dessert");
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_batch_lookup_includes_untagged_ids() {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let map = get_tags_for_recipes(&pool, &[41, 42]).await.unwrap();
        assert_eq!(map.len(), 2);
        assert!(map[&41].is_empty());
    }

    #[tokio::test]
    async fn test_unused_tags_are_removed() {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        get_or_create_tag(&mut conn, "orphan").await.unwrap();
        drop(conn);

        assert_eq!(delete_unused_tags(&pool).await.unwrap(), 1);
        assert_eq!(delete_unused_tags(&pool).await.unwrap(), 0);
    }
}
