use crate::db::{models::Ingredient, DbPool};
use crate::error::Result;
use crate::query::filter::fold_case;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;

/// Replace the ordered ingredient list of a recipe
pub async fn replace_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredients: &[Ingredient],
) -> Result<()> {
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    for (position, ingredient) in ingredients.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, position, name, name_folded, amount, unit)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(recipe_id)
        .bind(position as i64)
        .bind(&ingredient.name)
        .bind(fold_case(&ingredient.name))
        .bind(&ingredient.amount)
        .bind(&ingredient.unit)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Get the ingredients of several recipes, keyed by recipe id and kept in position order
pub async fn get_ingredients_for_recipes(
    pool: &DbPool,
    recipe_ids: &[i64],
) -> Result<HashMap<i64, Vec<Ingredient>>> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT recipe_id, name, amount, unit FROM recipe_ingredients WHERE recipe_id IN (",
    );
    let mut ids = builder.separated(", ");
    for id in recipe_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ORDER BY recipe_id, position");

    let rows: Vec<(i64, String, String, Option<String>)> =
        builder.build_query_as().fetch_all(pool).await?;

    let mut map: HashMap<i64, Vec<Ingredient>> = HashMap::new();
    for (recipe_id, name, amount, unit) in rows {
        map.entry(recipe_id)
            .or_default()
            .push(Ingredient { name, amount, unit });
    }

    for &recipe_id in recipe_ids {
        map.entry(recipe_id).or_default();
    }

    Ok(map)
}
