use crate::db::{self, models::RecipeRow, DbPool};
use crate::error::Result;
use crate::query::filter::{fold_case, Filter, SortOrder};
use crate::store::RecipeStore;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;

/// Recipe store backed by the SQLite schema in `migrations/`.
///
/// Filters are pushed down as SQL. Text conditions run against the `*_folded`
/// columns, which hold the same Unicode lowercase the in-memory matcher uses.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// `column` must be one of the `*_folded` columns
fn push_contains<'a>(builder: &mut QueryBuilder<'a, Sqlite>, column: &str, term: &str) {
    builder
        .push("instr(")
        .push(column)
        .push(", ")
        .push_bind(fold_case(term))
        .push(") > 0");
}

fn push_joined<'a>(builder: &mut QueryBuilder<'a, Sqlite>, parts: &[Filter], op: &str) {
    builder.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            builder.push(op);
        }
        push_filter(builder, part);
    }
    builder.push(")");
}

/// Append `filter` as a boolean SQL expression over the `recipes r` alias
fn push_filter<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &Filter) {
    match filter {
        Filter::All => {
            builder.push("1 = 1");
        }
        Filter::IngredientName(term) => {
            builder.push(
                "EXISTS (SELECT 1 FROM recipe_ingredients ri WHERE ri.recipe_id = r.id AND ",
            );
            push_contains(builder, "ri.name_folded", term);
            builder.push(")");
        }
        Filter::Title(term) => push_contains(builder, "r.title_folded", term),
        Filter::Description(term) => push_contains(builder, "r.description_folded", term),
        Filter::Cuisine(cuisine) => {
            builder.push("r.cuisine = ").push_bind(cuisine.clone());
        }
        Filter::Difficulty(difficulty) => {
            builder.push("r.difficulty = ").push_bind(difficulty.as_str());
        }
        Filter::AnyTag(tags) if tags.is_empty() => {
            builder.push("1 = 0");
        }
        Filter::AnyTag(tags) => {
            builder.push(
                "EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
                 WHERE rt.recipe_id = r.id AND t.name IN (",
            );
            let mut names = builder.separated(", ");
            for tag in tags {
                names.push_bind(tag.clone());
            }
            names.push_unseparated("))");
        }
        Filter::MaxTotalTime(minutes) => {
            builder
                .push("(r.prep_time + r.cook_time) <= ")
                .push_bind(*minutes);
        }
        Filter::Published(published) => {
            builder.push("r.is_published = ").push_bind(*published);
        }
        Filter::Author(author) => {
            builder.push("r.author_id = ").push_bind(author.clone());
        }
        Filter::And(parts) if parts.is_empty() => {
            builder.push("1 = 1");
        }
        Filter::And(parts) => push_joined(builder, parts, " AND "),
        Filter::Or(parts) if parts.is_empty() => {
            builder.push("1 = 0");
        }
        Filter::Or(parts) => push_joined(builder, parts, " OR "),
    }
}

fn order_clause(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::Latest => "r.created_at DESC, r.id DESC",
        SortOrder::Popular => {
            "(SELECT COUNT(*) FROM recipe_likes l WHERE l.recipe_id = r.id) DESC, \
             r.created_at DESC, r.id DESC"
        }
        SortOrder::Trending => "r.views DESC, r.created_at DESC, r.id DESC",
        SortOrder::Natural => "r.id ASC",
    }
}

#[async_trait]
impl RecipeStore for SqliteStore {
    async fn find(
        &self,
        filter: &Filter,
        sort: SortOrder,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<db::models::Recipe>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT r.* FROM recipes r WHERE ");
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY ")
            .push(order_clause(sort))
            .push(" LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(skip).unwrap_or(i64::MAX));

        debug!("Recipe query: {}", builder.sql());

        let rows: Vec<RecipeRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        db::recipes::hydrate(&self.pool, rows).await
    }

    async fn count(&self, filter: &Filter) -> Result<usize> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM recipes r WHERE ");
        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as usize)
    }
}
