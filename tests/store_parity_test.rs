use chrono::{DateTime, Duration, TimeZone, Utc};
use cookshare::config::PaginationConfig;
use cookshare::db::models::{Difficulty, Ingredient, Recipe, RecipeDraft};
use cookshare::db::{self, likes, recipes, DbPool};
use cookshare::query::{ListingEngine, ListingPage, ListingParams, ListingQuery};
use cookshare::store::{MemoryStore, SqliteStore};

fn at_minute(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap() + Duration::minutes(minute)
}

#[allow(clippy::too_many_arguments)]
fn draft(
    title: &str,
    ingredients: &[&str],
    cuisine: &str,
    difficulty: Difficulty,
    prep_time: i64,
    cook_time: i64,
    tags: &[&str],
    is_published: bool,
) -> RecipeDraft {
    RecipeDraft {
        title: title.to_string(),
        description: format!("A {cuisine} dish"),
        ingredients: ingredients
            .iter()
            .map(|name| Ingredient::new(name, "1", None))
            .collect(),
        instructions: "Cook everything.".to_string(),
        prep_time,
        cook_time,
        servings: 2,
        difficulty,
        cuisine: cuisine.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        image_url: None,
        is_published,
    }
}

/// Same catalogue in SQLite and in memory
async fn setup() -> (DbPool, MemoryStore) {
    let pool = db::init_pool("sqlite::memory:").await.unwrap();
    db::run_migrations(&pool).await.unwrap();

    let drafts = vec![
        draft("Garlic Spaghetti", &["Spaghetti", "Garlic"], "Italian", Difficulty::Easy, 5, 15, &["pasta", "quick"], true),
        draft("Margherita Pizza", &["Flour", "Tomato", "Mozzarella"], "Italian", Difficulty::Medium, 30, 12, &["pizza", "vegetarian"], true),
        draft("Vegan Chili", &["Beans", "Tomato", "Chili powder"], "Mexican", Difficulty::Easy, 15, 45, &["vegan"], true),
        draft("Beef Wellington", &["Beef", "Puff pastry"], "British", Difficulty::Hard, 60, 40, &["festive"], true),
        draft("Tomato Salad", &["Tomato", "Basil"], "Italian", Difficulty::Easy, 10, 1, &["vegan", "quick"], false),
        draft("Chicken Tacos", &["Chicken breast", "Tortilla"], "Mexican", Difficulty::Medium, 20, 10, &["quick"], true),
        draft("Garlic Bread", &["Baguette", "Garlic", "Butter"], "Italian", Difficulty::Easy, 5, 10, &[], true),
    ];

    // Two recipes share a timestamp to exercise the id tie-break
    let minutes = [0, 10, 20, 30, 40, 40, 50];
    for (d, minute) in drafts.iter().zip(minutes) {
        recipes::insert_recipe(&pool, "chef", d, at_minute(minute))
            .await
            .unwrap();
    }

    for user in ["u1", "u2", "u3"] {
        likes::toggle_like(&pool, 2, user).await.unwrap();
    }
    likes::toggle_like(&pool, 6, "u1").await.unwrap();
    for _ in 0..5 {
        recipes::increment_views(&pool, 3).await.unwrap();
    }
    recipes::increment_views(&pool, 4).await.unwrap();

    let mut all: Vec<Recipe> = Vec::new();
    for id in 1..=7 {
        all.push(recipes::get_recipe(&pool, id).await.unwrap());
    }

    (pool, MemoryStore::new(all))
}

fn params(pairs: &[(&str, &str)]) -> ListingParams {
    let mut params = ListingParams::default();
    for (key, value) in pairs {
        let value = Some(value.to_string());
        match *key {
            "search" => params.search = value,
            "cuisine" => params.cuisine = value,
            "tags" => params.tags = value,
            "difficulty" => params.difficulty = value,
            "maxTime" => params.max_time = value,
            "sort" => params.sort = value,
            "page" => params.page = value,
            "limit" => params.limit = value,
            other => panic!("unknown parameter {other}"),
        }
    }
    params
}

fn ids(page: &ListingPage) -> Vec<i64> {
    page.recipes.iter().map(|r| r.id).collect()
}

async fn list_both(pool: &DbPool, memory: &MemoryStore, pairs: &[(&str, &str)]) -> ListingPage {
    let query = ListingQuery::from_params(&params(pairs), &PaginationConfig::default()).unwrap();
    let sqlite = SqliteStore::new(pool.clone());

    let from_sqlite = ListingEngine::new(&sqlite).list(&query).await.unwrap();
    let from_memory = ListingEngine::new(memory).list(&query).await.unwrap();

    assert_eq!(ids(&from_sqlite), ids(&from_memory), "order differs for {pairs:?}");
    assert_eq!(from_sqlite.pagination, from_memory.pagination, "pagination differs for {pairs:?}");
    from_sqlite
}

#[tokio::test]
async fn test_default_listing_is_latest_first() {
    let (pool, memory) = setup().await;
    let page = list_both(&pool, &memory, &[]).await;

    // 5 and 6 share a timestamp, higher id first
    assert_eq!(ids(&page), vec![7, 6, 5, 4, 3, 2, 1]);
    assert_eq!(page.pagination.total, 7);
    assert_eq!(page.pagination.pages, 1);
}

#[tokio::test]
async fn test_search_is_case_insensitive_across_fields() {
    let (pool, memory) = setup().await;

    let page = list_both(&pool, &memory, &[("search", "GARLIC")]).await;
    assert_eq!(ids(&page), vec![7, 1]);

    // description match
    let page = list_both(&pool, &memory, &[("search", "british dish")]).await;
    assert_eq!(ids(&page), vec![4]);

    // ingredient match
    let page = list_both(&pool, &memory, &[("search", "tortilla")]).await;
    assert_eq!(ids(&page), vec![6]);
}

#[tokio::test]
async fn test_search_terms_are_literal() {
    let (pool, memory) = setup().await;

    let page = list_both(&pool, &memory, &[("search", "%")]).await;
    assert!(page.recipes.is_empty());

    let page = list_both(&pool, &memory, &[("search", "_")]).await;
    assert!(page.recipes.is_empty());
}

#[tokio::test]
async fn test_tags_match_any_and_combine_with_other_filters() {
    let (pool, memory) = setup().await;

    let page = list_both(&pool, &memory, &[("tags", "Vegan, pizza")]).await;
    assert_eq!(ids(&page), vec![5, 3, 2]);

    let page = list_both(
        &pool,
        &memory,
        &[("tags", "quick"), ("cuisine", "Italian"), ("difficulty", "Easy")],
    )
    .await;
    assert_eq!(ids(&page), vec![5, 1]);
}

#[tokio::test]
async fn test_max_time_is_inclusive() {
    let (pool, memory) = setup().await;

    let page = list_both(&pool, &memory, &[("maxTime", "20")]).await;
    assert_eq!(ids(&page), vec![7, 5, 1]);

    let page = list_both(&pool, &memory, &[("maxTime", "0")]).await;
    assert!(page.recipes.is_empty());
}

#[tokio::test]
async fn test_popular_and_trending() {
    let (pool, memory) = setup().await;

    let page = list_both(&pool, &memory, &[("sort", "popular")]).await;
    assert_eq!(ids(&page)[..2], [2, 6]);

    let page = list_both(&pool, &memory, &[("sort", "trending")]).await;
    assert_eq!(ids(&page)[..2], [3, 4]);

    // unknown sort keys fall back to latest
    let page = list_both(&pool, &memory, &[("sort", "random")]).await;
    assert_eq!(ids(&page)[0], 7);
}

#[tokio::test]
async fn test_pagination_windows() {
    let (pool, memory) = setup().await;

    let first = list_both(&pool, &memory, &[("limit", "3")]).await;
    let second = list_both(&pool, &memory, &[("limit", "3"), ("page", "2")]).await;
    let third = list_both(&pool, &memory, &[("limit", "3"), ("page", "3")]).await;
    let beyond = list_both(&pool, &memory, &[("limit", "3"), ("page", "9")]).await;

    assert_eq!(ids(&first), vec![7, 6, 5]);
    assert_eq!(ids(&second), vec![4, 3, 2]);
    assert_eq!(ids(&third), vec![1]);
    assert!(beyond.recipes.is_empty());
    assert_eq!(beyond.pagination.pages, 3);
    assert_eq!(beyond.pagination.total, 7);
}

#[tokio::test]
async fn test_no_match_yields_empty_page() {
    let (pool, memory) = setup().await;

    let page = list_both(&pool, &memory, &[("cuisine", "Thai")]).await;
    assert!(page.recipes.is_empty());
    assert_eq!(page.pagination.total, 0);
    assert_eq!(page.pagination.pages, 0);
}

#[tokio::test]
async fn test_latest_first_page_is_stable_across_requests() {
    let (pool, memory) = setup().await;

    let first = list_both(&pool, &memory, &[("sort", "latest"), ("limit", "4")]).await;
    let again = list_both(&pool, &memory, &[("sort", "latest"), ("limit", "4")]).await;

    assert_eq!(ids(&first), ids(&again));
    assert_eq!(first.pagination, again.pagination);
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let pool = db::init_pool("sqlite::memory:").await.unwrap();
    db::run_migrations(&pool).await.unwrap();

    let brulee = draft("Crème Brûlée", &["Crème fraîche", "Sugar"], "French", Difficulty::Medium, 20, 40, &["dessert"], true);
    let buns = draft("Choux Buns", &["Choux pastry"], "French", Difficulty::Hard, 30, 25, &["dessert"], true);
    recipes::insert_recipe(&pool, "chef", &brulee, at_minute(0)).await.unwrap();
    recipes::insert_recipe(&pool, "chef", &buns, at_minute(10)).await.unwrap();

    // folded columns follow updates too
    let mut renamed = buns.clone();
    renamed.title = "Éclairs Glacés".to_string();
    recipes::update_recipe(&pool, 2, &renamed).await.unwrap();

    let all = vec![
        recipes::get_recipe(&pool, 1).await.unwrap(),
        recipes::get_recipe(&pool, 2).await.unwrap(),
    ];
    let memory = MemoryStore::new(all);

    let page = list_both(&pool, &memory, &[("search", "CRÈME")]).await;
    assert_eq!(ids(&page), vec![1]);

    let page = list_both(&pool, &memory, &[("search", "FRAÎCHE")]).await;
    assert_eq!(ids(&page), vec![1]);

    let page = list_both(&pool, &memory, &[("search", "éclairs glacés")]).await;
    assert_eq!(ids(&page), vec![2]);

    let page = list_both(&pool, &memory, &[("search", "choux buns")]).await;
    assert!(page.recipes.is_empty());
}
