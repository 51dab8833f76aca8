use crate::api::models::{ListingResponse, SuggestResponse};
use crate::{Error, Result};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

/// Listing filters forwarded to `GET /api/recipes`
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub query: Option<String>,
    pub cuisine: Option<String>,
    pub tags: Option<String>,
    pub difficulty: Option<String>,
    pub max_time: Option<i64>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl SearchOptions {
    fn query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();

        if let Some(query) = &self.query {
            pairs.push(("search", query.clone()));
        }
        if let Some(cuisine) = &self.cuisine {
            pairs.push(("cuisine", cuisine.clone()));
        }
        if let Some(tags) = &self.tags {
            pairs.push(("tags", tags.clone()));
        }
        if let Some(difficulty) = &self.difficulty {
            pairs.push(("difficulty", difficulty.clone()));
        }
        if let Some(max_time) = self.max_time {
            pairs.push(("maxTime", max_time.to_string()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }

        pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Turn a non-success response into the matching error kind
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };

    Err(match status {
        StatusCode::BAD_REQUEST if message == Error::EmptyIngredientList.to_string() => {
            Error::EmptyIngredientList
        }
        StatusCode::BAD_REQUEST => Error::InvalidParameter(message),
        StatusCode::UNAUTHORIZED => Error::Unauthorized,
        StatusCode::FORBIDDEN => Error::Forbidden(message),
        StatusCode::NOT_FOUND => Error::NotFound(message),
        _ => Error::Internal(format!("Server returned {status}: {message}")),
    })
}

/// Fetch one listing page from a running server
pub async fn fetch_listing(
    client: &Client,
    server_url: &str,
    options: &SearchOptions,
) -> Result<ListingResponse> {
    let query = options.query_string();
    let url = if query.is_empty() {
        format!("{server_url}/api/recipes")
    } else {
        format!("{server_url}/api/recipes?{query}")
    };

    let response = check_response(client.get(&url).send().await?).await?;
    Ok(response.json().await?)
}

/// Ask a running server for ingredient-based suggestions
pub async fn fetch_suggestions(
    client: &Client,
    server_url: &str,
    ingredients: &[String],
) -> Result<SuggestResponse> {
    let url = format!("{server_url}/api/recipes/suggest");
    let response = client
        .post(&url)
        .json(&json!({ "ingredients": ingredients }))
        .send()
        .await?;

    let response = check_response(response).await?;
    Ok(response.json().await?)
}

/// Search for recipes
pub async fn search(server_url: &str, options: &SearchOptions) -> Result<()> {
    let client = Client::new();
    let listing = fetch_listing(&client, server_url, options).await?;
    print_listing(&listing);
    Ok(())
}

/// Suggest recipes for a set of ingredients
pub async fn suggest(server_url: &str, ingredients: &[String]) -> Result<()> {
    let client = Client::new();
    let response = fetch_suggestions(&client, server_url, ingredients).await?;
    print_suggestions(&response);
    Ok(())
}

fn print_listing(listing: &ListingResponse) {
    if listing.recipes.is_empty() {
        println!("No recipes found");
        return;
    }

    println!("\nFound {} recipes:\n", listing.pagination.total);
    println!(
        "{:<5} {:<40} {:<12} {:<8} {:<20}",
        "ID", "Title", "Cuisine", "Time", "Tags"
    );
    println!("{}", "-".repeat(89));

    for recipe in &listing.recipes {
        println!(
            "{:<5} {:<40} {:<12} {:<8} {:<20}",
            recipe.id,
            truncate(&recipe.title, 38),
            truncate(&recipe.cuisine, 10),
            format!("{}m", recipe.total_time),
            truncate(&recipe.tags.join(", "), 18)
        );
    }

    println!(
        "\nPage {} of {}",
        listing.pagination.page, listing.pagination.pages
    );
}

fn print_suggestions(response: &SuggestResponse) {
    if response.suggestions.is_empty() {
        println!("No recipes match {}", response.ingredients.join(", "));
        return;
    }

    println!("\nSuggestions for {}:\n", response.ingredients.join(", "));
    println!("{:<5} {:<6} {:<40}", "ID", "Score", "Title");
    println!("{}", "-".repeat(51));

    for suggestion in &response.suggestions {
        println!(
            "{:<5} {:<6} {:<40}",
            suggestion.recipe.id,
            suggestion.match_score,
            truncate(&suggestion.recipe.title, 38)
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const LISTING: &str = r#"{
        "recipes": [{
            "id": 7,
            "authorId": "alice",
            "title": "Garlic Bread",
            "description": "",
            "ingredients": [{"name": "Garlic", "amount": "2", "unit": "cloves"}],
            "instructions": "Bake.",
            "prepTime": 5,
            "cookTime": 10,
            "totalTime": 15,
            "servings": 4,
            "difficulty": "Easy",
            "cuisine": "Italian",
            "tags": ["bread"],
            "image": null,
            "likes": [],
            "likeCount": 0,
            "views": 3,
            "isPublished": true,
            "createdAt": "2026-01-01T12:00:00Z",
            "updatedAt": "2026-01-01T12:00:00Z"
        }],
        "pagination": {"page": 1, "pages": 1, "total": 1, "limit": 12}
    }"#;

    #[test]
    fn test_query_string_encoding() {
        let options = SearchOptions {
            query: Some("garlic bread".to_string()),
            tags: Some("vegan,quick".to_string()),
            max_time: Some(30),
            ..Default::default()
        };
        assert_eq!(
            options.query_string(),
            "search=garlic%20bread&tags=vegan%2Cquick&maxTime=30"
        );
        assert_eq!(SearchOptions::default().query_string(), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("crème brûlée tart", 8), "crème...");
    }

    #[tokio::test]
    async fn test_fetch_listing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/recipes")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("search".into(), "garlic".into()),
                Matcher::UrlEncoded("sort".into(), "popular".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(LISTING)
            .create_async()
            .await;

        let options = SearchOptions {
            query: Some("garlic".to_string()),
            sort: Some("popular".to_string()),
            ..Default::default()
        };
        let listing = fetch_listing(&Client::new(), &server.url(), &options)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(listing.recipes[0].id, 7);
        assert_eq!(listing.recipes[0].total_time, 15);
        assert_eq!(listing.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_server_error_body_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/recipes/suggest")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Please provide at least one ingredient"}"#)
            .create_async()
            .await;

        let result = fetch_suggestions(&Client::new(), &server.url(), &[]).await;
        assert!(matches!(result, Err(Error::EmptyIngredientList)));
    }

    #[tokio::test]
    async fn test_error_statuses_map_to_error_kinds() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/recipes")
            .match_query(Matcher::UrlEncoded("sort".into(), "latest".into()))
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "page must be a positive integer"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/recipes")
            .match_query(Matcher::UrlEncoded("sort".into(), "popular".into()))
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Authentication required"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/recipes")
            .match_query(Matcher::UrlEncoded("sort".into(), "trending".into()))
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Not the author of this recipe"}"#)
            .create_async()
            .await;

        let client = Client::new();
        let options = |sort: &str| SearchOptions {
            sort: Some(sort.to_string()),
            ..Default::default()
        };

        match fetch_listing(&client, &server.url(), &options("latest")).await {
            Err(Error::InvalidParameter(message)) => {
                assert_eq!(message, "page must be a positive integer")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            fetch_listing(&client, &server.url(), &options("popular")).await,
            Err(Error::Unauthorized)
        ));
        match fetch_listing(&client, &server.url(), &options("trending")).await {
            Err(Error::Forbidden(message)) => assert_eq!(message, "Not the author of this recipe"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_suggestions() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/recipes/suggest")
            .match_body(Matcher::Json(json!({"ingredients": ["egg"]})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"suggestions": [], "ingredients": ["egg"]}"#)
            .create_async()
            .await;

        let response = fetch_suggestions(&Client::new(), &server.url(), &["egg".to_string()])
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(response.suggestions.is_empty());
        assert_eq!(response.ingredients, vec!["egg".to_string()]);
    }
}
