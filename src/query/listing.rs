use crate::config::PaginationConfig;
use crate::db::models::{Difficulty, Recipe};
use crate::error::{Error, Result};
use crate::query::filter::{Filter, SortOrder};
use crate::store::RecipeStore;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// Deserialize optional string, treating empty strings as None
fn deserialize_optional_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Ok(Some(s.to_string())),
    }
}

/// Raw listing parameters as they arrive in the query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub cuisine: Option<String>,
    /// Comma-separated tag list
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub tags: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub max_time: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub sort: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub page: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub limit: Option<String>,
}

/// Validated listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub cuisine: Option<String>,
    pub tags: Vec<String>,
    pub difficulty: Option<Difficulty>,
    pub max_time: Option<i64>,
    pub sort: SortOrder,
    pub page: usize,
    pub limit: usize,
}

fn parse_positive(name: &str, value: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(Error::InvalidParameter(format!(
            "{name} must be a positive integer, got '{value}'"
        ))),
    }
}

fn parse_max_time(value: &str) -> Result<i64> {
    match value.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(Error::InvalidParameter(format!(
            "maxTime must be a non-negative integer, got '{value}'"
        ))),
    }
}

/// Split a comma-separated tag list into trimmed, lowercase, distinct entries
fn split_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(|t| t.trim().to_lowercase()) {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

impl ListingQuery {
    /// Validate raw parameters. Page size defaults to `default_limit` and is capped at `api_max_limit`.
    pub fn from_params(params: &ListingParams, pagination: &PaginationConfig) -> Result<Self> {
        let page = params
            .page
            .as_deref()
            .map(|v| parse_positive("page", v))
            .transpose()?
            .unwrap_or(1);

        let limit = params
            .limit
            .as_deref()
            .map(|v| parse_positive("limit", v))
            .transpose()?
            .unwrap_or(pagination.default_limit)
            .min(pagination.api_max_limit);

        let max_time = params.max_time.as_deref().map(parse_max_time).transpose()?;

        let difficulty = params
            .difficulty
            .as_deref()
            .map(str::parse::<Difficulty>)
            .transpose()?;

        let sort = params
            .sort
            .as_deref()
            .map(SortOrder::from_param)
            .unwrap_or_default();

        Ok(Self {
            search: params.search.clone(),
            cuisine: params.cuisine.clone(),
            tags: params.tags.as_deref().map(split_tags).unwrap_or_default(),
            difficulty,
            max_time,
            sort,
            page,
            limit,
        })
    }

    /// All provided conditions combined with AND
    pub fn filter(&self) -> Filter {
        let mut parts = Vec::new();

        if let Some(search) = &self.search {
            parts.push(Filter::text(search));
        }
        if let Some(cuisine) = &self.cuisine {
            parts.push(Filter::Cuisine(cuisine.clone()));
        }
        if !self.tags.is_empty() {
            parts.push(Filter::AnyTag(self.tags.clone()));
        }
        if let Some(difficulty) = self.difficulty {
            parts.push(Filter::Difficulty(difficulty));
        }
        if let Some(max_time) = self.max_time {
            parts.push(Filter::MaxTotalTime(max_time));
        }

        Filter::all_of(parts)
    }

    pub fn skip(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub pages: usize,
    pub total: usize,
    pub limit: usize,
}

impl Pagination {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        Self {
            page,
            pages: total.div_ceil(limit),
            total,
            limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListingPage {
    pub recipes: Vec<Recipe>,
    pub pagination: Pagination,
}

/// Filtered, sorted, paginated recipe listing over any [`RecipeStore`]
pub struct ListingEngine<'a, S: RecipeStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RecipeStore + ?Sized> ListingEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: &ListingQuery) -> Result<ListingPage> {
        let filter = query.filter();
        debug!("Listing recipes: {:?} sort={:?}", filter, query.sort);

        let total = self.store.count(&filter).await?;
        let recipes = self
            .store
            .find(&filter, query.sort, query.skip(), query.limit)
            .await?;

        Ok(ListingPage {
            recipes,
            pagination: Pagination::new(query.page, query.limit, total),
        })
    }
}
