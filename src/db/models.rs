use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            _ => Err(Error::InvalidParameter(format!(
                "Invalid difficulty: {s}. Must be Easy, Medium, or Hard"
            ))),
        }
    }
}

/// A row of the `recipes` table, without its owned collections
#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: i64,
    pub author_id: String,
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub servings: i64,
    pub difficulty: String,
    pub cuisine: String,
    pub image_url: Option<String>,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
    #[serde(default)]
    pub unit: Option<String>,
}

impl Ingredient {
    pub fn new(name: &str, amount: &str, unit: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            amount: amount.to_string(),
            unit: unit.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// A fully hydrated recipe snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub author_id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub servings: i64,
    pub difficulty: Difficulty,
    pub cuisine: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    /// User ids that liked this recipe
    pub likes: Vec<String>,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    pub fn from_row(
        row: RecipeRow,
        ingredients: Vec<Ingredient>,
        tags: Vec<String>,
        likes: Vec<String>,
    ) -> Result<Self> {
        let difficulty = row.difficulty.parse().map_err(|_| {
            Error::Internal(format!(
                "Recipe {} has unknown difficulty '{}'",
                row.id, row.difficulty
            ))
        })?;

        Ok(Self {
            id: row.id,
            author_id: row.author_id,
            title: row.title,
            description: row.description,
            ingredients,
            instructions: row.instructions,
            prep_time: row.prep_time,
            cook_time: row.cook_time,
            servings: row.servings,
            difficulty,
            cuisine: row.cuisine,
            tags,
            image_url: row.image_url,
            likes,
            views: row.views,
            is_published: row.is_published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    pub fn total_time(&self) -> i64 {
        self.prep_time + self.cook_time
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|u| u == user_id)
    }
}

/// Validated recipe content used for both inserts and full updates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub prep_time: i64,
    pub cook_time: i64,
    pub servings: i64,
    pub difficulty: Difficulty,
    pub cuisine: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub is_published: bool,
}
