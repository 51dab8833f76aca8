// Validation utilities
use crate::api::models::RecipeInput;
use crate::db::models::{Difficulty, Ingredient, RecipeDraft};
use crate::error::{Error, Result};
use crate::utils::sanitize::{non_blank, normalize_tags, sanitize_html};
use tracing::warn;
use url::Url;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

fn require_positive(field: &str, value: i64) -> Result<i64> {
    if value < 1 {
        return Err(Error::Validation(format!("{field} must be at least 1")));
    }
    Ok(value)
}

/// Validate an image reference: an inline `data:image/` URI or an http(s) URL
pub fn validate_image(image: &str) -> Result<String> {
    if image.starts_with("data:image/") {
        return Ok(image.to_string());
    }

    let url = Url::parse(image)?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        scheme => {
            warn!("Rejected image URL with scheme {}", scheme);
            Err(Error::Validation(format!(
                "Image URL must use http or https scheme: {image}"
            )))
        }
    }
}

/// Validate difficulty level, defaulting to Easy when absent
pub fn validate_difficulty(difficulty: Option<&str>) -> Result<Difficulty> {
    match difficulty.map(str::trim) {
        None | Some("") => Ok(Difficulty::default()),
        Some(value) => value.parse().map_err(|_| {
            Error::Validation(format!(
                "Invalid difficulty level: {value}. Must be Easy, Medium, or Hard"
            ))
        }),
    }
}

fn validate_ingredient(index: usize, ingredient: &Ingredient) -> Result<Ingredient> {
    let name = ingredient.name.trim();
    let amount = ingredient.amount.trim();

    if name.is_empty() {
        return Err(Error::Validation(format!(
            "Ingredient {} is missing a name",
            index + 1
        )));
    }
    if amount.is_empty() {
        return Err(Error::Validation(format!(
            "Ingredient '{name}' is missing an amount"
        )));
    }

    Ok(Ingredient {
        name: name.to_string(),
        amount: amount.to_string(),
        unit: non_blank(ingredient.unit.as_deref()),
    })
}

/// Check submitted recipe content and normalize it for storage
pub fn validate_recipe(input: &RecipeInput) -> Result<RecipeDraft> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(Error::Validation("Recipe title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(Error::Validation(format!(
            "Title cannot exceed {MAX_TITLE_CHARS} characters"
        )));
    }

    let description = input.description.trim();
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(Error::Validation(format!(
            "Description cannot exceed {MAX_DESCRIPTION_CHARS} characters"
        )));
    }

    let instructions = input.instructions.trim();
    if instructions.is_empty() {
        return Err(Error::Validation("Instructions are required".to_string()));
    }

    let cuisine = input.cuisine.trim();
    if cuisine.is_empty() {
        return Err(Error::Validation("Cuisine type is required".to_string()));
    }

    let ingredients = input
        .ingredients
        .iter()
        .enumerate()
        .map(|(i, ingredient)| validate_ingredient(i, ingredient))
        .collect::<Result<Vec<_>>>()?;

    let image_url = non_blank(input.image.as_deref())
        .map(|image| validate_image(&image))
        .transpose()?;

    Ok(RecipeDraft {
        title: title.to_string(),
        description: description.to_string(),
        ingredients,
        instructions: sanitize_html(instructions),
        prep_time: require_positive("Prep time", input.prep_time)?,
        cook_time: require_positive("Cook time", input.cook_time)?,
        servings: require_positive("Servings", input.servings)?,
        difficulty: validate_difficulty(input.difficulty.as_deref())?,
        cuisine: cuisine.to_string(),
        tags: normalize_tags(&input.tags),
        image_url,
        is_published: input.is_published,
    })
}
