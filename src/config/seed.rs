use crate::api::models::RecipeInput;
use crate::db::{self, DbPool};
use crate::error::{Error, Result};
use crate::utils::validation::validate_recipe;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    pub version: u32,
    #[serde(default)]
    pub recipes: Vec<SeedRecipe>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecipe {
    pub author: String,
    /// Backdates the recipe. Defaults to the time of seeding.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub recipe: RecipeInput,
}

impl SeedFile {
    /// Load sample recipes from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read seed file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let seed: SeedFile = serde_yaml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse seed file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        if seed.version != 1 {
            return Err(Error::Config(format!(
                "Unsupported seed file version: {}",
                seed.version
            )));
        }

        Ok(seed)
    }
}

/// Report of a seeding run
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: bool,
    pub errors: Vec<String>,
}

impl SeedReport {
    pub fn log_summary(&self) {
        if self.skipped {
            info!("Seeding skipped: recipes already present");
            return;
        }

        info!(
            "Seeding completed: {} inserted, {} errors",
            self.inserted,
            self.errors.len()
        );
        for error in &self.errors {
            warn!("  - {}", error);
        }
    }
}

/// Insert every seed recipe, unless the database already holds recipes
pub async fn seed_from_config(pool: &DbPool, seed: &SeedFile) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if db::recipes::count_all_recipes(pool).await? > 0 {
        report.skipped = true;
        report.log_summary();
        return Ok(report);
    }

    for entry in &seed.recipes {
        let outcome = match validate_recipe(&entry.recipe) {
            Ok(draft) => {
                let created_at = entry.created_at.unwrap_or_else(Utc::now);
                db::recipes::insert_recipe(pool, &entry.author, &draft, created_at).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(_) => report.inserted += 1,
            Err(e) => report
                .errors
                .push(format!("Failed to seed '{}': {}", entry.recipe.title, e)),
        }
    }

    report.log_summary();
    Ok(report)
}

/// Load a seed file and apply it
pub async fn seed_from_file<P: AsRef<Path>>(pool: &DbPool, path: P) -> Result<SeedReport> {
    let seed = SeedFile::from_file(path)?;
    seed_from_config(pool, &seed).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_pool, run_migrations};
    use std::io::Write;

    const SEED: &str = r#"
version: 1
recipes:
  - author: chef
    createdAt: 2026-01-01T12:00:00Z
    title: Miso Soup
    ingredients:
      - { name: Miso paste, amount: "3", unit: tbsp }
      - { name: Tofu, amount: "200", unit: g }
    instructions: Dissolve miso in dashi.
    prepTime: 5
    cookTime: 10
    servings: 2
    cuisine: Japanese
    tags: [Soup]
  - author: chef
    title: Broken
    instructions: ""
    prepTime: 5
    cookTime: 10
    servings: 2
    cuisine: Japanese
"#;

    fn seed_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_seed_inserts_then_skips() {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let file = seed_file(SEED);

        let report = seed_from_file(&pool, file.path()).await.unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(!report.skipped);

        let recipe = db::recipes::get_recipe(&pool, 1).await.unwrap();
        assert_eq!(recipe.title, "Miso Soup");
        assert_eq!(recipe.author_id, "chef");
        assert_eq!(recipe.tags, vec!["soup".to_string()]);
        assert_eq!(recipe.created_at.to_rfc3339(), "2026-01-01T12:00:00+00:00");

        let again = seed_from_file(&pool, file.path()).await.unwrap();
        assert!(again.skipped);
        assert_eq!(db::recipes::count_all_recipes(&pool).await.unwrap(), 1);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let file = seed_file("version: 2\nrecipes: []\n");
        assert!(matches!(SeedFile::from_file(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_bundled_seed_file_parses() {
        let seed = SeedFile::from_file("config/seed.yaml").unwrap();
        assert_eq!(seed.recipes.len(), 5);
        for entry in &seed.recipes {
            validate_recipe(&entry.recipe).unwrap();
        }
    }
}
