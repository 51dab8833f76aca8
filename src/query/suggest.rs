use crate::config::SuggestionConfig;
use crate::db::models::Recipe;
use crate::error::{Error, Result};
use crate::query::filter::{contains_ignore_case, Filter, SortOrder};
use crate::store::RecipeStore;
use serde::Serialize;
use tracing::debug;

/// Points for a term found in an ingredient name
const INGREDIENT_MATCH_POINTS: u32 = 2;
/// Points for a term found in the title or description
const TEXT_MATCH_POINTS: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecipe {
    pub recipe: Recipe,
    pub match_score: u32,
}

/// Trim the raw terms and drop blanks. Fails when nothing usable is left.
pub fn normalize_terms(raw: &[String]) -> Result<Vec<String>> {
    let terms: Vec<String> = raw
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if terms.is_empty() {
        return Err(Error::EmptyIngredientList);
    }
    Ok(terms)
}

/// Published recipes where any term hits an ingredient name, the title, or the description
pub fn candidate_filter(terms: &[String]) -> Filter {
    Filter::And(vec![
        Filter::Published(true),
        Filter::Or(terms.iter().map(|t| Filter::text(t)).collect()),
    ])
}

pub fn score_recipe(recipe: &Recipe, terms: &[String]) -> u32 {
    terms
        .iter()
        .map(|term| {
            let mut score = 0;
            if recipe
                .ingredients
                .iter()
                .any(|i| contains_ignore_case(&i.name, term))
            {
                score += INGREDIENT_MATCH_POINTS;
            }
            if contains_ignore_case(&recipe.title, term)
                || contains_ignore_case(&recipe.description, term)
            {
                score += TEXT_MATCH_POINTS;
            }
            score
        })
        .sum()
}

/// Score and order candidates. Equal scores keep their candidate order.
pub fn rank(candidates: Vec<Recipe>, terms: &[String], max_results: usize) -> Vec<ScoredRecipe> {
    let mut scored: Vec<ScoredRecipe> = candidates
        .into_iter()
        .map(|recipe| {
            let match_score = score_recipe(&recipe, terms);
            ScoredRecipe {
                recipe,
                match_score,
            }
        })
        .collect();

    // Vec::sort_by is stable
    scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    scored.truncate(max_results);
    scored
}

/// Ingredient keyword-overlap suggestions over any [`RecipeStore`]
pub struct SuggestionEngine<'a, S: RecipeStore + ?Sized> {
    store: &'a S,
    recall_cap: usize,
    max_results: usize,
}

impl<'a, S: RecipeStore + ?Sized> SuggestionEngine<'a, S> {
    pub fn new(store: &'a S, config: &SuggestionConfig) -> Self {
        Self {
            store,
            recall_cap: config.recall_cap,
            max_results: config.max_results,
        }
    }

    pub async fn suggest(&self, ingredients: &[String]) -> Result<Vec<ScoredRecipe>> {
        let terms = normalize_terms(ingredients)?;

        let candidates = self
            .store
            .find(
                &candidate_filter(&terms),
                SortOrder::Natural,
                0,
                self.recall_cap,
            )
            .await?;

        debug!(
            "Suggestion candidates for {:?}: {} (cap {})",
            terms,
            candidates.len(),
            self.recall_cap
        );

        Ok(rank(candidates, &terms, self.max_results))
    }
}
