use async_trait::async_trait;

use crate::error::RecipeApiError;
use crate::models::{RecipeDetail, RecipeSummary};

/// A catalogue of externally hosted recipes.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Full-text search. Returns lightweight summaries only.
    async fn search(&self, query: &str) -> Result<Vec<RecipeSummary>, RecipeApiError>;

    /// Fetch one recipe with instructions and ingredients.
    async fn recipe(&self, id: i64) -> Result<RecipeDetail, RecipeApiError>;

    /// Fetch `number` random recipes that have instructions.
    async fn random(&self, number: u32) -> Result<Vec<RecipeDetail>, RecipeApiError>;
}
