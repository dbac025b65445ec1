use recipe_api::{ExtendedIngredient, RecipeDetail, RecipeSummary as ExternalSummary};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExternalSearchQuery {
    /// Free-text search, e.g. `pizza`.
    pub query: Option<String>,
}

/// Validate and trim the search query.
pub fn search_term(query: &ExternalSearchQuery) -> Result<&str, AppError> {
    let term = query.query.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() || term.chars().count() > 200 {
        return Err(AppError::Validation(
            "Query must be 1-200 characters".into(),
        ));
    }
    Ok(term)
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExternalRandomQuery {
    /// Number of recipes (1-100). Default: 10.
    pub number: Option<u32>,
}

pub fn random_count(query: &ExternalRandomQuery) -> Result<u32, AppError> {
    let number = query.number.unwrap_or(10);
    if !(1..=100).contains(&number) {
        return Err(AppError::Validation("Number must be 1-100".into()));
    }
    Ok(number)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ExternalRecipeSummary {
    #[schema(example = 716429)]
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
}

impl From<ExternalSummary> for ExternalRecipeSummary {
    fn from(s: ExternalSummary) -> Self {
        Self {
            id: s.id,
            title: s.title,
            image: s.image,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ExternalIngredientResponse {
    pub name: String,
    /// Formatted quantity, e.g. `2 cups`.
    pub amount: String,
}

impl From<ExtendedIngredient> for ExternalIngredientResponse {
    fn from(i: ExtendedIngredient) -> Self {
        Self {
            amount: i.amount_text(),
            name: i.name,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ExternalRecipeResponse {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub instructions: Option<String>,
    pub summary: Option<String>,
    pub servings: Option<u32>,
    pub ready_in_minutes: Option<u32>,
    pub source_url: Option<String>,
    pub ingredients: Vec<ExternalIngredientResponse>,
}

impl From<RecipeDetail> for ExternalRecipeResponse {
    fn from(d: RecipeDetail) -> Self {
        Self {
            id: d.id,
            title: d.title,
            image: d.image,
            instructions: d.instructions,
            summary: d.summary,
            servings: d.servings,
            ready_in_minutes: d.ready_in_minutes,
            source_url: d.source_url,
            ingredients: d.extended_ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ExternalSearchResponse {
    pub recipes: Vec<ExternalRecipeSummary>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ExternalRandomResponse {
    pub recipes: Vec<ExternalRecipeResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ExternalRecipeEnvelope {
    pub recipe: ExternalRecipeResponse,
}
