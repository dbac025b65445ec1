use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::entity::{ingredient, recipe};
use crate::error::AppError;

pub use super::shared::{Pagination, escape_like};
use super::shared::{double_option, validate_title};

/// Upper bound on ingredients per recipe.
pub const MAX_INGREDIENTS: usize = 100;

#[derive(Deserialize, Clone, PartialEq, utoipa::ToSchema)]
pub struct IngredientInput {
    #[schema(example = "rice noodles")]
    pub name: String,
    /// Free-text quantity; blank is stored as null.
    #[schema(example = "200 g")]
    pub amount: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateRecipeRequest {
    #[schema(example = "Pad Thai")]
    pub title: String,
    pub instructions: Option<String>,
    /// Image URL.
    pub image: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientInput>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateRecipeRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub instructions: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    /// Replaces the whole ingredient list when present.
    pub ingredients: Option<Vec<IngredientInput>>,
}

pub fn validate_ingredients(ingredients: &[IngredientInput]) -> Result<(), AppError> {
    if ingredients.len() > MAX_INGREDIENTS {
        return Err(AppError::Validation(format!(
            "A recipe may have at most {MAX_INGREDIENTS} ingredients"
        )));
    }
    for ing in ingredients {
        let name = ing.name.trim();
        if name.is_empty() || name.chars().count() > 256 {
            return Err(AppError::Validation(
                "Ingredient name must be 1-256 characters".into(),
            ));
        }
    }
    Ok(())
}

pub fn validate_create_recipe(payload: &CreateRecipeRequest) -> Result<(), AppError> {
    validate_title(&payload.title)?;
    validate_ingredients(&payload.ingredients)
}

pub fn validate_update_recipe(payload: &UpdateRecipeRequest) -> Result<(), AppError> {
    if let Some(ref title) = payload.title {
        validate_title(title)?;
    }
    if let Some(ref ingredients) = payload.ingredients {
        validate_ingredients(ingredients)?;
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct IngredientResponse {
    pub id: i32,
    #[schema(example = "rice noodles")]
    pub name: String,
    #[schema(example = "200 g")]
    pub amount: Option<String>,
}

impl From<ingredient::Model> for IngredientResponse {
    fn from(m: ingredient::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            amount: m.amount,
        }
    }
}

/// A stored recipe with its ingredients in order.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    /// Id in the external catalogue, for imported recipes.
    pub external_id: Option<i64>,
    pub title: String,
    pub instructions: Option<String>,
    pub image: Option<String>,
    /// Absent for imported recipes.
    pub creator_id: Option<i32>,
    pub ingredients: Vec<IngredientResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeResponse {
    pub fn new(recipe: recipe::Model, ingredients: Vec<ingredient::Model>) -> Self {
        Self {
            id: recipe.id,
            external_id: recipe.external_id,
            title: recipe.title,
            instructions: recipe.instructions,
            image: recipe.image,
            creator_id: recipe.creator_id,
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

/// Recipe without instructions or ingredients, used in lists.
#[derive(Serialize, Clone, FromQueryResult, utoipa::ToSchema)]
pub struct RecipeSummary {
    pub id: i32,
    pub external_id: Option<i64>,
    pub title: String,
    pub image: Option<String>,
    pub creator_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<recipe::Model> for RecipeSummary {
    fn from(m: recipe::Model) -> Self {
        Self {
            id: m.id,
            external_id: m.external_id,
            title: m.title,
            image: m.image,
            creator_id: m.creator_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListQuery {
    /// Page number (1-based). Default: 1.
    pub page: Option<u64>,
    /// Items per page (1-100). Default: 20.
    pub per_page: Option<u64>,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
    /// One of `created_at` (default) or `title`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default).
    pub sort_order: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RecipeListResponse {
    pub data: Vec<RecipeSummary>,
    pub pagination: Pagination,
}

/// Request body for importing random external recipes.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SeedRequest {
    /// Number of random recipes to request (1-100).
    #[schema(example = 10)]
    pub count: u32,
}

pub fn validate_seed_request(payload: &SeedRequest) -> Result<(), AppError> {
    if !(1..=100).contains(&payload.count) {
        return Err(AppError::Validation("Count must be 1-100".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SeedResponse {
    /// Number of recipes asked of the provider.
    pub requested: u32,
    /// Number of recipes the provider returned.
    pub fetched: usize,
    /// Number of recipes inserted.
    pub created: usize,
    /// Recipes dropped because they were already stored.
    pub skipped_existing: usize,
    /// Recipes dropped for lacking both instructions and summary.
    pub skipped_incomplete: usize,
    pub recipes: Vec<RecipeSummary>,
}
