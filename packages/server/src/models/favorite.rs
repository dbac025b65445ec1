use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::recipe::RecipeSummary;

/// Request body for saving a favorite. Exactly one of the two ids must be given.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddFavoriteRequest {
    /// ID of a stored recipe.
    #[schema(example = 12)]
    pub recipe_id: Option<i32>,
    /// ID of an external recipe; it is imported first if not stored yet.
    #[schema(example = 716429)]
    pub external_id: Option<i64>,
}

/// Which recipe a favorite request points at.
#[derive(Debug, PartialEq, Eq)]
pub enum FavoriteTarget {
    Stored(i32),
    External(i64),
}

pub fn favorite_target(payload: &AddFavoriteRequest) -> Result<FavoriteTarget, AppError> {
    match (payload.recipe_id, payload.external_id) {
        (Some(id), None) => Ok(FavoriteTarget::Stored(id)),
        (None, Some(id)) => Ok(FavoriteTarget::External(id)),
        _ => Err(AppError::Validation(
            "Exactly one of recipe_id and external_id is required".into(),
        )),
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FavoriteResponse {
    pub recipe: RecipeSummary,
    pub saved_at: DateTime<Utc>,
}
