use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::review;
use crate::error::AppError;
use crate::models::recipe::RecipeSummary;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateReviewRequest {
    #[schema(example = 12)]
    pub recipe_id: i32,
    #[schema(example = "Great weeknight dinner.")]
    pub text: String,
    /// 1 to 5 stars.
    #[schema(example = 5)]
    pub rating: i32,
}

pub fn validate_create_review(payload: &CreateReviewRequest) -> Result<(), AppError> {
    let text = payload.text.trim();
    if text.is_empty() || text.chars().count() > 2000 {
        return Err(AppError::Validation(
            "Review text must be 1-2000 characters".into(),
        ));
    }
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::Validation("Rating must be 1-5".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ReviewResponse {
    pub id: i32,
    pub user_id: i32,
    pub recipe_id: i32,
    pub text: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

impl From<review::Model> for ReviewResponse {
    fn from(m: review::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            recipe_id: m.recipe_id,
            text: m.text,
            rating: m.rating,
            created_at: m.created_at,
        }
    }
}

/// A user's review together with the recipe it is about.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserReviewResponse {
    pub id: i32,
    pub text: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub recipe: RecipeSummary,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RecipeReviewsResponse {
    /// Mean rating, or null when the recipe has no reviews.
    #[schema(example = 4.5)]
    pub average_rating: Option<f64>,
    pub reviews: Vec<ReviewResponse>,
}

/// Arithmetic mean of the ratings, `None` for an empty slice.
pub fn average_rating(reviews: &[ReviewResponse]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    Some(sum as f64 / reviews.len() as f64)
}
