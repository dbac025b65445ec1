use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::review;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::recipe::RecipeSummary;
use crate::models::review::*;
use crate::state::AppState;
use crate::utils::recipe::{find_recipe, recipe_reference_error};
use crate::utils::user::{find_user, reviews_by};

#[utoipa::path(
    get,
    path = "/",
    tag = "Reviews",
    operation_id = "listUserReviews",
    summary = "List a user's reviews",
    description = "Returns the reviews written by the user, newest first, each with a summary of the reviewed recipe.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user's reviews", body = Vec<UserReviewResponse>),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn list_user_reviews(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<UserReviewResponse>>, AppError> {
    auth_user.require_self_or_admin(id)?;
    find_user(&state.db, id).await?;

    Ok(Json(reviews_by(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Reviews",
    operation_id = "createReview",
    summary = "Review a recipe",
    description = "Posts a review with a 1-5 rating on a stored recipe.",
    params(("id" = i32, Path, description = "User ID")),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = UserReviewResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User or recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, recipe_id = payload.recipe_id, rating = payload.rating))]
pub async fn create_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_self_or_admin(id)?;
    validate_create_review(&payload)?;

    find_user(&state.db, id).await?;
    let recipe = find_recipe(&state.db, payload.recipe_id).await?;

    let model = review::ActiveModel {
        text: Set(payload.text.trim().to_string()),
        rating: Set(payload.rating),
        user_id: Set(id),
        recipe_id: Set(recipe.id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(recipe_reference_error)?;

    Ok((
        StatusCode::CREATED,
        Json(UserReviewResponse {
            id: model.id,
            text: model.text,
            rating: model.rating,
            created_at: model.created_at,
            recipe: RecipeSummary::from(recipe),
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/{review_id}",
    tag = "Reviews",
    operation_id = "deleteReview",
    summary = "Delete a review",
    description = "Deletes one of the user's reviews. Returns 404 if the review does not exist or was written by someone else.",
    params(
        ("id" = i32, Path, description = "User ID"),
        ("review_id" = i32, Path, description = "Review ID"),
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, review_id))]
pub async fn delete_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((id, review_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_self_or_admin(id)?;

    let result = review::Entity::delete_many()
        .filter(review::Column::Id.eq(review_id))
        .filter(review::Column::UserId.eq(id))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Review not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}
