use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::saved_recipe;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::favorite::*;
use crate::models::recipe::RecipeSummary;
use crate::state::AppState;
use crate::utils::import::find_or_import;
use crate::utils::recipe::{find_recipe, recipe_reference_error};
use crate::utils::user::{favorites_of, find_user};

#[utoipa::path(
    get,
    path = "/",
    tag = "Favorites",
    operation_id = "listFavorites",
    summary = "List a user's favorite recipes",
    description = "Returns the recipes the user saved, most recently saved first.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Saved recipes", body = Vec<FavoriteResponse>),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn list_favorites(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<FavoriteResponse>>, AppError> {
    auth_user.require_self_or_admin(id)?;
    find_user(&state.db, id).await?;

    Ok(Json(favorites_of(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Favorites",
    operation_id = "addFavorite",
    summary = "Save a recipe as favorite",
    description = "Saves a stored recipe (`recipe_id`) or an external one (`external_id`) for the user. External recipes are imported first if they are not stored yet. Exactly one of the two ids is required.",
    params(("id" = i32, Path, description = "User ID")),
    request_body = AddFavoriteRequest,
    responses(
        (status = 201, description = "Recipe saved", body = FavoriteResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User or recipe not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Recipe already saved (CONFLICT)", body = ErrorBody),
        (status = 502, description = "Recipe provider failed (UPSTREAM_ERROR)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn add_favorite(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<AddFavoriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_self_or_admin(id)?;
    let target = favorite_target(&payload)?;
    find_user(&state.db, id).await?;

    let recipe = match target {
        FavoriteTarget::Stored(recipe_id) => find_recipe(&state.db, recipe_id).await?,
        FavoriteTarget::External(external_id) => {
            find_or_import(&state.db, state.recipes.as_ref(), external_id).await?
        }
    };

    let saved = saved_recipe::ActiveModel {
        user_id: Set(id),
        recipe_id: Set(recipe.id),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(&state.db)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Recipe is already in favorites".into())
        }
        _ => recipe_reference_error(e),
    })?;

    Ok((
        StatusCode::CREATED,
        Json(FavoriteResponse {
            recipe: RecipeSummary::from(recipe),
            saved_at: saved.created_at,
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/{recipe_id}",
    tag = "Favorites",
    operation_id = "removeFavorite",
    summary = "Remove a recipe from favorites",
    description = "Removes a saved recipe from the user's favorites. The recipe itself is kept.",
    params(
        ("id" = i32, Path, description = "User ID"),
        ("recipe_id" = i32, Path, description = "Recipe ID"),
    ),
    responses(
        (status = 204, description = "Favorite removed"),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Recipe is not in favorites (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, recipe_id))]
pub async fn remove_favorite(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((id, recipe_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_self_or_admin(id)?;

    let result = saved_recipe::Entity::delete_by_id((id, recipe_id))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Recipe is not in favorites".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}
