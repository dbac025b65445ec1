use axum::Json;
use axum::extract::{Path, Query, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::models::external::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/search",
    tag = "External Recipes",
    operation_id = "searchExternalRecipes",
    summary = "Search the recipe provider",
    description = "Forwards a free-text search to the external recipe provider. Results are not stored.",
    params(ExternalSearchQuery),
    responses(
        (status = 200, description = "Matching external recipes", body = ExternalSearchResponse),
        (status = 400, description = "Missing or overlong query (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Recipe provider failed (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<ExternalSearchQuery>,
) -> Result<Json<ExternalSearchResponse>, AppError> {
    let term = search_term(&query)?;

    let recipes = state.recipes.search(term).await?;

    Ok(Json(ExternalSearchResponse {
        recipes: recipes.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/random",
    tag = "External Recipes",
    operation_id = "randomExternalRecipes",
    summary = "Fetch random recipes from the provider",
    description = "Returns `number` (1-100, default 10) random recipes with instructions from the external provider. Results are not stored.",
    params(ExternalRandomQuery),
    responses(
        (status = 200, description = "Random external recipes", body = ExternalRandomResponse),
        (status = 400, description = "Number out of range (VALIDATION_ERROR)", body = ErrorBody),
        (status = 502, description = "Recipe provider failed (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn random(
    State(state): State<AppState>,
    Query(query): Query<ExternalRandomQuery>,
) -> Result<Json<ExternalRandomResponse>, AppError> {
    let number = random_count(&query)?;

    let recipes = state.recipes.random(number).await?;

    Ok(Json(ExternalRandomResponse {
        recipes: recipes.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "External Recipes",
    operation_id = "getExternalRecipe",
    summary = "Get an external recipe by its provider ID",
    params(("id" = i64, Path, description = "Provider recipe ID")),
    responses(
        (status = 200, description = "External recipe details", body = ExternalRecipeEnvelope),
        (status = 404, description = "Unknown to the provider (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Recipe provider failed (UPSTREAM_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ExternalRecipeEnvelope>, AppError> {
    let recipe = state.recipes.recipe(id).await?;

    Ok(Json(ExternalRecipeEnvelope {
        recipe: recipe.into(),
    }))
}
