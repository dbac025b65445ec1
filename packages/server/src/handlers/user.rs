use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::UserResponse;
use crate::models::recipe::RecipeSummary;
use crate::models::shared::{blank_to_none, page_offset, page_params};
use crate::models::user::*;
use crate::state::AppState;
use crate::utils::user::{
    delete_user_cascade, favorites_of, find_user, recipes_by, reviews_by,
};

#[utoipa::path(
    get,
    path = "/",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List users with pagination and search",
    description = "Returns a paginated list of users, oldest first. `search` matches email or name case-insensitively. Admin only.",
    params(UserListQuery),
    responses(
        (status = 200, description = "List of users", body = UserListResponse),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserListResponse>, AppError> {
    auth_user.require_admin()?;

    let (page, per_page) = page_params(query.page, query.per_page);

    let mut select = user::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            let pattern = format!("%{}%", term.to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(user::Column::Email)))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(user::Column::Name)))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            );
        }
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_asc(user::Column::Id)
        .select_only()
        .column(user::Column::Id)
        .column(user::Column::Email)
        .column(user::Column::Name)
        .column(user::Column::Role)
        .column(user::Column::CreatedAt)
        .offset(Some(page_offset(page, per_page)))
        .limit(Some(per_page))
        .into_model::<UserListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(UserListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    operation_id = "getUser",
    summary = "Get a user with their recipes, favorites and reviews",
    description = "Returns the user's profile with the recipes they created, their favorites and their reviews. Callers may read themselves; admins may read anyone.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserDetailResponse),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserDetailResponse>, AppError> {
    auth_user.require_self_or_admin(id)?;

    let user = find_user(&state.db, id).await?;
    let recipes = recipes_by(&state.db, id)
        .await?
        .into_iter()
        .map(RecipeSummary::from)
        .collect();
    let favorites = favorites_of(&state.db, id).await?;
    let reviews = reviews_by(&state.db, id).await?;

    Ok(Json(UserDetailResponse {
        user: user.into(),
        recipes,
        favorites,
        reviews,
    }))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Users",
    operation_id = "updateUser",
    summary = "Update a user",
    description = "Partially updates a user. `name: null` clears the name. Only admins may change `role`, and never their own.",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_self_or_admin(id)?;
    validate_update_user(&payload)?;

    if payload.role.is_some() {
        auth_user.require_admin()?;
        if auth_user.user_id == id {
            return Err(AppError::Validation("Admins cannot change their own role".into()));
        }
    }

    let existing = find_user(&state.db, id).await?;
    if payload == UpdateUserRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: user::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(blank_to_none(name));
    }
    if let Some(ref role) = payload.role {
        active.role = Set(parse_role(role)?.to_string());
    }

    let model = active.update(&state.db).await?;
    if payload.role.is_some() {
        info!(user_id = id, role = %model.role, "User role changed");
    }

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    operation_id = "deleteUser",
    summary = "Delete a user",
    description = "Permanently deletes a user together with their favorites, reviews and created recipes. Admin only; admins cannot delete themselves.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Cannot delete yourself (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    if auth_user.user_id == id {
        return Err(AppError::Validation("You cannot delete your own account".into()));
    }

    let txn = state.db.begin().await?;
    find_user(&txn, id).await?;
    delete_user_cascade(&txn, id).await?;
    txn.commit().await?;

    info!(user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
