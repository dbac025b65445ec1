use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{recipe, saved_recipe, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    LoginRequest, LoginResponse, MeResponse, MessageResponse, RegisterRequest, UserResponse,
    normalize_email, validate_login_request, validate_register_request,
};
use crate::models::recipe::RecipeSummary;
use crate::models::shared::blank_to_none;
use crate::state::AppState;
use crate::utils::{hash, jwt, session};

#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    operation_id = "registerUser",
    summary = "Register a new user",
    description = "Creates an account with the `USER` role. Emails are case-insensitive. Does not log the user in.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already exists (EMAIL_TAKEN)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_request(&payload)?;

    let email = normalize_email(&payload.email);

    let hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let new_user = user::ActiveModel {
        email: Set(email),
        password: Set(hash),
        name: Set(blank_to_none(payload.name)),
        role: Set(user::ROLE_USER.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let user = new_user.insert(&state.db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::EmailTaken,
        _ => AppError::from(e),
    })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "loginUser",
    summary = "Log in with email and password",
    description = "Verifies credentials and sets an HttpOnly `session` cookie. Unknown email and wrong password are indistinguishable.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; `session` cookie set", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, jar, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    validate_login_request(&payload)?;

    let email = normalize_email(&payload.email);

    let Some(user) = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
    else {
        hash::verify_dummy(&payload.password);
        return Err(AppError::InvalidCredentials);
    };

    let is_valid = hash::verify_password(&payload.password, &user.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let auth = &state.config.auth;
    let token = jwt::sign(
        user.id,
        &user.email,
        &auth.jwt_secret,
        chrono::Duration::hours(auth.session_ttl_hours),
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    let jar = jar.add(session::session_cookie(token, auth));

    Ok((
        jar,
        Json(LoginResponse {
            user: UserResponse::from(user),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Auth",
    operation_id = "logoutUser",
    summary = "Log out",
    description = "Clears the `session` cookie. Succeeds whether or not a session was present.",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
    ),
)]
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        session::clear_session(jar),
        Json(MessageResponse {
            message: "Logged out".into(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "getCurrentUser",
    summary = "Get current user info",
    description = "Returns the authenticated user's profile, the ids of their favorite recipes and summaries of the recipes they created.",
    responses(
        (status = 200, description = "Current user info", body = MeResponse),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, AppError> {
    let user_id = auth_user.user_id;

    let favorite_recipe_ids: Vec<i32> = saved_recipe::Entity::find()
        .filter(saved_recipe::Column::UserId.eq(user_id))
        .order_by_desc(saved_recipe::Column::CreatedAt)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|s| s.recipe_id)
        .collect();

    let recipes = recipe::Entity::find()
        .filter(recipe::Column::CreatorId.eq(user_id))
        .order_by_desc(recipe::Column::CreatedAt)
        .order_by_desc(recipe::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(RecipeSummary::from)
        .collect();

    Ok(Json(MeResponse {
        user: auth_user.profile(),
        favorite_recipe_ids,
        recipes,
    }))
}
