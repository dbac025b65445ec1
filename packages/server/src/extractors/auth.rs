use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Utc};
use sea_orm::EntityTrait;

use crate::entity::user;
use crate::error::AppError;
use crate::models::auth::UserResponse;
use crate::state::AppState;
use crate::utils::{jwt, session};

/// Authenticated user resolved from the `session` cookie
/// (or an `Authorization: Bearer <token>` header).
///
/// Add this as a handler parameter to require authentication. The user row is
/// reloaded on every request, so role changes and deletions apply immediately.
/// Role checks happen via `require_admin()` / `require_self_or_admin()` in the handler body.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl AuthUser {
    /// Public profile of the caller, as loaded for this request.
    pub fn profile(&self) -> UserResponse {
        UserResponse {
            id: self.user_id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
            created_at: self.created_at,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == user::ROLE_ADMIN
    }

    /// Returns `Ok(())` for admins, `Err(PermissionDenied)` otherwise.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }

    /// Returns `Ok(())` if the caller is `user_id` or an admin.
    pub fn require_self_or_admin(&self, user_id: i32) -> Result<(), AppError> {
        if self.user_id == user_id || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session::token_from_headers(&parts.headers).ok_or(AppError::SessionMissing)?;

        let claims = jwt::verify(&token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::SessionInvalid)?;

        let user = user::Entity::find_by_id(claims.uid)
            .one(&state.db)
            .await?
            .ok_or(AppError::SessionInvalid)?;

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        })
    }
}
