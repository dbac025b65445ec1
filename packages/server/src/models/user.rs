use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::entity::user::{ROLE_ADMIN, ROLE_USER};
use crate::error::AppError;
use crate::models::auth::{UserResponse, validate_name};
use crate::models::favorite::FavoriteResponse;
use crate::models::recipe::RecipeSummary;
use crate::models::review::UserReviewResponse;

pub use super::shared::{Pagination, escape_like};
use super::shared::double_option;

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Page number (1-based). Default: 1.
    pub page: Option<u64>,
    /// Items per page (1-100). Default: 20.
    pub per_page: Option<u64>,
    /// Case-insensitive substring match on email or name.
    pub search: Option<String>,
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct UserListItem {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserListResponse {
    pub data: Vec<UserListItem>,
    pub pagination: Pagination,
}

/// A user together with everything they own.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub recipes: Vec<RecipeSummary>,
    pub favorites: Vec<FavoriteResponse>,
    pub reviews: Vec<UserReviewResponse>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    /// New display name; null clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    /// `USER` or `ADMIN`. Only admins may change roles.
    #[schema(example = "ADMIN")]
    pub role: Option<String>,
}

/// Parse a role name into its canonical constant.
pub fn parse_role(role: &str) -> Result<&'static str, AppError> {
    match role.trim() {
        r if r.eq_ignore_ascii_case(ROLE_USER) => Ok(ROLE_USER),
        r if r.eq_ignore_ascii_case(ROLE_ADMIN) => Ok(ROLE_ADMIN),
        _ => Err(AppError::Validation("Role must be USER or ADMIN".into())),
    }
}

pub fn validate_update_user(payload: &UpdateUserRequest) -> Result<(), AppError> {
    if let Some(Some(ref name)) = payload.name {
        validate_name(name)?;
    }
    if let Some(ref role) = payload.role {
        parse_role(role)?;
    }
    Ok(())
}
