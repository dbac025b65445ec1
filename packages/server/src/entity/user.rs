use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role assigned to newly registered users.
pub const ROLE_USER: &str = "USER";
/// Role allowed to manage users and all content.
pub const ROLE_ADMIN: &str = "ADMIN";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String, // argon2 PHC string
    pub name: Option<String>,
    pub role: String,

    #[sea_orm(has_many)]
    pub recipes: HasMany<super::recipe::Entity>,

    #[sea_orm(has_many)]
    pub reviews: HasMany<super::review::Entity>,

    #[sea_orm(has_many)]
    pub saved_recipes: HasMany<super::saved_recipe::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
