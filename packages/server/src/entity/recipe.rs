use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Id in the third-party catalogue, for imported recipes.
    #[sea_orm(unique)]
    pub external_id: Option<i64>,

    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub instructions: Option<String>,
    pub image: Option<String>,

    pub creator_id: Option<i32>, // None for imported recipes
    #[sea_orm(belongs_to, from = "creator_id", to = "id", on_delete = "Cascade")]
    pub creator: HasOne<super::user::Entity>,

    #[sea_orm(has_many)]
    pub ingredients: HasMany<super::ingredient::Entity>,

    #[sea_orm(has_many)]
    pub reviews: HasMany<super::review::Entity>,

    #[sea_orm(has_many)]
    pub saved_by: HasMany<super::saved_recipe::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
