use sea_orm::*;
use sea_orm::sea_query::{Index, IndexCreateStatement, OnConflict, PostgresQueryBuilder};
use tracing::{info, warn};

use crate::config::AdminConfig;
use crate::entity::{ingredient, recipe, review, saved_recipe, user};
use crate::models::auth::normalize_email;
use crate::utils::hash;

/// Create the configured admin account, or promote it if it already exists.
pub async fn seed_admin(db: &DatabaseConnection, admin: &AdminConfig) -> anyhow::Result<()> {
    let email = normalize_email(&admin.email);

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await?;

    match existing {
        Some(u) if u.role == user::ROLE_ADMIN => {}
        Some(u) => {
            let mut active: user::ActiveModel = u.into();
            active.role = Set(user::ROLE_ADMIN.to_string());
            active.update(db).await?;
            info!(%email, "Promoted existing user to admin");
        }
        None => {
            let password = hash::hash_password(&admin.password)
                .map_err(|e| anyhow::anyhow!("Password hash error: {e}"))?;
            let model = user::ActiveModel {
                email: Set(email.clone()),
                password: Set(password),
                name: Set(admin.name.clone()),
                role: Set(user::ROLE_ADMIN.to_string()),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            };

            let result = user::Entity::insert(model)
                .on_conflict(
                    OnConflict::column(user::Column::Email)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await;

            match result {
                Ok(_) => info!(%email, "Created admin account"),
                Err(DbErr::RecordNotInserted) => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let indexes: Vec<(&str, IndexCreateStatement)> = vec![
        // Ingredients of a recipe, in order
        (
            "idx_ingredient_recipe_position",
            Index::create()
                .table(ingredient::Entity)
                .col(ingredient::Column::RecipeId)
                .col(ingredient::Column::Position)
                .to_owned(),
        ),
        // A user's recipes, newest first
        (
            "idx_recipe_creator_created",
            Index::create()
                .table(recipe::Entity)
                .col(recipe::Column::CreatorId)
                .col(recipe::Column::CreatedAt)
                .to_owned(),
        ),
        // A user's reviews, newest first
        (
            "idx_review_user_created",
            Index::create()
                .table(review::Entity)
                .col(review::Column::UserId)
                .col(review::Column::CreatedAt)
                .to_owned(),
        ),
        // Reviews of a recipe
        (
            "idx_review_recipe",
            Index::create()
                .table(review::Entity)
                .col(review::Column::RecipeId)
                .to_owned(),
        ),
        // Who saved a recipe (the primary key covers the user side)
        (
            "idx_saved_recipe_recipe",
            Index::create()
                .table(saved_recipe::Entity)
                .col(saved_recipe::Column::RecipeId)
                .to_owned(),
        ),
    ];

    for (name, mut stmt) in indexes {
        let sql = stmt.if_not_exists().name(name).to_string(PostgresQueryBuilder);
        match db.execute_unprepared(&sql).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => warn!("Failed to create index {}: {}", name, e),
        }
    }

    Ok(())
}
