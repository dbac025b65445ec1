use std::collections::HashMap;

use sea_orm::*;

use crate::entity::{recipe, review, saved_recipe, user};
use crate::error::AppError;
use crate::models::favorite::FavoriteResponse;
use crate::models::recipe::RecipeSummary;
use crate::models::review::UserReviewResponse;

pub async fn find_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

/// Recipes created by a user, newest first.
pub async fn recipes_by<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<recipe::Model>, AppError> {
    Ok(recipe::Entity::find()
        .filter(recipe::Column::CreatorId.eq(user_id))
        .order_by_desc(recipe::Column::CreatedAt)
        .order_by_desc(recipe::Column::Id)
        .all(db)
        .await?)
}

async fn summaries_by_id<C: ConnectionTrait>(
    db: &C,
    ids: Vec<i32>,
) -> Result<HashMap<i32, RecipeSummary>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(recipe::Entity::find()
        .filter(recipe::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|r| (r.id, RecipeSummary::from(r)))
        .collect())
}

/// A user's saved recipes, most recently saved first.
pub async fn favorites_of<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<FavoriteResponse>, AppError> {
    let saved = saved_recipe::Entity::find()
        .filter(saved_recipe::Column::UserId.eq(user_id))
        .order_by_desc(saved_recipe::Column::CreatedAt)
        .all(db)
        .await?;

    let mut recipes = summaries_by_id(db, saved.iter().map(|s| s.recipe_id).collect()).await?;

    Ok(saved
        .into_iter()
        .filter_map(|s| {
            recipes.remove(&s.recipe_id).map(|recipe| FavoriteResponse {
                recipe,
                saved_at: s.created_at,
            })
        })
        .collect())
}

/// A user's reviews with the reviewed recipe, newest first.
pub async fn reviews_by<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<UserReviewResponse>, AppError> {
    let reviews = review::Entity::find()
        .filter(review::Column::UserId.eq(user_id))
        .order_by_desc(review::Column::CreatedAt)
        .order_by_desc(review::Column::Id)
        .all(db)
        .await?;

    let recipes = summaries_by_id(db, reviews.iter().map(|r| r.recipe_id).collect()).await?;

    Ok(reviews
        .into_iter()
        .filter_map(|r| {
            recipes.get(&r.recipe_id).map(|recipe| UserReviewResponse {
                id: r.id,
                text: r.text,
                rating: r.rating,
                created_at: r.created_at,
                recipe: recipe.clone(),
            })
        })
        .collect())
}

/// Delete a user together with their favorites, reviews and created recipes.
pub async fn delete_user_cascade<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<(), AppError> {
    let recipe_ids: Vec<i32> = recipes_by(db, user_id)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect();
    super::recipe::delete_recipes(db, &recipe_ids).await?;

    saved_recipe::Entity::delete_many()
        .filter(saved_recipe::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    review::Entity::delete_many()
        .filter(review::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    user::Entity::delete_by_id(user_id).exec(db).await?;

    Ok(())
}
