use std::collections::HashMap;

use sea_orm::*;

use crate::entity::{ingredient, recipe, review, saved_recipe};
use crate::error::AppError;
use crate::models::recipe::{IngredientInput, RecipeResponse};
use crate::models::shared::blank_to_none;

/// An ingredient about to be inserted.
pub struct NewIngredient {
    pub name: String,
    pub amount: Option<String>,
}

impl From<IngredientInput> for NewIngredient {
    fn from(input: IngredientInput) -> Self {
        Self {
            name: input.name.trim().to_string(),
            amount: blank_to_none(input.amount),
        }
    }
}

pub async fn find_recipe<C: ConnectionTrait>(db: &C, id: i32) -> Result<recipe::Model, AppError> {
    recipe::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".into()))
}

/// Map a failed insert that references a recipe. A foreign-key violation means
/// the recipe was deleted after it was looked up.
pub fn recipe_reference_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            AppError::NotFound("Recipe not found".into())
        }
        _ => AppError::from(err),
    }
}

/// Ingredients of one recipe, in insertion order.
pub async fn ingredients_of<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
) -> Result<Vec<ingredient::Model>, AppError> {
    Ok(ingredient::Entity::find()
        .filter(ingredient::Column::RecipeId.eq(recipe_id))
        .order_by_asc(ingredient::Column::Position)
        .order_by_asc(ingredient::Column::Id)
        .all(db)
        .await?)
}

/// Attach ingredients to many recipes with a single query, preserving recipe order.
pub async fn with_ingredients<C: ConnectionTrait>(
    db: &C,
    recipes: Vec<recipe::Model>,
) -> Result<Vec<RecipeResponse>, AppError> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();
    let rows = ingredient::Entity::find()
        .filter(ingredient::Column::RecipeId.is_in(ids))
        .order_by_asc(ingredient::Column::Position)
        .order_by_asc(ingredient::Column::Id)
        .all(db)
        .await?;

    let mut by_recipe: HashMap<i32, Vec<ingredient::Model>> = HashMap::new();
    for row in rows {
        by_recipe.entry(row.recipe_id).or_default().push(row);
    }

    Ok(recipes
        .into_iter()
        .map(|r| {
            let ingredients = by_recipe.remove(&r.id).unwrap_or_default();
            RecipeResponse::new(r, ingredients)
        })
        .collect())
}

/// Insert ingredients for a recipe, numbering positions from 0.
pub async fn insert_ingredients<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
    items: Vec<NewIngredient>,
) -> Result<Vec<ingredient::Model>, AppError> {
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let models = items.into_iter().enumerate().map(|(pos, item)| ingredient::ActiveModel {
        name: Set(item.name),
        amount: Set(item.amount),
        position: Set(pos as i32),
        recipe_id: Set(recipe_id),
        ..Default::default()
    });
    ingredient::Entity::insert_many(models)
        .exec_without_returning(db)
        .await?;

    ingredients_of(db, recipe_id).await
}

/// Delete recipes and everything that hangs off them.
pub async fn delete_recipes<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }

    ingredient::Entity::delete_many()
        .filter(ingredient::Column::RecipeId.is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    saved_recipe::Entity::delete_many()
        .filter(saved_recipe::Column::RecipeId.is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    review::Entity::delete_many()
        .filter(review::Column::RecipeId.is_in(ids.iter().copied()))
        .exec(db)
        .await?;
    recipe::Entity::delete_many()
        .filter(recipe::Column::Id.is_in(ids.iter().copied()))
        .exec(db)
        .await?;

    Ok(())
}
