use std::collections::HashSet;

use recipe_api::{RecipeDetail, RecipeSource};
use sea_orm::*;
use tracing::{debug, info};

use crate::entity::recipe;
use crate::error::AppError;
use crate::utils::recipe::{NewIngredient, insert_ingredients};

/// Outcome of filtering a fetched batch against the store.
#[derive(Debug)]
pub struct ImportPlan {
    pub to_create: Vec<RecipeDetail>,
    pub skipped_existing: usize,
    pub skipped_incomplete: usize,
}

/// Drop recipes already stored (or repeated within the batch), then those with
/// neither instructions nor summary. Input order is preserved.
pub fn plan_import(fetched: Vec<RecipeDetail>, existing: &HashSet<i64>) -> ImportPlan {
    let mut seen = HashSet::new();
    let mut plan = ImportPlan {
        to_create: Vec::new(),
        skipped_existing: 0,
        skipped_incomplete: 0,
    };

    for detail in fetched {
        if existing.contains(&detail.id) || seen.contains(&detail.id) {
            plan.skipped_existing += 1;
            continue;
        }
        if detail.instructions_or_summary().is_none() {
            plan.skipped_incomplete += 1;
            continue;
        }
        seen.insert(detail.id);
        plan.to_create.push(detail);
    }

    plan
}

/// External ids among `ids` that are already stored.
pub async fn existing_external_ids<C: ConnectionTrait>(
    db: &C,
    ids: &[i64],
) -> Result<HashSet<i64>, AppError> {
    if ids.is_empty() {
        return Ok(HashSet::new());
    }

    let rows = recipe::Entity::find()
        .filter(recipe::Column::ExternalId.is_in(ids.iter().copied()))
        .all(db)
        .await?;

    Ok(rows.into_iter().filter_map(|r| r.external_id).collect())
}

/// Insert an external recipe and its ingredients. Not creator-owned.
pub async fn import_recipe<C: ConnectionTrait>(
    db: &C,
    detail: &RecipeDetail,
) -> Result<recipe::Model, ImportError> {
    let now = chrono::Utc::now();
    let new_recipe = recipe::ActiveModel {
        external_id: Set(Some(detail.id)),
        title: Set(detail.title.trim().to_string()),
        instructions: Set(detail.instructions_or_summary().map(str::to_string)),
        image: Set(detail.image.clone().filter(|i| !i.trim().is_empty())),
        creator_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let model = new_recipe.insert(db).await.map_err(ImportError::Db)?;

    let ingredients = detail
        .extended_ingredients
        .iter()
        .filter(|i| !i.name.trim().is_empty())
        .map(|i| NewIngredient {
            name: i.name.trim().to_string(),
            amount: Some(i.amount_text()),
        })
        .collect();
    insert_ingredients(db, model.id, ingredients)
        .await
        .map_err(ImportError::App)?;

    Ok(model)
}

/// Import failure that keeps the raw `DbErr` so callers can detect unique violations.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("database error while importing recipe: {0}")]
    Db(#[source] DbErr),
    #[error("recipe import failed: {0:?}")]
    App(AppError),
}

impl ImportError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, ImportError::Db(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))))
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Db(e) => AppError::from(e),
            ImportError::App(e) => e,
        }
    }
}

/// Find a stored recipe by external id, importing it from `source` if absent.
pub async fn find_or_import(
    db: &DatabaseConnection,
    source: &dyn RecipeSource,
    external_id: i64,
) -> Result<recipe::Model, AppError> {
    if let Some(existing) = find_by_external_id(db, external_id).await? {
        return Ok(existing);
    }

    let detail = source.recipe(external_id).await?;

    let txn = db.begin().await?;
    match import_recipe(&txn, &detail).await {
        Ok(model) => {
            txn.commit().await?;
            info!(external_id, recipe_id = model.id, "Imported external recipe");
            Ok(model)
        }
        Err(e) if e.is_unique_violation() => {
            txn.rollback().await?;
            debug!(external_id, "Concurrent import won the race, reusing it");
            find_by_external_id(db, external_id)
                .await?
                .ok_or_else(|| AppError::Internal("Imported recipe vanished".into()))
        }
        Err(e) => Err(e.into()),
    }
}

async fn find_by_external_id<C: ConnectionTrait>(
    db: &C,
    external_id: i64,
) -> Result<Option<recipe::Model>, AppError> {
    Ok(recipe::Entity::find()
        .filter(recipe::Column::ExternalId.eq(external_id))
        .one(db)
        .await?)
}
