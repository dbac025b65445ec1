use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::{info, instrument, warn};

use crate::entity::{ingredient, recipe, review};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::recipe::*;
use crate::models::review::{RecipeReviewsResponse, ReviewResponse, average_rating};
use crate::models::shared::{blank_to_none, page_offset, page_params};
use crate::state::AppState;
use crate::utils::import::{existing_external_ids, import_recipe, plan_import};
use crate::utils::recipe::{
    NewIngredient, delete_recipes, find_recipe, ingredients_of, insert_ingredients,
    with_ingredients,
};
use crate::utils::user::{find_user, recipes_by};

#[utoipa::path(
    get,
    path = "/",
    tag = "Recipes",
    operation_id = "listRecipes",
    summary = "List recipes with pagination and search",
    description = "Returns a paginated list of stored recipes, both imported and user-created. Supports case-insensitive title search and sorting by `created_at` (default, desc) or `title`. Instructions and ingredients are omitted from list results.",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "List of recipes", body = RecipeListResponse),
        (status = 400, description = "Invalid sort parameters (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<RecipeListQuery>,
) -> Result<Json<RecipeListResponse>, AppError> {
    let (page, per_page) = page_params(query.page, query.per_page);

    let mut select = recipe::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(recipe::Column::Title)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    let sort_by = query.sort_by.as_deref().unwrap_or("created_at");
    let sort_order = match query.sort_order.as_deref() {
        None | Some("desc") => Order::Desc,
        Some("asc") => Order::Asc,
        Some(_) => {
            return Err(AppError::Validation(
                "sort_order must be one of: asc, desc".into(),
            ));
        }
    };
    let sort_column = match sort_by {
        "created_at" => recipe::Column::CreatedAt,
        "title" => recipe::Column::Title,
        _ => {
            return Err(AppError::Validation(
                "sort_by must be one of: created_at, title".into(),
            ));
        }
    };

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by(sort_column, sort_order.clone())
        .order_by(recipe::Column::Id, sort_order)
        .select_only()
        .column(recipe::Column::Id)
        .column(recipe::Column::ExternalId)
        .column(recipe::Column::Title)
        .column(recipe::Column::Image)
        .column(recipe::Column::CreatorId)
        .column(recipe::Column::CreatedAt)
        .offset(Some(page_offset(page, per_page)))
        .limit(Some(per_page))
        .into_model::<RecipeSummary>()
        .all(&state.db)
        .await?;

    Ok(Json(RecipeListResponse {
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
    tag = "Recipes",
    operation_id = "getRecipe",
    summary = "Get a recipe by ID",
    description = "Returns a stored recipe with its ingredients in order.",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe details", body = RecipeResponse),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, AppError> {
    let model = find_recipe(&state.db, id).await?;
    let ingredients = ingredients_of(&state.db, id).await?;
    Ok(Json(RecipeResponse::new(model, ingredients)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Recipes",
    operation_id = "deleteRecipe",
    summary = "Delete a recipe by ID",
    description = "Permanently deletes a recipe with its ingredients, favorites and reviews. Allowed for the recipe's creator and for admins; imported recipes can only be deleted by admins.",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_recipe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_recipe(&txn, id).await?;
    if existing.creator_id != Some(auth_user.user_id) {
        auth_user.require_admin()?;
    }

    delete_recipes(&txn, &[id]).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/seed",
    tag = "Recipes",
    operation_id = "seedRecipes",
    summary = "Import random recipes from the recipe provider",
    description = "Fetches `count` random recipes from the external provider and stores those not already imported. Recipes with neither instructions nor summary are skipped. Each recipe is inserted in its own transaction. Admin only.",
    request_body = SeedRequest,
    responses(
        (status = 201, description = "Seeding finished", body = SeedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 502, description = "Recipe provider failed (UPSTREAM_ERROR)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(count = payload.count))]
pub async fn seed_recipes(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SeedRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_seed_request(&payload)?;

    let fetched = state.recipes.random(payload.count).await?;
    let fetched_count = fetched.len();

    let ids: Vec<i64> = fetched.iter().map(|d| d.id).collect();
    let existing = existing_external_ids(&state.db, &ids).await?;
    let plan = plan_import(fetched, &existing);

    let mut skipped_existing = plan.skipped_existing;
    let mut recipes = Vec::with_capacity(plan.to_create.len());

    for detail in &plan.to_create {
        let txn = state.db.begin().await?;
        match import_recipe(&txn, detail).await {
            Ok(model) => {
                txn.commit().await?;
                recipes.push(RecipeSummary::from(model));
            }
            Err(e) if e.is_unique_violation() => {
                txn.rollback().await?;
                warn!(external_id = detail.id, "Recipe imported concurrently, skipping");
                skipped_existing += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!(
        requested = payload.count,
        fetched = fetched_count,
        created = recipes.len(),
        skipped_existing,
        skipped_incomplete = plan.skipped_incomplete,
        "Seeded recipes"
    );

    Ok((
        StatusCode::CREATED,
        Json(SeedResponse {
            requested: payload.count,
            fetched: fetched_count,
            created: recipes.len(),
            skipped_existing,
            skipped_incomplete: plan.skipped_incomplete,
            recipes,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}/reviews",
    tag = "Reviews",
    operation_id = "listRecipeReviews",
    summary = "List reviews of a recipe",
    description = "Returns all reviews of a recipe, newest first, with the average rating (null when there are none).",
    params(("id" = i32, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Reviews of the recipe", body = RecipeReviewsResponse),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn list_recipe_reviews(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeReviewsResponse>, AppError> {
    find_recipe(&state.db, id).await?;

    let reviews: Vec<ReviewResponse> = review::Entity::find()
        .filter(review::Column::RecipeId.eq(id))
        .order_by_desc(review::Column::CreatedAt)
        .order_by_desc(review::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(RecipeReviewsResponse {
        average_rating: average_rating(&reviews),
        reviews,
    }))
}

/// A recipe that exists and was created by `user_id`, or 404.
async fn find_owned_recipe<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    recipe_id: i32,
) -> Result<recipe::Model, AppError> {
    recipe::Entity::find_by_id(recipe_id)
        .filter(recipe::Column::CreatorId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipe not found".into()))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "User Recipes",
    operation_id = "listUserRecipes",
    summary = "List recipes created by a user",
    description = "Returns the user's own recipes with ingredients, newest first.",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user's recipes", body = Vec<RecipeResponse>),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn list_user_recipes(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    auth_user.require_self_or_admin(id)?;
    find_user(&state.db, id).await?;

    let recipes = recipes_by(&state.db, id).await?;
    Ok(Json(with_ingredients(&state.db, recipes).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "User Recipes",
    operation_id = "createUserRecipe",
    summary = "Create a recipe",
    description = "Creates a recipe owned by the user, with its ingredients in the given order. Blank instructions, image and amounts are stored as null.",
    params(("id" = i32, Path, description = "User ID")),
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, title = %payload.title))]
pub async fn create_user_recipe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CreateRecipeRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_self_or_admin(id)?;
    validate_create_recipe(&payload)?;

    let txn = state.db.begin().await?;
    find_user(&txn, id).await?;

    let now = chrono::Utc::now();
    let new_recipe = recipe::ActiveModel {
        external_id: Set(None),
        title: Set(payload.title.trim().to_string()),
        instructions: Set(blank_to_none(payload.instructions)),
        image: Set(blank_to_none(payload.image)),
        creator_id: Set(Some(id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let model = new_recipe.insert(&txn).await?;

    let ingredients = insert_ingredients(
        &txn,
        model.id,
        payload.ingredients.into_iter().map(NewIngredient::from).collect(),
    )
    .await?;

    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(RecipeResponse::new(model, ingredients)),
    ))
}

#[utoipa::path(
    patch,
    path = "/{recipe_id}",
    tag = "User Recipes",
    operation_id = "updateUserRecipe",
    summary = "Update a recipe",
    description = "Partially updates one of the user's recipes. `instructions: null` or `image: null` clears the field. `ingredients`, when present, replaces the whole list. An empty payload returns the current resource unchanged.",
    params(
        ("id" = i32, Path, description = "User ID"),
        ("recipe_id" = i32, Path, description = "Recipe ID"),
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, recipe_id))]
pub async fn update_user_recipe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((id, recipe_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, AppError> {
    auth_user.require_self_or_admin(id)?;
    validate_update_recipe(&payload)?;

    if payload == UpdateRecipeRequest::default() {
        let existing = find_owned_recipe(&state.db, id, recipe_id).await?;
        let ingredients = ingredients_of(&state.db, recipe_id).await?;
        return Ok(Json(RecipeResponse::new(existing, ingredients)));
    }

    let txn = state.db.begin().await?;

    let existing = find_owned_recipe(&txn, id, recipe_id).await?;
    let mut active: recipe::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(instructions) = payload.instructions {
        active.instructions = Set(blank_to_none(instructions));
    }
    if let Some(image) = payload.image {
        active.image = Set(blank_to_none(image));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;

    let ingredients = match payload.ingredients {
        Some(items) => {
            ingredient::Entity::delete_many()
                .filter(ingredient::Column::RecipeId.eq(recipe_id))
                .exec(&txn)
                .await?;
            insert_ingredients(
                &txn,
                recipe_id,
                items.into_iter().map(NewIngredient::from).collect(),
            )
            .await?
        }
        None => ingredients_of(&txn, recipe_id).await?,
    };

    txn.commit().await?;

    Ok(Json(RecipeResponse::new(model, ingredients)))
}

#[utoipa::path(
    delete,
    path = "/{recipe_id}",
    tag = "User Recipes",
    operation_id = "deleteUserRecipe",
    summary = "Delete a recipe created by the user",
    description = "Deletes one of the user's recipes with its ingredients, favorites and reviews. Returns 404 if the recipe does not exist or belongs to someone else.",
    params(
        ("id" = i32, Path, description = "User ID"),
        ("recipe_id" = i32, Path, description = "Recipe ID"),
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized (SESSION_MISSING, SESSION_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Recipe not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("session" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, recipe_id))]
pub async fn delete_user_recipe(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((id, recipe_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_self_or_admin(id)?;

    let txn = state.db.begin().await?;
    find_owned_recipe(&txn, id, recipe_id).await?;
    delete_recipes(&txn, &[recipe_id]).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
