use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/recipes", recipe_routes())
        .nest("/external/recipes", external_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::logout))
        .routes(routes!(handlers::auth::me))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::user::list_users))
        .routes(routes!(
            handlers::user::get_user,
            handlers::user::update_user,
            handlers::user::delete_user
        ))
        .nest("/{id}/recipes", user_recipe_routes())
        .nest("/{id}/favorites", favorite_routes())
        .nest("/{id}/reviews", review_routes())
}

fn user_recipe_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::recipe::list_user_recipes,
            handlers::recipe::create_user_recipe
        ))
        .routes(routes!(
            handlers::recipe::update_user_recipe,
            handlers::recipe::delete_user_recipe
        ))
}

fn favorite_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::favorite::list_favorites,
            handlers::favorite::add_favorite
        ))
        .routes(routes!(handlers::favorite::remove_favorite))
}

fn review_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::review::list_user_reviews,
            handlers::review::create_review
        ))
        .routes(routes!(handlers::review::delete_review))
}

fn recipe_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::recipe::list_recipes))
        .routes(routes!(handlers::recipe::seed_recipes))
        .routes(routes!(
            handlers::recipe::get_recipe,
            handlers::recipe::delete_recipe
        ))
        .routes(routes!(handlers::recipe::list_recipe_reviews))
}

fn external_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::external::search))
        .routes(routes!(handlers::external::random))
        .routes(routes!(handlers::external::detail))
}
