use std::sync::Arc;

use recipe_api::RecipeSource;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub recipes: Arc<dyn RecipeSource>,
}
