pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use client::SpoonacularClient;
pub use config::RecipeApiConfig;
pub use error::RecipeApiError;
pub use models::{ExtendedIngredient, RecipeDetail, RecipeSummary};
pub use traits::RecipeSource;
