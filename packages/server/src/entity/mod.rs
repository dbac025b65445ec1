pub mod ingredient;
pub mod recipe;
pub mod review;
pub mod saved_recipe;
pub mod user;
