use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeApiError {
    #[error("Recipe API key is not configured")]
    NotConfigured,

    #[error("Recipe {0} not found")]
    NotFound(i64),

    #[error("Recipe API returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Recipe API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Recipe API returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
