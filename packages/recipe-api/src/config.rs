use serde::Deserialize;

/// Connection settings for the third-party recipe API.
#[derive(Debug, Deserialize, Clone)]
pub struct RecipeApiConfig {
    /// Base URL without a trailing slash. Default: "https://api.spoonacular.com".
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key sent as the `apiKey` query parameter. Empty disables the client.
    #[serde(default)]
    pub api_key: String,
    /// Per-request timeout in seconds. Default: 10.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.spoonacular.com".into()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for RecipeApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
