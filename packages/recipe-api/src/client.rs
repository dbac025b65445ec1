use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::RecipeApiConfig;
use crate::error::RecipeApiError;
use crate::models::{FailureBody, RandomEnvelope, RecipeDetail, RecipeSummary, SearchEnvelope};
use crate::traits::RecipeSource;

/// `RecipeSource` backed by the Spoonacular REST API.
#[derive(Debug, Clone)]
pub struct SpoonacularClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl SpoonacularClient {
    pub fn new(config: &RecipeApiConfig) -> Result<Self, RecipeApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RecipeApiError> {
        if self.api_key.is_empty() {
            return Err(RecipeApiError::NotConfigured);
        }

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Requesting recipe API");

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<FailureBody>(&body)
                .ok()
                .and_then(|f| f.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            warn!(status = status.as_u16(), %message, "Recipe API request failed");
            return Err(RecipeApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<RecipeSummary>, RecipeApiError> {
        let envelope: SearchEnvelope = self
            .get_json("/recipes/complexSearch", &[("query", query.to_string())])
            .await?;
        Ok(envelope.results)
    }

    #[instrument(skip(self))]
    async fn recipe(&self, id: i64) -> Result<RecipeDetail, RecipeApiError> {
        self.get_json(&format!("/recipes/{id}/information"), &[])
            .await
            .map_err(|e| match e {
                RecipeApiError::Status { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
                    RecipeApiError::NotFound(id)
                }
                other => other,
            })
    }

    #[instrument(skip(self))]
    async fn random(&self, number: u32) -> Result<Vec<RecipeDetail>, RecipeApiError> {
        let envelope: RandomEnvelope = self
            .get_json(
                "/recipes/random",
                &[
                    ("number", number.to_string()),
                    ("instructionsRequired", "true".to_string()),
                ],
            )
            .await?;
        Ok(envelope.recipes)
    }
}
