// src/backend/http.rs - reqwest transport for the DishHub REST API

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::envelope::ApiEnvelope;
use super::{
    ConsumptionRequest, Dish, DishBackend, DishDraft, DishSummary, HistoryPage, HistoryQuery,
    Ingredient, IngredientDraft,
};
use crate::infra::config::BackendConfig;
use crate::infra::errors::DishHubError;

pub struct HttpBackend {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Build a backend with a default client (no request timeout).
    pub fn new(base_url: &str) -> Result<Self, DishHubError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| DishHubError::Config(format!("invalid base_url '{base_url}': {e}")))?;
        Ok(Self {
            base_url,
            client: reqwest::Client::new(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, DishHubError> {
        let base_url = config.parsed_base_url()?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DishHubError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { base_url, client })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, DishHubError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DishHubError::Config(format!("base_url '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, DishHubError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DishHubError::transport(format!("Request timed out: {e}"))
            } else {
                DishHubError::transport(format!("Network error: {e}"))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| DishHubError::transport(format!("Failed to read response: {e}")))?;

        ApiEnvelope::from_http(status, &body)?.into_result()
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, DishHubError> {
        let url = self.endpoint(segments)?;
        tracing::debug!("GET {}", url);
        let data = self.send(self.client.get(url)).await?;
        decode(data)
    }

    async fn put_json<B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<(), DishHubError> {
        let url = self.endpoint(segments)?;
        tracing::debug!("PUT {}", url);
        self.send(self.client.put(url).json(body)).await?;
        Ok(())
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<(), DishHubError> {
        let url = self.endpoint(segments)?;
        tracing::debug!("POST {}", url);
        self.send(self.client.post(url).json(body)).await?;
        Ok(())
    }

    async fn delete(&self, segments: &[&str]) -> Result<(), DishHubError> {
        let url = self.endpoint(segments)?;
        tracing::debug!("DELETE {}", url);
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T, DishHubError> {
    serde_json::from_value(data).map_err(|e| DishHubError::Decode(e.to_string()))
}

#[async_trait]
impl DishBackend for HttpBackend {
    async fn dish(&self, dish_id: &str) -> Result<Dish, DishHubError> {
        self.get_json(&["dish", dish_id]).await
    }

    async fn start_cooking(
        &self,
        dish_id: &str,
        request: &ConsumptionRequest,
    ) -> Result<(), DishHubError> {
        self.put_json(&["dishes", dish_id, "start"], request).await
    }

    async fn stop_cooking(
        &self,
        dish_id: &str,
        request: &ConsumptionRequest,
    ) -> Result<(), DishHubError> {
        self.put_json(&["dishes", dish_id, "stop"], request).await
    }

    async fn delete_ingredient(
        &self,
        dish_id: &str,
        ingredient_id: &str,
    ) -> Result<(), DishHubError> {
        self.delete(&["dishes", dish_id, "ingredients", ingredient_id])
            .await
    }

    async fn add_ingredient(
        &self,
        dish_id: &str,
        request: &ConsumptionRequest,
    ) -> Result<(), DishHubError> {
        self.put_json(&["dishes", dish_id, "add-ing"], request).await
    }

    async fn dishes(&self) -> Result<Vec<DishSummary>, DishHubError> {
        self.get_json(&["dishes"]).await
    }

    async fn ingredients(&self) -> Result<Vec<Ingredient>, DishHubError> {
        self.get_json(&["ing"]).await
    }

    async fn history(&self, query: &HistoryQuery) -> Result<HistoryPage, DishHubError> {
        let url = self.endpoint(&["dishes", "history"])?;
        tracing::debug!("GET {} page={} limit={}", url, query.page, query.limit);
        let data = self.send(self.client.get(url).query(query)).await?;
        decode(data)
    }

    async fn create_dish(&self, draft: &DishDraft) -> Result<(), DishHubError> {
        self.post_json(&["dish"], draft).await
    }

    async fn update_dish(&self, dish_id: &str, draft: &DishDraft) -> Result<(), DishHubError> {
        self.put_json(&["dish", dish_id], draft).await
    }

    async fn delete_dish(&self, dish_id: &str) -> Result<(), DishHubError> {
        self.delete(&["dish", dish_id]).await
    }

    async fn ingredient(&self, ingredient_id: &str) -> Result<Ingredient, DishHubError> {
        self.get_json(&["ing", ingredient_id]).await
    }

    async fn create_ingredient(&self, draft: &IngredientDraft) -> Result<(), DishHubError> {
        self.post_json(&["ing"], draft).await
    }

    async fn update_ingredient(
        &self,
        ingredient_id: &str,
        draft: &IngredientDraft,
    ) -> Result<(), DishHubError> {
        self.put_json(&["ing", ingredient_id], draft).await
    }
}
