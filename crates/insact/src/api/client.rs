//! HTTP client for the stories backend
//!
//! A thin reqwest wrapper implementing [`StoryApi`]. Every request is bounded
//! by the configured timeout and every failure comes back as an [`ApiError`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use super::{ChatRequest, ChatResponse, SearchRequest, SearchResponse, StoryApi};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::story::{EnrichedStory, Story, StoryId};

pub struct HttpStoryApi {
  client: Client,
  base_url: Url,
  timeout_secs: u64,
}

impl HttpStoryApi {
  pub fn new(config: &ApiConfig) -> ApiResult<Self> {
    let base_url = Url::parse(config.base_url.trim())
      .map_err(|e| ApiError::invalid_base_url(&config.base_url, e.to_string()))?;
    if base_url.cannot_be_a_base() {
      return Err(ApiError::invalid_base_url(&config.base_url, "not a hierarchical URL"));
    }

    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(ApiError::Client)?;

    Ok(Self { client, base_url, timeout_secs: config.timeout_secs })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// Append path segments to the base URL, keeping any prefix it carries
  fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| ApiError::invalid_base_url(self.base_url.as_str(), "not a hierarchical URL"))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }

  async fn send<T: DeserializeOwned>(&self, url: Url, request: RequestBuilder) -> ApiResult<T> {
    let url = url.to_string();
    let response = timeout(Duration::from_secs(self.timeout_secs), request.send())
      .await
      .map_err(|_| ApiError::Timeout { url: url.clone(), secs: self.timeout_secs })?
      .map_err(|source| ApiError::Transport { url: url.clone(), source })?;

    let status = response.status();
    let body =
      response.text().await.map_err(|source| ApiError::Transport { url: url.clone(), source })?;

    if !status.is_success() {
      return Err(ApiError::Status { url, status: status.as_u16(), body });
    }

    serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })
  }

  async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<T> {
    let url = self.endpoint(segments)?;
    tracing::debug!(%url, "GET");
    let request = self.client.get(url.clone());
    self.send(url, request).await
  }

  async fn post<B, T>(&self, segments: &[&str], body: &B) -> ApiResult<T>
  where
    B: serde::Serialize + Sync,
    T: DeserializeOwned,
  {
    let url = self.endpoint(segments)?;
    tracing::debug!(%url, "POST");
    let request = self.client.post(url.clone()).json(body);
    self.send(url, request).await
  }
}

#[async_trait]
impl StoryApi for HttpStoryApi {
  async fn list_stories(&self) -> ApiResult<Vec<Story>> {
    self.get(&["stories"]).await
  }

  async fn get_story(&self, id: &StoryId) -> ApiResult<Story> {
    let id = id.to_string();
    self.get(&["stories", &id]).await
  }

  async fn get_enriched_story(&self, id: &StoryId) -> ApiResult<EnrichedStory> {
    let id = id.to_string();
    self.get(&["stories", &id, "enriched"]).await
  }

  async fn search(&self, request: &SearchRequest) -> ApiResult<SearchResponse> {
    self.post(&["search-smart"], request).await
  }

  async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse> {
    self.post(&["chat"], request).await
  }
}
