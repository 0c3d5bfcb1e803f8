use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::story::{EnrichedStory, Story, StoryId};

pub mod client;

pub use client::HttpStoryApi;

/// Body of a smart search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
  pub query: String,
  pub discover_opportunities: bool,
}

impl SearchRequest {
  pub fn new(query: impl Into<String>) -> Self {
    Self { query: query.into(), discover_opportunities: true }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
  #[serde(default)]
  pub existing_stories: Vec<Story>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
  pub message: String,
  #[serde(rename = "storyId")]
  pub story_id: StoryId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
  pub response: String,
  #[serde(default)]
  pub timestamp: Option<String>,
}

/// The stories backend, as seen by the controllers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryApi: Send + Sync {
  /// Every story in the catalog, in backend order
  async fn list_stories(&self) -> ApiResult<Vec<Story>>;

  async fn get_story(&self, id: &StoryId) -> ApiResult<Story>;

  /// The story with whatever enrichment the backend has for it
  async fn get_enriched_story(&self, id: &StoryId) -> ApiResult<EnrichedStory>;

  async fn search(&self, request: &SearchRequest) -> ApiResult<SearchResponse>;

  async fn chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse>;
}
