use std::sync::Arc;

use crate::api::{HttpStoryApi, StoryApi};
use crate::config::ApiConfig;
use crate::discovery::DiscoveryController;
use crate::error::ApiResult;
use crate::session::{SessionController, View};
use crate::story::StoryId;

/// The whole browsing flow: a list view and a detail view over one backend.
///
/// Selecting a story hands it from discovery to the session; going back tears
/// the session down and leaves discovery exactly as it was.
#[derive(Clone)]
pub struct Explorer {
  api: Arc<dyn StoryApi>,
  discovery: DiscoveryController,
  session: SessionController,
}

impl Explorer {
  pub fn new(api: Arc<dyn StoryApi>) -> Self {
    Self {
      discovery: DiscoveryController::new(Arc::clone(&api)),
      session: SessionController::new(Arc::clone(&api)),
      api,
    }
  }

  /// Build an explorer talking HTTP to the configured backend
  pub fn connect(config: &ApiConfig) -> ApiResult<Self> {
    let api = HttpStoryApi::new(config)?;
    tracing::debug!(base_url = %api.base_url(), "using stories backend");
    Ok(Self::new(Arc::new(api)))
  }

  pub fn discovery(&self) -> &DiscoveryController {
    &self.discovery
  }

  pub fn session(&self) -> &SessionController {
    &self.session
  }

  /// Load the catalog
  pub async fn start(&self) {
    self.discovery.load_catalog().await;
  }

  /// Open the detail view for `id`. Stories already on screen or in the
  /// catalog are used as they are; anything else is fetched. Returns false
  /// when the story cannot be found, or when a later `select` or `back`
  /// happened while it was being fetched.
  pub async fn select(&self, id: &StoryId) -> bool {
    let ticket = self.session.reserve();
    let story = match self.discovery.find_story(id) {
      Some(story) => story,
      None => match self.api.get_story(id).await {
        Ok(story) => story,
        Err(e) => {
          tracing::warn!("Story {id} not found: {e}");
          return false;
        }
      },
    };

    self.session.open_reserved(ticket, story).await
  }

  pub fn back(&self) {
    self.session.back();
  }

  pub fn view(&self) -> View {
    self.session.view()
  }
}
