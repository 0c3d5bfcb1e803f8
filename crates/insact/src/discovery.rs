//! Story discovery
//!
//! Reconciles the three competing answers to "what should the list show":
//! the full catalog, one domain of it, or the results of a smart search.
//! Exactly one of them is active at a time:
//!
//! - a non-empty search query wins over the domain filter,
//! - picking a domain while a search is active clears the search,
//! - clearing a search re-applies whichever domain is still selected.
//!
//! Async requests are tagged with a generation number per request family
//! (catalog, search) and a response is only applied if its generation is
//! still the latest one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::{SearchRequest, SearchResponse, StoryApi};
use crate::catalog::{DomainIndex, StoryCatalog, ALL_DOMAINS};
use crate::error::ApiResult;
use crate::story::{Story, StoryId};

/// Which view produced the current display set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplaySource {
  Catalog,
  Domain(String),
  Search(String),
}

/// Point-in-time copy of everything a list view renders
#[derive(Debug, Clone)]
pub struct DiscoverySnapshot {
  pub stories: Vec<Story>,
  pub source: DisplaySource,
  pub domains: Vec<String>,
  pub selected_domain: String,
  pub search_query: Option<String>,
  pub is_searching: bool,
}

struct DiscoveryState {
  catalog: StoryCatalog,
  domains: DomainIndex,
  selected_domain: String,
  search_query: Option<String>,
  display: Vec<Story>,
  searching: bool,
  search_generation: u64,
  catalog_generation: u64,
}

impl DiscoveryState {
  fn new() -> Self {
    Self {
      catalog: StoryCatalog::default(),
      domains: DomainIndex::default(),
      selected_domain: ALL_DOMAINS.to_string(),
      search_query: None,
      display: Vec::new(),
      searching: false,
      search_generation: 0,
      catalog_generation: 0,
    }
  }

  fn refresh_from_catalog(&mut self) {
    self.display = self.catalog.in_domain(&self.selected_domain);
  }

  /// Drop the active search and invalidate any search still in flight
  fn clear_search(&mut self) {
    self.search_query = None;
    self.searching = false;
    self.search_generation += 1;
    self.refresh_from_catalog();
  }

  fn source(&self) -> DisplaySource {
    match &self.search_query {
      Some(query) => DisplaySource::Search(query.clone()),
      None if self.selected_domain == ALL_DOMAINS => DisplaySource::Catalog,
      None => DisplaySource::Domain(self.selected_domain.clone()),
    }
  }
}

fn lock(state: &Mutex<DiscoveryState>) -> MutexGuard<'_, DiscoveryState> {
  state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ends `searching` if a search is dropped before its response arrives. The
/// query and the display set are left as they were.
struct PendingSearch {
  state: Arc<Mutex<DiscoveryState>>,
  generation: u64,
}

impl Drop for PendingSearch {
  fn drop(&mut self) {
    let mut state = lock(&self.state);
    if state.search_generation == self.generation && state.searching {
      tracing::debug!(generation = self.generation, "search was cancelled");
      state.searching = false;
    }
  }
}

/// Owns the list view's state. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct DiscoveryController {
  api: Arc<dyn StoryApi>,
  state: Arc<Mutex<DiscoveryState>>,
}

impl DiscoveryController {
  pub fn new(api: Arc<dyn StoryApi>) -> Self {
    Self { api, state: Arc::new(Mutex::new(DiscoveryState::new())) }
  }

  fn state(&self) -> MutexGuard<'_, DiscoveryState> {
    lock(&self.state)
  }

  /// Replace the catalog and rebuild the domain index. The display set is
  /// only rebuilt when no search is active.
  pub fn set_catalog(&self, stories: Vec<Story>) {
    let mut state = self.state();
    state.catalog = StoryCatalog::new(stories);
    state.domains = DomainIndex::from_catalog(&state.catalog);
    if state.search_query.is_none() {
      state.refresh_from_catalog();
    }
    tracing::debug!(
      stories = state.catalog.len(),
      domains = state.domains.domains().len(),
      "catalog replaced"
    );
  }

  /// Fetch the story list from the backend. On failure the current catalog
  /// is kept.
  pub async fn load_catalog(&self) {
    let generation = {
      let mut state = self.state();
      state.catalog_generation += 1;
      state.catalog_generation
    };

    let result = self.api.list_stories().await;

    if self.state().catalog_generation != generation {
      tracing::debug!(generation, "discarding superseded catalog response");
      return;
    }

    match result {
      Ok(stories) => {
        tracing::info!("Loaded {} stories", stories.len());
        self.set_catalog(stories);
      }
      Err(e) => tracing::error!("Failed to load stories: {e}"),
    }
  }

  /// Select a domain. Any active search is cleared; the domain filter wins.
  pub fn filter_by_domain(&self, domain: &str) {
    let mut state = self.state();
    if !state.domains.contains(domain) {
      tracing::debug!(domain, "filtering by a domain outside the index");
    }
    state.selected_domain = domain.to_string();
    if state.search_query.is_some() {
      state.clear_search();
    } else {
      state.refresh_from_catalog();
    }
  }

  /// Run a smart search. A blank query behaves as [`clear_search`]. Results
  /// replace the display set regardless of the selected domain; a failed
  /// search shows nothing.
  ///
  /// [`clear_search`]: DiscoveryController::clear_search
  pub async fn search(&self, query: &str) {
    let query = query.trim();
    if query.is_empty() {
      self.clear_search();
      return;
    }

    let generation = {
      let mut state = self.state();
      state.search_generation += 1;
      state.search_query = Some(query.to_string());
      state.searching = true;
      state.search_generation
    };

    let _pending = PendingSearch { state: Arc::clone(&self.state), generation };
    let result = self.api.search(&SearchRequest::new(query)).await;
    self.apply_search(generation, query, result);
  }

  fn apply_search(&self, generation: u64, query: &str, result: ApiResult<SearchResponse>) {
    let mut state = self.state();
    if state.search_generation != generation {
      tracing::debug!(query, generation, "discarding stale search response");
      return;
    }

    state.searching = false;
    state.display = match result {
      Ok(response) => {
        tracing::info!(
          "Search for \"{query}\" returned {} results",
          response.existing_stories.len()
        );
        response.existing_stories
      }
      Err(e) => {
        tracing::error!("Search for \"{query}\" failed: {e}");
        Vec::new()
      }
    };
  }

  /// Drop the active search and show the selected domain again
  pub fn clear_search(&self) {
    self.state().clear_search();
  }

  pub fn display_set(&self) -> Vec<Story> {
    self.state().display.clone()
  }

  pub fn display_source(&self) -> DisplaySource {
    self.state().source()
  }

  pub fn domains(&self) -> Vec<String> {
    self.state().domains.domains().to_vec()
  }

  pub fn selected_domain(&self) -> String {
    self.state().selected_domain.clone()
  }

  pub fn search_query(&self) -> Option<String> {
    self.state().search_query.clone()
  }

  pub fn is_searching(&self) -> bool {
    self.state().searching
  }

  pub fn catalog(&self) -> Vec<Story> {
    self.state().catalog.stories().to_vec()
  }

  /// Look a story up in the display set first (search results need not be in
  /// the catalog), then in the catalog
  pub fn find_story(&self, id: &StoryId) -> Option<Story> {
    let state = self.state();
    state
      .display
      .iter()
      .find(|story| &story.id == id)
      .or_else(|| state.catalog.get(id))
      .cloned()
  }

  pub fn snapshot(&self) -> DiscoverySnapshot {
    let state = self.state();
    DiscoverySnapshot {
      stories: state.display.clone(),
      source: state.source(),
      domains: state.domains.domains().to_vec(),
      selected_domain: state.selected_domain.clone(),
      search_query: state.search_query.clone(),
      is_searching: state.searching,
    }
  }
}
