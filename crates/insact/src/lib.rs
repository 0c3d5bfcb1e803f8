//! InsAct - Opportunity Story Explorer
//!
//! Client-side state for browsing a catalog of opportunity stories: filtering
//! by domain, smart search, an enriched detail view, and a chat about the
//! open story. Every backend failure degrades to a reduced view and is only
//! reported through `tracing`.

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod display;
pub mod error;
pub mod explorer;
pub mod session;
pub mod story;

// Re-export commonly used types for easier testing
pub use api::{HttpStoryApi, StoryApi};
pub use catalog::{DomainIndex, StoryCatalog, ALL_DOMAINS};
pub use discovery::{DiscoveryController, DisplaySource};
pub use error::{ApiError, ApiResult};
pub use explorer::Explorer;
pub use session::{ChatMessage, SessionController, SessionState, View};
pub use story::{EnrichedStory, Story, StoryId};
