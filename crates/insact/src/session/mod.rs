//! Story detail sessions
//!
//! A session is the lifetime of one open detail view: the story, its
//! enrichment state and its chat transcript. Opening a story replaces any
//! previous session; going back discards it.
//!
//! Every async response carries the generation of the session that issued it
//! and is dropped if that session is no longer the open one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::{ChatRequest, ChatResponse, StoryApi};
use crate::error::ApiResult;
use crate::story::{EnrichedStory, Story, StoryId};

pub mod transcript;

pub use transcript::{ChatMessage, ChatTranscript, MessageId, Sender, FALLBACK_REPLY};

use transcript::now_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
  Idle,
  Loading,
  Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentState {
  Loading,
  Loaded,
  /// Enrichment could not be fetched; the base story is shown instead
  Fallback,
}

/// Which screen the user is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
  Discovery,
  Detail,
}

/// Point-in-time copy of an open session
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
  pub story: EnrichedStory,
  pub enrichment: EnrichmentState,
  pub messages: Vec<ChatMessage>,
  pub is_loading: bool,
}

struct Session {
  generation: u64,
  base: Story,
  enriched: Option<EnrichedStory>,
  enrichment: EnrichmentState,
  transcript: ChatTranscript,
  // Serializes chat requests so replies land in the order they were asked
  chat_gate: Arc<tokio::sync::Mutex<()>>,
  pending_chats: usize,
}

impl Session {
  fn new(generation: u64, base: Story) -> Self {
    Self {
      generation,
      base,
      enriched: None,
      enrichment: EnrichmentState::Loading,
      transcript: ChatTranscript::new(),
      chat_gate: Arc::new(tokio::sync::Mutex::new(())),
      pending_chats: 0,
    }
  }

  fn story(&self) -> EnrichedStory {
    self.enriched.clone().unwrap_or_else(|| EnrichedStory::from(self.base.clone()))
  }

  fn is_loading(&self) -> bool {
    self.enrichment == EnrichmentState::Loading || self.pending_chats > 0
  }
}

#[derive(Default)]
struct SessionSlot {
  generation: u64,
  latest_ticket: u64,
  session: Option<Session>,
}

impl SessionSlot {
  fn current_mut(&mut self, generation: u64) -> Option<&mut Session> {
    self.session.as_mut().filter(|session| session.generation == generation)
  }

  fn reserve(&mut self) -> OpenTicket {
    self.latest_ticket += 1;
    OpenTicket(self.latest_ticket)
  }
}

fn lock(slot: &Mutex<SessionSlot>) -> MutexGuard<'_, SessionSlot> {
  slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Claim on a future [`SessionController::open_reserved`]. It goes stale once
/// a newer ticket is taken; `open` and `back` both take one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenTicket(u64);

/// Settles the enrichment state if the open is dropped before its response
struct PendingEnrichment {
  slot: Arc<Mutex<SessionSlot>>,
  generation: u64,
}

impl Drop for PendingEnrichment {
  fn drop(&mut self) {
    let mut slot = lock(&self.slot);
    if let Some(session) = slot.current_mut(self.generation) {
      if session.enrichment == EnrichmentState::Loading {
        tracing::warn!("Enrichment for story {} was cancelled, showing base story", session.base.id);
        session.enrichment = EnrichmentState::Fallback;
      }
    }
  }
}

/// Counts one outstanding chat reply for as long as the send is alive
struct PendingChat {
  slot: Arc<Mutex<SessionSlot>>,
  generation: u64,
}

impl Drop for PendingChat {
  fn drop(&mut self) {
    if let Some(session) = lock(&self.slot).current_mut(self.generation) {
      session.pending_chats = session.pending_chats.saturating_sub(1);
    }
  }
}

/// Drives the detail view. Cheap to clone; clones share the open session.
#[derive(Clone)]
pub struct SessionController {
  api: Arc<dyn StoryApi>,
  slot: Arc<Mutex<SessionSlot>>,
}

impl SessionController {
  pub fn new(api: Arc<dyn StoryApi>) -> Self {
    Self { api, slot: Arc::new(Mutex::new(SessionSlot::default())) }
  }

  fn slot(&self) -> MutexGuard<'_, SessionSlot> {
    lock(&self.slot)
  }

  fn is_current(&self, generation: u64) -> bool {
    self.slot().generation == generation
  }

  /// Reserve the right to open a story later, e.g. while it is still being
  /// looked up. Invalidates every earlier ticket.
  pub fn reserve(&self) -> OpenTicket {
    self.slot().reserve()
  }

  /// Open the detail view for `story` and fetch its enrichment. If the fetch
  /// fails the session still becomes ready, showing `story` as given.
  pub async fn open(&self, story: Story) {
    let ticket = self.reserve();
    self.open_reserved(ticket, story).await;
  }

  /// Like [`open`](SessionController::open), but only if `ticket` is still
  /// the latest reservation. Returns false when it was superseded.
  pub async fn open_reserved(&self, ticket: OpenTicket, story: Story) -> bool {
    let generation = {
      let mut slot = self.slot();
      if slot.latest_ticket != ticket.0 {
        tracing::debug!("Not opening story {}, a newer selection won", story.id);
        return false;
      }
      slot.generation += 1;
      let generation = slot.generation;
      if let Some(previous) = slot.session.replace(Session::new(generation, story.clone())) {
        tracing::debug!("Replacing open session for story {}", previous.base.id);
      }
      generation
    };
    tracing::info!("Opening story {}", story.id);

    let _pending = PendingEnrichment { slot: Arc::clone(&self.slot), generation };
    let result = self.api.get_enriched_story(&story.id).await;
    self.apply_enrichment(generation, &story.id, result);
    true
  }

  fn apply_enrichment(&self, generation: u64, id: &StoryId, result: ApiResult<EnrichedStory>) {
    let mut slot = self.slot();
    let Some(session) = slot.current_mut(generation) else {
      tracing::debug!(generation, "discarding enrichment for a closed session");
      return;
    };

    match result {
      Ok(enriched) => {
        session.enriched = Some(enriched);
        session.enrichment = EnrichmentState::Loaded;
      }
      Err(e) => {
        tracing::warn!("Failed to load enriched story {id}, showing base story: {e}");
        session.enrichment = EnrichmentState::Fallback;
      }
    }
  }

  /// Close the detail view, discarding enrichment and transcript
  pub fn back(&self) {
    let mut slot = self.slot();
    slot.generation += 1;
    slot.reserve();
    if let Some(session) = slot.session.take() {
      tracing::info!("Closed story {}", session.base.id);
    }
  }

  /// Send a chat message about the open story.
  ///
  /// The user's message is appended before anything is sent and is never
  /// retracted. The reply, or a fixed apology if the request fails, follows
  /// it. Requests within one session go out one at a time in the order they
  /// were sent. Dropping the returned future abandons the reply.
  pub async fn send_message(&self, text: &str) {
    if text.trim().is_empty() {
      return;
    }

    let (generation, story_id, gate) = {
      let mut slot = self.slot();
      let Some(session) = slot.session.as_mut() else {
        tracing::warn!("No open story to chat about");
        return;
      };
      session.transcript.append(Sender::User, text, now_timestamp());
      session.pending_chats += 1;
      (session.generation, session.base.id.clone(), Arc::clone(&session.chat_gate))
    };
    let _pending = PendingChat { slot: Arc::clone(&self.slot), generation };

    let _turn = gate.lock().await;
    if !self.is_current(generation) {
      tracing::debug!(generation, "session closed before chat request was sent");
      return;
    }

    let request = ChatRequest { message: text.to_string(), story_id };
    let result = self.api.chat(&request).await;
    self.apply_reply(generation, &request.story_id, result);
  }

  fn apply_reply(&self, generation: u64, id: &StoryId, result: ApiResult<ChatResponse>) {
    let mut slot = self.slot();
    let Some(session) = slot.current_mut(generation) else {
      tracing::debug!(generation, "discarding chat reply for a closed session");
      return;
    };

    match result {
      Ok(reply) => {
        let timestamp = reply.timestamp.filter(|t| !t.is_empty()).unwrap_or_else(now_timestamp);
        session.transcript.append(Sender::Assistant, reply.response, timestamp);
      }
      Err(e) => {
        tracing::error!("Chat about story {id} failed: {e}");
        session.transcript.append(Sender::Assistant, FALLBACK_REPLY, now_timestamp());
      }
    }
  }

  pub fn state(&self) -> SessionState {
    match &self.slot().session {
      None => SessionState::Idle,
      Some(session) if session.enrichment == EnrichmentState::Loading => SessionState::Loading,
      Some(_) => SessionState::Ready,
    }
  }

  pub fn view(&self) -> View {
    match self.state() {
      SessionState::Idle => View::Discovery,
      SessionState::Loading | SessionState::Ready => View::Detail,
    }
  }

  /// True while enrichment or any chat reply is outstanding
  pub fn is_loading(&self) -> bool {
    self.slot().session.as_ref().is_some_and(Session::is_loading)
  }

  pub fn story_id(&self) -> Option<StoryId> {
    self.slot().session.as_ref().map(|session| session.base.id.clone())
  }

  /// The story as it should be shown: enriched when loaded, base otherwise
  pub fn story(&self) -> Option<EnrichedStory> {
    self.slot().session.as_ref().map(Session::story)
  }

  pub fn enrichment_state(&self) -> Option<EnrichmentState> {
    self.slot().session.as_ref().map(|session| session.enrichment)
  }

  /// Messages of the open session, empty when none is open
  pub fn transcript(&self) -> Vec<ChatMessage> {
    self
      .slot()
      .session
      .as_ref()
      .map(|session| session.transcript.messages().to_vec())
      .unwrap_or_default()
  }

  pub fn snapshot(&self) -> Option<SessionSnapshot> {
    self.slot().session.as_ref().map(|session| SessionSnapshot {
      story: session.story(),
      enrichment: session.enrichment,
      messages: session.transcript.messages().to_vec(),
      is_loading: session.is_loading(),
    })
  }
}
