use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Shown in place of a reply when the chat request fails
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble responding right now. Please try again!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
  User,
  Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub id: MessageId,
  pub text: String,
  pub sender: Sender,
  /// ISO-8601 timestamp, local or as the backend reported it
  pub timestamp: String,
}

/// Append-only chat log for one session.
///
/// Ids are handed out by the transcript itself, so two messages created in
/// the same instant still sort in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
  messages: Vec<ChatMessage>,
  last_id: u64,
}

impl ChatTranscript {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn append(
    &mut self,
    sender: Sender,
    text: impl Into<String>,
    timestamp: impl Into<String>,
  ) -> &ChatMessage {
    self.last_id += 1;
    self.messages.push(ChatMessage {
      id: MessageId(self.last_id),
      text: text.into(),
      sender,
      timestamp: timestamp.into(),
    });
    &self.messages[self.messages.len() - 1]
  }

  pub fn messages(&self) -> &[ChatMessage] {
    &self.messages
  }

  pub fn len(&self) -> usize {
    self.messages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.messages.is_empty()
  }
}

/// Current time as an RFC 3339 UTC string with millisecond precision
pub fn now_timestamp() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ids_strictly_increase() {
    let mut transcript = ChatTranscript::new();
    let stamp = now_timestamp();
    transcript.append(Sender::User, "one", stamp.clone());
    transcript.append(Sender::Assistant, "two", stamp.clone());
    transcript.append(Sender::User, "three", stamp);

    let ids: Vec<u64> = transcript.messages().iter().map(|m| m.id.0).collect();
    assert_eq!(ids, [1, 2, 3]);
  }

  #[test]
  fn test_append_returns_stored_message() {
    let mut transcript = ChatTranscript::new();
    let message = transcript.append(Sender::Assistant, "hello", "2025-01-01T00:00:00Z");
    assert_eq!(message.text, "hello");
    assert_eq!(message.sender, Sender::Assistant);
    assert_eq!(transcript.len(), 1);
  }

  #[test]
  fn test_sender_serializes_lowercase() {
    let mut transcript = ChatTranscript::new();
    transcript.append(Sender::User, "hi", "t");
    let value = serde_json::to_value(&transcript.messages()[0]).unwrap();
    assert_eq!(value["sender"], "user");
    assert_eq!(value["id"], 1);
  }

  #[test]
  fn test_now_timestamp_is_utc_millis() {
    let stamp = now_timestamp();
    assert!(stamp.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    assert_eq!(stamp.len(), "2025-01-01T00:00:00.000Z".len());
  }
}
