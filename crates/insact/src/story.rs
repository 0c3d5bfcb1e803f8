//! Story data model
//!
//! The backend serves two near-identical story shapes: newer records use
//! `opportunity`/`gaps`, older ones `problem`/`pathway`. Both are folded into
//! one canonical [`Story`] while deserializing, so nothing past this module
//! ever branches on field names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque story identifier, kept in the form the backend sent it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoryId {
  Number(i64),
  Text(String),
}

impl fmt::Display for StoryId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StoryId::Number(n) => write!(f, "{n}"),
      StoryId::Text(s) => f.write_str(s),
    }
  }
}

impl FromStr for StoryId {
  type Err = std::convert::Infallible;

  /// Only text that prints back unchanged becomes a number, so "007" and
  /// "+5" stay text ids
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    Ok(match s.parse::<i64>() {
      Ok(n) if n.to_string() == s => StoryId::Number(n),
      _ => StoryId::Text(s.to_string()),
    })
  }
}

impl From<i64> for StoryId {
  fn from(n: i64) -> Self {
    StoryId::Number(n)
  }
}

impl From<&str> for StoryId {
  fn from(s: &str) -> Self {
    StoryId::Text(s.to_string())
  }
}

/// A catalog entry describing a problem/opportunity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireStory")]
pub struct Story {
  pub id: StoryId,
  pub title: String,
  pub preview: String,
  pub domain: String,
  pub opportunity: String,
  pub gaps: String,
  pub solution: String,
}

/// Story as it appears on the wire, every text field optional
#[derive(Deserialize)]
struct WireStory {
  id: StoryId,
  title: Option<String>,
  preview: Option<String>,
  domain: Option<String>,
  opportunity: Option<String>,
  problem: Option<String>,
  gaps: Option<String>,
  pathway: Option<String>,
  solution: Option<String>,
}

/// First non-empty candidate, or the empty string
fn prefer(primary: Option<String>, fallback: Option<String>) -> String {
  primary.filter(|s| !s.is_empty()).or(fallback).unwrap_or_default()
}

impl From<WireStory> for Story {
  fn from(wire: WireStory) -> Self {
    Self {
      id: wire.id,
      title: wire.title.unwrap_or_default(),
      preview: wire.preview.unwrap_or_default(),
      domain: wire.domain.unwrap_or_default(),
      opportunity: prefer(wire.opportunity, wire.problem),
      gaps: prefer(wire.gaps, wire.pathway),
      solution: wire.solution.unwrap_or_default(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Startup {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub approach: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchPaper {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub focus: String,
  #[serde(default)]
  pub key_findings: String,
}

/// Generated supplementary content. Each section is independently optional
/// and an absent section is simply not shown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub related_startups: Option<Vec<Startup>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub research_papers: Option<Vec<ResearchPaper>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub implementation_guide: Option<Vec<String>>,
}

impl Enrichment {
  pub fn is_empty(&self) -> bool {
    self.related_startups.is_none()
      && self.research_papers.is_none()
      && self.implementation_guide.is_none()
  }
}

/// A story plus whatever enrichment the backend could produce for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedStory {
  #[serde(flatten)]
  pub story: Story,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub enrichment: Option<Enrichment>,
}

impl EnrichedStory {
  /// Enrichment sections, treating a missing record as an empty one
  pub fn enrichment(&self) -> Enrichment {
    self.enrichment.clone().unwrap_or_default()
  }

  pub fn has_enrichment(&self) -> bool {
    self.enrichment.as_ref().is_some_and(|e| !e.is_empty())
  }
}

impl From<Story> for EnrichedStory {
  fn from(story: Story) -> Self {
    Self { story, enrichment: None }
  }
}
