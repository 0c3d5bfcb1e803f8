use std::collections::BTreeSet;

use crate::story::{Story, StoryId};

/// Wildcard domain that selects the whole catalog
pub const ALL_DOMAINS: &str = "All";

/// The authoritative story list fetched at startup
#[derive(Debug, Clone, Default)]
pub struct StoryCatalog {
  stories: Vec<Story>,
}

impl StoryCatalog {
  pub fn new(stories: Vec<Story>) -> Self {
    Self { stories }
  }

  pub fn stories(&self) -> &[Story] {
    &self.stories
  }

  pub fn len(&self) -> usize {
    self.stories.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stories.is_empty()
  }

  pub fn get(&self, id: &StoryId) -> Option<&Story> {
    self.stories.iter().find(|story| &story.id == id)
  }

  /// Stories shown for a domain selection, in catalog order
  pub fn in_domain(&self, domain: &str) -> Vec<Story> {
    if domain == ALL_DOMAINS {
      return self.stories.clone();
    }
    self.stories.iter().filter(|story| story.domain == domain).cloned().collect()
  }
}

/// Sorted, deduplicated domains of a catalog, led by [`ALL_DOMAINS`].
///
/// Always derived from the full catalog, never from a filtered view, so
/// narrowing the display never narrows the choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainIndex {
  domains: Vec<String>,
}

impl Default for DomainIndex {
  fn default() -> Self {
    Self { domains: vec![ALL_DOMAINS.to_string()] }
  }
}

impl DomainIndex {
  pub fn from_catalog(catalog: &StoryCatalog) -> Self {
    let unique: BTreeSet<&str> = catalog
      .stories()
      .iter()
      .map(|story| story.domain.as_str())
      .filter(|domain| !domain.trim().is_empty() && *domain != ALL_DOMAINS)
      .collect();

    let mut domains = Vec::with_capacity(unique.len() + 1);
    domains.push(ALL_DOMAINS.to_string());
    domains.extend(unique.into_iter().map(str::to_string));
    Self { domains }
  }

  pub fn domains(&self) -> &[String] {
    &self.domains
  }

  pub fn contains(&self, domain: &str) -> bool {
    self.domains.iter().any(|d| d == domain)
  }
}
