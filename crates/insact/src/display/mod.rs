use chrono::{DateTime, Local};
use colored::*;

use crate::catalog::ALL_DOMAINS;
use crate::discovery::DiscoverySnapshot;
use crate::session::{ChatMessage, EnrichmentState, Sender, SessionSnapshot};
use crate::story::{EnrichedStory, Story};

const WIDTH: usize = 80;

/// Word-wrap a paragraph to `width` columns
pub fn wrap(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();
  for paragraph in text.lines() {
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
      if !current.is_empty() && current.len() + word.len() + 1 > width {
        lines.push(std::mem::take(&mut current));
      }
      if !current.is_empty() {
        current.push(' ');
      }
      current.push_str(word);
    }
    lines.push(current);
  }
  lines
}

/// Convert an ISO-8601 timestamp to local time, leaving unparseable input as is
pub fn format_timestamp(timestamp: &str) -> String {
  match DateTime::parse_from_rfc3339(timestamp) {
    Ok(time) => time.with_timezone(&Local).format("%H:%M:%S").to_string(),
    Err(_) => timestamp.to_string(),
  }
}

/// "Showing N opportunities in D for "Q"", qualifiers only when they apply
pub fn results_count(count: usize, selected_domain: &str, search_query: Option<&str>) -> String {
  let mut line = format!("Showing {count} opportunities");
  if selected_domain != ALL_DOMAINS {
    line.push_str(&format!(" in {selected_domain}"));
  }
  if let Some(query) = search_query {
    line.push_str(&format!(" for \"{query}\""));
  }
  line
}

/// Heading and hint shown when the list is empty
pub fn empty_state(selected_domain: &str, search_query: Option<&str>) -> (String, String) {
  match search_query {
    Some(query) => (
      format!("No opportunities found for \"{query}\""),
      "Try a different search term or explore other domains".to_string(),
    ),
    None => (
      format!("No stories in {selected_domain}"),
      "Try selecting a different domain or search for opportunities".to_string(),
    ),
  }
}

pub fn format_story_card(story: &Story) -> String {
  let mut card = format!("[{}] {}", story.id, story.title.bold());
  if !story.domain.is_empty() {
    card.push_str(&format!("  ({})", story.domain.cyan()));
  }
  for line in wrap(&story.preview, WIDTH - 4) {
    if !line.is_empty() {
      card.push_str(&format!("\n    {}", line.dimmed()));
    }
  }
  card
}

pub fn print_story_list(snapshot: &DiscoverySnapshot) {
  let query = snapshot.search_query.as_deref();

  if let Some(query) = query {
    println!("{}", format!("Search results for \"{query}\"").blue().bold());
    if snapshot.is_searching {
      println!("{}", "Finding relevant opportunities...".yellow());
    }
    println!();
  }

  if snapshot.stories.is_empty() {
    let (heading, hint) = empty_state(&snapshot.selected_domain, query);
    println!("{}", heading.bold());
    println!("{}", hint.dimmed());
    return;
  }

  for story in &snapshot.stories {
    println!("{}", format_story_card(story));
    println!();
  }
  println!(
    "{}",
    results_count(snapshot.stories.len(), &snapshot.selected_domain, query).dimmed()
  );
}

pub fn print_domains(domains: &[String], selected: &str) {
  for domain in domains {
    if domain == selected {
      println!("{} {}", "*".green(), domain.green().bold());
    } else {
      println!("  {domain}");
    }
  }
}

/// Line shown in place of the enrichment sections, if they are not shown
pub fn enrichment_notice(story: &EnrichedStory, state: EnrichmentState) -> Option<&'static str> {
  match state {
    EnrichmentState::Loading => Some("Loading enrichment..."),
    EnrichmentState::Fallback => Some("Enriched content is unavailable right now."),
    EnrichmentState::Loaded if !story.has_enrichment() => {
      Some("No additional insights for this story yet.")
    }
    EnrichmentState::Loaded => None,
  }
}

fn print_section(title: &str, body: &str) {
  println!();
  println!("{}", title.bold());
  for line in wrap(body, WIDTH) {
    println!("{line}");
  }
}

pub fn print_story_detail(story: &EnrichedStory, enrichment: EnrichmentState) {
  let base = &story.story;
  println!("{}", "-".repeat(WIDTH));
  println!("{}  {}", base.title.bold(), format!("({})", base.domain).cyan());
  println!("{}", "-".repeat(WIDTH));

  print_section("The Opportunity", &base.opportunity);
  print_section("Current Approaches", &base.gaps);
  print_section("Your Project Opportunity", &base.solution);

  if let Some(notice) = enrichment_notice(story, enrichment) {
    println!();
    match enrichment {
      EnrichmentState::Loading => println!("{}", notice.yellow()),
      EnrichmentState::Loaded | EnrichmentState::Fallback => println!("{}", notice.dimmed()),
    }
    return;
  }

  let enrichment = story.enrichment();

  if let Some(startups) = &enrichment.related_startups {
    println!();
    println!("{}", "Startups in This Space".bold());
    for startup in startups {
      println!("  {} - {}", startup.name.green(), startup.description);
      if !startup.approach.is_empty() {
        println!("    {}", startup.approach.dimmed());
      }
    }
  }

  if let Some(papers) = &enrichment.research_papers {
    println!();
    println!("{}", "Related Research".bold());
    for paper in papers {
      println!("  {}", paper.title.green());
      println!("    Focus: {}", paper.focus);
      println!("    Key Findings: {}", paper.key_findings);
    }
  }

  if let Some(steps) = &enrichment.implementation_guide {
    println!();
    println!("{}", "Implementation Guide".bold());
    for (index, step) in steps.iter().enumerate() {
      println!("  {}. {step}", index + 1);
    }
  }
}

pub fn format_message(message: &ChatMessage) -> String {
  let who = match message.sender {
    Sender::User => "you".blue().bold(),
    Sender::Assistant => "assistant".magenta().bold(),
  };
  format!("[{}] {}: {}", format_timestamp(&message.timestamp).dimmed(), who, message.text)
}

pub fn print_transcript(messages: &[ChatMessage]) {
  for message in messages {
    println!("{}", format_message(message));
  }
}

pub fn print_session(snapshot: &SessionSnapshot) {
  print_story_detail(&snapshot.story, snapshot.enrichment);
  if !snapshot.messages.is_empty() {
    println!();
    print_transcript(&snapshot.messages);
  }
}
