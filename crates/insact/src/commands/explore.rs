//! Interactive explore loop
//!
//! Reads one line at a time from stdin. Slash commands drive navigation;
//! plain text searches from the list view and chats from the detail view.

use anyhow::Result;
use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::display;
use crate::explorer::Explorer;
use crate::session::View;
use crate::story::StoryId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
  Empty,
  Help,
  Quit,
  List,
  Domains,
  Domain(String),
  Search(String),
  Clear,
  Open(StoryId),
  Back,
  Text(String),
  Unknown(String),
}

pub fn parse_line(line: &str) -> ReplCommand {
  let line = line.trim();
  if line.is_empty() {
    return ReplCommand::Empty;
  }
  let Some(command) = line.strip_prefix('/') else {
    return ReplCommand::Text(line.to_string());
  };

  let (name, rest) = match command.split_once(char::is_whitespace) {
    Some((name, rest)) => (name, rest.trim()),
    None => (command, ""),
  };

  match (name, rest) {
    ("help" | "h", _) => ReplCommand::Help,
    ("quit" | "q" | "exit", _) => ReplCommand::Quit,
    ("list" | "ls", _) => ReplCommand::List,
    ("domains", _) => ReplCommand::Domains,
    ("domain" | "d", domain) if !domain.is_empty() => ReplCommand::Domain(domain.to_string()),
    ("search" | "s", query) => ReplCommand::Search(query.to_string()),
    ("clear", _) => ReplCommand::Clear,
    ("open" | "o", id) if !id.is_empty() => match id.parse() {
      Ok(id) => ReplCommand::Open(id),
      Err(e) => match e {},
    },
    ("back" | "b", _) => ReplCommand::Back,
    _ => ReplCommand::Unknown(line.to_string()),
  }
}

fn print_help() {
  println!("{}", "Commands:".bold());
  println!("  /list             show the current list");
  println!("  /domains          show available domains");
  println!("  /domain <name>    filter by domain (clears any search)");
  println!("  /search <query>   smart search (blank query clears it)");
  println!("  /clear            clear the search");
  println!("  /open <id>        open a story");
  println!("  /back             return to the list");
  println!("  /quit             leave");
  println!("Plain text searches from the list and chats from a story.");
}

pub async fn handle(explorer: &Explorer) -> Result<()> {
  explorer.start().await;
  display::print_story_list(&explorer.discovery().snapshot());
  println!();
  print_help();

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  while let Some(line) = lines.next_line().await? {
    if !dispatch(explorer, parse_line(&line)).await {
      break;
    }
  }

  Ok(())
}

/// Apply one command; false means leave the loop
async fn dispatch(explorer: &Explorer, command: ReplCommand) -> bool {
  let discovery = explorer.discovery();
  let session = explorer.session();

  match command {
    ReplCommand::Empty => {}
    ReplCommand::Help => print_help(),
    ReplCommand::Quit => return false,
    ReplCommand::List => {
      if explorer.view() == View::Detail {
        explorer.back();
      }
      display::print_story_list(&discovery.snapshot());
    }
    ReplCommand::Domains => {
      display::print_domains(&discovery.domains(), &discovery.selected_domain())
    }
    ReplCommand::Domain(domain) => {
      explorer.back();
      discovery.filter_by_domain(&domain);
      display::print_story_list(&discovery.snapshot());
    }
    ReplCommand::Search(query) => {
      explorer.back();
      discovery.search(&query).await;
      display::print_story_list(&discovery.snapshot());
    }
    ReplCommand::Clear => {
      discovery.clear_search();
      display::print_story_list(&discovery.snapshot());
    }
    ReplCommand::Open(id) => {
      if explorer.select(&id).await {
        if let Some(snapshot) = session.snapshot() {
          display::print_session(&snapshot);
        }
      } else {
        println!("{}", format!("Story {id} not found").red());
      }
    }
    ReplCommand::Back => {
      explorer.back();
      display::print_story_list(&discovery.snapshot());
    }
    ReplCommand::Text(text) => match explorer.view() {
      View::Discovery => {
        discovery.search(&text).await;
        display::print_story_list(&discovery.snapshot());
      }
      View::Detail => {
        let seen = session.transcript().len();
        session.send_message(&text).await;
        for message in session.transcript().iter().skip(seen) {
          println!("{}", display::format_message(message));
        }
      }
    },
    ReplCommand::Unknown(line) => {
      println!("{}", format!("Unknown command: {line} (try /help)").yellow())
    }
  }

  true
}
