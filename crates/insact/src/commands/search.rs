use anyhow::{anyhow, Result};

use crate::display;
use crate::explorer::Explorer;

pub async fn handle(explorer: &Explorer, terms: Vec<String>) -> Result<()> {
  let query = terms.join(" ");
  if query.trim().is_empty() {
    return Err(anyhow!("Search query cannot be empty"));
  }

  explorer.discovery().search(&query).await;
  display::print_story_list(&explorer.discovery().snapshot());
  Ok(())
}
