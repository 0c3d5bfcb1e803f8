use anyhow::Result;

use crate::display;
use crate::explorer::Explorer;

pub async fn handle(explorer: &Explorer, domain: Option<String>) -> Result<()> {
  explorer.start().await;

  let discovery = explorer.discovery();
  if let Some(domain) = domain {
    discovery.filter_by_domain(&domain);
  }

  display::print_story_list(&discovery.snapshot());
  Ok(())
}
