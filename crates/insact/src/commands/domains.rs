use anyhow::Result;

use crate::display;
use crate::explorer::Explorer;

pub async fn handle(explorer: &Explorer) -> Result<()> {
  explorer.start().await;

  let discovery = explorer.discovery();
  display::print_domains(&discovery.domains(), &discovery.selected_domain());
  Ok(())
}
