use anyhow::{anyhow, Result};

use crate::display;
use crate::explorer::Explorer;
use crate::story::StoryId;

pub async fn handle(explorer: &Explorer, id: StoryId) -> Result<()> {
  explorer.start().await;

  if !explorer.select(&id).await {
    return Err(anyhow!("Story {id} not found"));
  }

  let snapshot =
    explorer.session().snapshot().ok_or_else(|| anyhow!("Story {id} was closed unexpectedly"))?;
  display::print_session(&snapshot);
  Ok(())
}
