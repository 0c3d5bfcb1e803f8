use anyhow::{anyhow, Result};

use crate::display;
use crate::explorer::Explorer;
use crate::story::StoryId;

pub async fn handle(explorer: &Explorer, id: StoryId, words: Vec<String>) -> Result<()> {
  let message = words.join(" ");
  if message.trim().is_empty() {
    return Err(anyhow!("Message cannot be empty"));
  }

  explorer.start().await;
  if !explorer.select(&id).await {
    return Err(anyhow!("Story {id} not found"));
  }

  let session = explorer.session();
  session.send_message(&message).await;
  display::print_transcript(&session.transcript());
  Ok(())
}
