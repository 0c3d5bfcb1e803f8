use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use insact::commands;
use insact::config::Config;
use insact::{Explorer, StoryId};

#[derive(Parser)]
#[command(name = "insact")]
#[command(about = "Browse, search and chat about opportunity stories")]
#[command(version)]
struct Cli {
  /// Configuration file (defaults to $INSACT_CONFIG or ~/.insact/config.yaml)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Backend base URL, overriding the configuration file
  #[arg(long, global = true, env = "INSACT_API_URL")]
  api_url: Option<String>,

  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// List stories, optionally limited to one domain
  List {
    /// Domain to show (e.g. "Healthcare")
    #[arg(short, long)]
    domain: Option<String>,
  },
  /// List the available domains
  Domains,
  /// Smart search for opportunities
  Search {
    /// Search terms (space-separated)
    #[arg(required = true)]
    terms: Vec<String>,
  },
  /// Show a story with its enrichment
  Show {
    /// Story identifier
    id: StoryId,
  },
  /// Ask a question about a story
  Chat {
    /// Story identifier
    id: StoryId,
    /// Message text
    #[arg(required = true)]
    message: Vec<String>,
  },
  /// Browse interactively
  Explore,
}

fn init_logging(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("insact=debug,info")
    } else {
      EnvFilter::new("insact=info,warn")
    }
  });

  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let mut config = Config::load(cli.config.as_deref())?;
  if let Some(url) = &cli.api_url {
    config.override_base_url(url);
  }

  let explorer = Explorer::connect(&config.api).context("Failed to set up the stories backend")?;

  match cli.command {
    Commands::List { domain } => commands::list::handle(&explorer, domain).await,
    Commands::Domains => commands::domains::handle(&explorer).await,
    Commands::Search { terms } => commands::search::handle(&explorer, terms).await,
    Commands::Show { id } => commands::show::handle(&explorer, id).await,
    Commands::Chat { id, message } => commands::chat::handle(&explorer, id, message).await,
    Commands::Explore => commands::explore::handle(&explorer).await,
  }
}
