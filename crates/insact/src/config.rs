//! Configuration for insact
//!
//! Layered lowest to highest: built-in defaults, a YAML file, the
//! `INSACT_API_URL` environment variable, then whatever the CLI passes in.
//! The resulting [`ApiConfig`] is the only place the backend address lives.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "INSACT_CONFIG";
pub const API_URL_ENV: &str = "INSACT_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the stories backend (e.g., "http://127.0.0.1:8000")
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Request timeout in seconds
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_base_url() -> String {
  "http://127.0.0.1:8000".to_string()
}
fn default_timeout_secs() -> u64 {
  30
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self { base_url: default_base_url(), timeout_secs: default_timeout_secs() }
  }
}

impl Config {
  /// Load from an explicit path, or from the default location when there is one
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    let mut config = match explicit {
      Some(path) => Self::load_from_file(path)?,
      None => match default_config_path() {
        Some(path) if path.exists() => Self::load_from_file(&path)?,
        _ => Self::default(),
      },
    };

    if let Ok(url) = std::env::var(API_URL_ENV) {
      config.override_base_url(&url);
    }

    Ok(config)
  }

  pub fn load_from_file(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file {}", path.display()))?;
    Self::from_yaml(&content).with_context(|| format!("Invalid config file {}", path.display()))
  }

  pub fn from_yaml(content: &str) -> Result<Self> {
    if content.trim().is_empty() {
      return Ok(Self::default());
    }
    Ok(serde_yaml::from_str(content)?)
  }

  /// Replace the backend URL, ignoring blank values
  pub fn override_base_url(&mut self, url: &str) {
    let url = url.trim();
    if !url.is_empty() {
      self.api.base_url = url.to_string();
    }
  }
}

/// `$INSACT_CONFIG`, else `~/.insact/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
  if let Ok(path) = std::env::var(CONFIG_ENV) {
    if !path.trim().is_empty() {
      return Some(PathBuf::from(path));
    }
  }
  dirs::home_dir().map(|home| home.join(".insact").join("config.yaml"))
}
