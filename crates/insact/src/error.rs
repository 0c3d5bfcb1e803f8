use thiserror::Error;

/// Failures talking to the stories backend.
///
/// Every variant is a transient fetch failure from the controllers' point of
/// view: they log it and degrade, they never hand it to the caller.
#[derive(Error, Debug)]
pub enum ApiError {
  #[error("Invalid backend URL '{base}': {reason}")]
  InvalidBaseUrl { base: String, reason: String },

  #[error("Failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("Request to {url} failed: {source}")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("Request to {url} timed out after {secs}s")]
  Timeout { url: String, secs: u64 },

  #[error("{url} returned HTTP {status}: {body}")]
  Status { url: String, status: u16, body: String },

  #[error("Failed to decode response from {url}: {source}")]
  Decode {
    url: String,
    #[source]
    source: serde_json::Error,
  },
}

impl ApiError {
  pub fn invalid_base_url(base: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::InvalidBaseUrl { base: base.into(), reason: reason.into() }
  }

  /// HTTP status code, when the backend answered at all
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Status { status, .. } => Some(*status),
      _ => None,
    }
  }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
