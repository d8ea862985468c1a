//! Error types for everything outside the locator.
//!
//! The locator itself never fails: "no function here" is `None`.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuardianError {
    /// Config file unreadable, malformed, or with invalid values
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The backend did not answer within the configured timeout
    #[error("Backend request timed out after {}s", .after.as_secs())]
    Timeout { after: Duration },

    /// Nothing is listening at the backend URL
    #[error("Cannot connect to the backend at {url}. Make sure the backend service is running")]
    Unreachable { url: String },

    #[error("Backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Backend returned no test code")]
    EmptyResponse,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GuardianError>;
