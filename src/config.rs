//! Explicit configuration for the backend client and the test writer.
//!
//! Nothing reads settings from a global store; callers build a
//! `GuardianConfig` (from defaults, a TOML file, or env overrides) and hand it
//! to the components that need it.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GuardianError, Result};

// ============ Defaults ============

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
pub const DEFAULT_TEST_DIRECTORY: &str = "__tests__";
pub const DEFAULT_FILE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_FUNCTION_TIMEOUT_SECS: u64 = 30;

pub const ENV_BACKEND_URL: &str = "GUARDIAN_BACKEND_URL";
pub const ENV_TEST_DIRECTORY: &str = "GUARDIAN_TEST_DIRECTORY";

// ============ Config ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuardianConfig {
    /// Base URL of the test-generation backend
    pub backend_url: String,
    /// Directory, relative to the source file, that receives generated tests
    pub test_directory: String,
    /// Timeout for whole-file generation
    pub file_timeout_secs: u64,
    /// Timeout for single-function generation
    pub function_timeout_secs: u64,
    /// Fall back to a basic template when the backend is unreachable
    pub template_fallback: bool,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            test_directory: DEFAULT_TEST_DIRECTORY.to_string(),
            file_timeout_secs: DEFAULT_FILE_TIMEOUT_SECS,
            function_timeout_secs: DEFAULT_FUNCTION_TIMEOUT_SECS,
            template_fallback: true,
        }
    }
}

impl GuardianConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(input: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw).map_err(|source| GuardianError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), backend_url = %config.backend_url, "loaded config");
        Ok(config)
    }

    /// Apply `GUARDIAN_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; empty values are ignored
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_BACKEND_URL) {
            self.backend_url = url;
        }
        if let Some(dir) = get(ENV_TEST_DIRECTORY) {
            self.test_directory = dir;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://")) {
            return Err(GuardianError::Config(format!(
                "backendUrl must start with http:// or https://, got '{}'",
                self.backend_url
            )));
        }
        if self.test_directory.trim().is_empty() {
            return Err(GuardianError::Config("testDirectory must not be empty".to_string()));
        }
        if self.file_timeout_secs == 0 || self.function_timeout_secs == 0 {
            return Err(GuardianError::Config("timeouts must be at least one second".to_string()));
        }
        Ok(())
    }

    pub fn file_timeout(&self) -> Duration {
        Duration::from_secs(self.file_timeout_secs)
    }

    pub fn function_timeout(&self) -> Duration {
        Duration::from_secs(self.function_timeout_secs)
    }

    /// Full URL of the generation endpoint
    pub fn generate_tests_url(&self) -> String {
        format!("{}/api/generate-tests", self.backend_url.trim_end_matches('/'))
    }
}
