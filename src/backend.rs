//! HTTP client for the test-generation backend.
//!
//! The backend accepts either a whole file or a single located function and
//! answers with `{"testCode": "..."}`. Each request carries its own timeout;
//! running out of time is reported as [`GuardianError::Timeout`] so callers
//! can tell it apart from other failures.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::GuardianConfig;
use crate::error::{GuardianError, Result};
use crate::locator::FunctionInfo;
use crate::templates::{basic_template, TestFramework};

// ============ Wire Types ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileRequest<'a> {
    file_content: &'a str,
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_path: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FunctionPayload<'a> {
    name: &'a str,
    code: &'a str,
    language: &'a str,
    parameters: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    return_type: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestContext<'a> {
    file_path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_structure: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct FunctionRequest<'a> {
    function: FunctionPayload<'a>,
    context: RequestContext<'a>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default, rename = "testCode")]
    test_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

// ============ Result Type ============

/// Where generated test code came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Backend,
    /// Backend unreachable, basic template used instead
    Template,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTests {
    pub test_code: String,
    pub origin: Origin,
}

// ============ Client ============

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    generate_url: String,
    file_timeout: Duration,
    function_timeout: Duration,
    template_fallback: bool,
}

impl BackendClient {
    pub fn new(config: &GuardianConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            generate_url: config.generate_tests_url(),
            file_timeout: config.file_timeout(),
            function_timeout: config.function_timeout(),
            template_fallback: config.template_fallback,
        })
    }

    /// Override the per-request timeouts with sub-second precision
    pub fn with_timeouts(mut self, file: Duration, function: Duration) -> Self {
        self.file_timeout = file;
        self.function_timeout = function;
        self
    }

    /// Generate tests covering every function in a file
    pub async fn generate_for_file(
        &self,
        file_content: &str,
        language: &str,
        file_path: Option<&str>,
    ) -> Result<String> {
        let body = FileRequest {
            file_content,
            language,
            file_path,
        };
        info!(language, ?file_path, "requesting tests for file");
        self.post(&body, self.file_timeout).await
    }

    /// Generate tests for one located function.
    ///
    /// If the backend cannot be reached and template fallback is enabled, a
    /// basic skeleton is returned instead of an error.
    pub async fn generate_for_function(
        &self,
        function: &FunctionInfo,
        file_path: &str,
        project_structure: Option<&str>,
    ) -> Result<GeneratedTests> {
        let body = FunctionRequest {
            function: FunctionPayload {
                name: &function.name,
                code: &function.code,
                language: &function.language,
                parameters: &function.parameters,
                return_type: function.return_type.as_deref(),
            },
            context: RequestContext {
                file_path,
                project_structure,
            },
        };
        info!(name = %function.name, language = %function.language, "requesting tests for function");

        match self.post(&body, self.function_timeout).await {
            Ok(test_code) => Ok(GeneratedTests {
                test_code,
                origin: Origin::Backend,
            }),
            Err(GuardianError::Unreachable { url }) if self.template_fallback => {
                let framework = TestFramework::for_language(&function.language);
                warn!(%url, framework = framework.name(), "backend unreachable, using basic test template");
                Ok(GeneratedTests {
                    test_code: basic_template(function, Some(Path::new(file_path))),
                    origin: Origin::Template,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Whether the backend answers its root endpoint
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/", self.base_url);
        let response = self
            .http
            .get(&url)
            .timeout(self.function_timeout)
            .send()
            .await
            .map_err(|e| self.classify(e, self.function_timeout))?;
        Ok(response.status().is_success())
    }

    async fn post<T: Serialize>(&self, body: &T, timeout: Duration) -> Result<String> {
        debug!(url = %self.generate_url, ?timeout, "POST");
        let response = self
            .http
            .post(&self.generate_url)
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.classify(e, timeout))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.classify(e, timeout))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(GuardianError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_slice(&bytes)?;
        match parsed.test_code {
            Some(code) if !code.trim().is_empty() => Ok(code),
            _ => Err(GuardianError::EmptyResponse),
        }
    }

    fn classify(&self, err: reqwest::Error, timeout: Duration) -> GuardianError {
        if err.is_timeout() {
            GuardianError::Timeout { after: timeout }
        } else if err.is_connect() {
            GuardianError::Unreachable {
                url: self.base_url.clone(),
            }
        } else {
            GuardianError::Http(err)
        }
    }
}
