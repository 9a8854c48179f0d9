//! Raw HTTP client for the console backend.
//!
//! No shell awareness. Makes API calls via reqwest and validates
//! the response shape of each endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::{
    error_text, CodeRequest, ErrorBody, PromptRequest, PromptResponse, PythonOutcome,
    PythonResponse, QueryOutcome, QueryRequest, QueryResponse, SaveScriptRequest,
    ScriptContentResponse, ScriptListResponse, ScriptNameRequest,
};
use super::{Backend, BackendError};

/// HTTP implementation of [`Backend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a client for `base_url` with no request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Create a client that abandons requests after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url.into()),
        })
    }

    /// Build from a validated console config.
    pub fn from_config(config: &crate::config::ConsoleConfig) -> Result<Self, BackendError> {
        match config.request_timeout_secs {
            Some(secs) => Self::with_timeout(config.backend_url.clone(), Duration::from_secs(secs)),
            None => Ok(Self::new(config.backend_url.clone())),
        }
    }

    /// The base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, BackendError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Ok(response)
    }

    /// Read the body of a 2xx response into `T`, or classify the failure.
    async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, BackendError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(failure_from_body(status.as_u16(), &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| BackendError::InvalidResponse(format!("{path}: {e}")))
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

/// Classify a non-2xx response: a parseable `error` field is reported
/// verbatim, anything else falls back to the status code.
fn failure_from_body(status: u16, body: &str) -> BackendError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => BackendError::Api {
            status,
            message: error_text(&parsed.error),
        },
        Err(_) => BackendError::Status { status },
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_scripts(&self) -> Result<Vec<String>, BackendError> {
        let response = self.http.get(self.url("/scripts/list")).send().await?;
        let list: ScriptListResponse = Self::decode(response, "/scripts/list").await?;
        Ok(list.scripts)
    }

    async fn get_script(&self, name: &str) -> Result<String, BackendError> {
        let response = self.post("/scripts/get", &ScriptNameRequest { name }).await?;
        let script: ScriptContentResponse = Self::decode(response, "/scripts/get").await?;
        Ok(script.content)
    }

    async fn save_script(&self, name: &str, content: &str) -> Result<(), BackendError> {
        let response = self
            .post("/scripts/save", &SaveScriptRequest { name, content })
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(failure_from_body(status.as_u16(), &body));
        }
        // Success body is ignored.
        Ok(())
    }

    async fn run_query(&self, query: &str) -> Result<QueryOutcome, BackendError> {
        let response = self.post("/db/query", &QueryRequest { query }).await?;
        let status = response.status().as_u16();
        match Self::decode::<QueryResponse>(response, "/db/query").await? {
            QueryResponse::Rows { results } => Ok(QueryOutcome::Rows(results)),
            QueryResponse::Executed {
                message,
                rows_affected,
            } => Ok(QueryOutcome::Executed {
                message,
                rows_affected,
            }),
            QueryResponse::Failed { error } => Err(BackendError::Api {
                status,
                message: error_text(&error),
            }),
        }
    }

    async fn test_prompt(&self, prompt: &str) -> Result<String, BackendError> {
        let response = self.post("/prompt/test", &PromptRequest { prompt }).await?;
        let reply: PromptResponse = Self::decode(response, "/prompt/test").await?;
        Ok(reply.response)
    }

    async fn run_python(&self, code: &str) -> Result<PythonOutcome, BackendError> {
        let response = self.post("/python/run", &CodeRequest { code }).await?;
        let status = response.status();
        let body = response.text().await?;

        // The backend reports execution problems as `{error}`, sometimes
        // with a 4xx/5xx status. Either way it is a reported error.
        if let Ok(parsed) = serde_json::from_str::<PythonResponse>(&body) {
            if let Some(error) = parsed.error {
                return Ok(PythonOutcome::Error(error_text(&error)));
            }
            if status.is_success() {
                return match parsed.output {
                    Some(output) => Ok(PythonOutcome::Output(output)),
                    None => Err(BackendError::InvalidResponse(
                        "/python/run: expected `output` or `error`".into(),
                    )),
                };
            }
        }

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }
        Err(BackendError::InvalidResponse(
            "/python/run: body is not a JSON object".into(),
        ))
    }
}
