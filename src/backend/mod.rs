//! Backend access: the six HTTP endpoints the console proxies to.
//!
//! The [`Backend`] trait is the seam between the shell and the network:
//! the TUI runner holds an `Arc<dyn Backend>`, tests substitute fakes.

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::HttpBackend;
pub use types::{PythonOutcome, QueryOutcome, Row};

/// Errors from backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The backend reported an error message. Displayed verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("request failed with status code {status}")]
    Status { status: u16 },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Operations exposed by the backend service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// GET /scripts/list
    async fn list_scripts(&self) -> Result<Vec<String>, BackendError>;

    /// POST /scripts/get
    async fn get_script(&self, name: &str) -> Result<String, BackendError>;

    /// POST /scripts/save
    async fn save_script(&self, name: &str, content: &str) -> Result<(), BackendError>;

    /// POST /db/query
    async fn run_query(&self, query: &str) -> Result<QueryOutcome, BackendError>;

    /// POST /prompt/test
    async fn test_prompt(&self, prompt: &str) -> Result<String, BackendError>;

    /// POST /python/run
    async fn run_python(&self, code: &str) -> Result<PythonOutcome, BackendError>;
}
