//! Wire types for the backend HTTP surface.
//!
//! One request struct and one response struct per endpoint. Responses
//! are deserialized strictly: a missing field is a schema error, never
//! an empty value on screen.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single result row: column name → value, in backend order.
pub type Row = Map<String, Value>;

// ── Requests ──

#[derive(Debug, Serialize)]
pub struct ScriptNameRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SaveScriptRequest<'a> {
    pub name: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PromptRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CodeRequest<'a> {
    pub code: &'a str,
}

// ── Responses ──

/// GET /scripts/list
#[derive(Debug, Deserialize)]
pub struct ScriptListResponse {
    pub scripts: Vec<String>,
}

/// POST /scripts/get
#[derive(Debug, Deserialize)]
pub struct ScriptContentResponse {
    pub content: String,
}

/// POST /prompt/test
#[derive(Debug, Deserialize)]
pub struct PromptResponse {
    pub response: String,
}

/// Body shape returned by endpoints that report failures.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Value,
}

/// POST /db/query body. SELECT statements return rows; anything else
/// returns an acknowledgment with the affected row count.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Rows {
        results: Vec<Row>,
    },
    Executed {
        message: String,
        #[serde(default)]
        rows_affected: Option<i64>,
    },
    Failed {
        error: Value,
    },
}

/// POST /python/run body. `error` wins when both fields are present.
#[derive(Debug, Deserialize)]
pub struct PythonResponse {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

/// Outcome of a database query as the console sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(Vec<Row>),
    Executed {
        message: String,
        rows_affected: Option<i64>,
    },
}

/// Outcome of a Python run. The two variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PythonOutcome {
    Output(String),
    Error(String),
}

/// Render a backend-reported error value as display text.
///
/// Strings pass through verbatim; structured errors (validation lists)
/// are rendered as compact JSON.
pub fn error_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
