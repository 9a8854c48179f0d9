//! Backend requests issued by the shell and their completions.
//!
//! Every request is stamped with a sequence number from the
//! [`RequestLedger`]. A completion is applied only if its number is
//! still the latest issued for its slot, so a slow response can never
//! overwrite a newer one.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::backend::{Backend, BackendError, PythonOutcome, QueryOutcome};

/// Request categories. Each slot tracks its own latest sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Catalog,
    ScriptContent,
    ScriptSave,
    Query,
    Prompt,
    Python,
}

/// A backend call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    ListScripts,
    LoadScript { name: String },
    SaveScript { name: String, content: String },
    RunQuery { query: String },
    TestPrompt { prompt: String },
    RunPython { code: String },
}

impl BackendCall {
    pub fn slot(&self) -> Slot {
        match self {
            Self::ListScripts => Slot::Catalog,
            Self::LoadScript { .. } => Slot::ScriptContent,
            Self::SaveScript { .. } => Slot::ScriptSave,
            Self::RunQuery { .. } => Slot::Query,
            Self::TestPrompt { .. } => Slot::Prompt,
            Self::RunPython { .. } => Slot::Python,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ListScripts => "list-scripts",
            Self::LoadScript { .. } => "load-script",
            Self::SaveScript { .. } => "save-script",
            Self::RunQuery { .. } => "run-query",
            Self::TestPrompt { .. } => "test-prompt",
            Self::RunPython { .. } => "run-python",
        }
    }
}

/// A call stamped with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub seq: u64,
    pub call: BackendCall,
}

/// The result of one backend call.
#[derive(Debug)]
pub enum CallResult {
    Scripts(Result<Vec<String>, BackendError>),
    ScriptContent {
        name: String,
        result: Result<String, BackendError>,
    },
    Saved {
        name: String,
        result: Result<(), BackendError>,
    },
    Query(Result<QueryOutcome, BackendError>),
    Prompt(Result<String, BackendError>),
    Python(Result<PythonOutcome, BackendError>),
}

impl CallResult {
    pub fn slot(&self) -> Slot {
        match self {
            Self::Scripts(_) => Slot::Catalog,
            Self::ScriptContent { .. } => Slot::ScriptContent,
            Self::Saved { .. } => Slot::ScriptSave,
            Self::Query(_) => Slot::Query,
            Self::Prompt(_) => Slot::Prompt,
            Self::Python(_) => Slot::Python,
        }
    }
}

/// A finished request, delivered back to the shell.
#[derive(Debug)]
pub struct Completion {
    pub seq: u64,
    pub result: CallResult,
}

/// Issues sequence numbers and remembers the latest per slot.
#[derive(Debug, Default)]
pub struct RequestLedger {
    next_seq: u64,
    latest: HashMap<Slot, u64>,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a call with a fresh sequence number, superseding anything
    /// outstanding in the same slot.
    pub fn issue(&mut self, call: BackendCall) -> Request {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.latest.insert(call.slot(), seq);
        Request { seq, call }
    }

    /// Whether `seq` is the latest issued for `slot`.
    pub fn is_current(&self, slot: Slot, seq: u64) -> bool {
        self.latest.get(&slot) == Some(&seq)
    }

    /// Retire whatever is outstanding in `slot` without issuing anything.
    pub fn supersede(&mut self, slot: Slot) {
        self.latest.remove(&slot);
    }
}

/// Execute one request against the backend. Never fails: errors travel
/// inside the completion.
pub async fn execute(backend: &dyn Backend, request: Request) -> Completion {
    let Request { seq, call } = request;
    info!(seq, call = call.label(), "dispatching request");

    let result = match call {
        BackendCall::ListScripts => CallResult::Scripts(backend.list_scripts().await),
        BackendCall::LoadScript { name } => {
            let result = backend.get_script(&name).await;
            CallResult::ScriptContent { name, result }
        }
        BackendCall::SaveScript { name, content } => {
            let result = backend.save_script(&name, &content).await;
            CallResult::Saved { name, result }
        }
        BackendCall::RunQuery { query } => CallResult::Query(backend.run_query(&query).await),
        BackendCall::TestPrompt { prompt } => CallResult::Prompt(backend.test_prompt(&prompt).await),
        BackendCall::RunPython { code } => CallResult::Python(backend.run_python(&code).await),
    };

    if let Some(err) = result_error(&result) {
        warn!(seq, "request failed: {err}");
    } else {
        debug!(seq, "request completed");
    }

    Completion { seq, result }
}

fn result_error(result: &CallResult) -> Option<&BackendError> {
    match result {
        CallResult::Scripts(r) => r.as_ref().err(),
        CallResult::ScriptContent { result, .. } => result.as_ref().err(),
        CallResult::Saved { result, .. } => result.as_ref().err(),
        CallResult::Query(r) => r.as_ref().err(),
        CallResult::Prompt(r) => r.as_ref().err(),
        CallResult::Python(r) => r.as_ref().err(),
    }
}
