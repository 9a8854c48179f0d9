//! ShellState: one state container per panel, composed into one shell.
//!
//! State changes only through [`ShellState::apply`] (user actions) and
//! [`ShellState::complete`] (backend completions). Both return the
//! requests the caller must dispatch. Panels never touch each other.

use tracing::debug;

use crate::backend::{PythonOutcome, QueryOutcome};
use crate::config::PanelDefaults;

use super::catalog::ScriptCatalog;
use super::request::{BackendCall, CallResult, Completion, Request, RequestLedger, Slot};
use super::table::ResultTable;
use super::text::{EditOp, TextBuffer};

/// Generic message shown when a Python run fails in transport.
pub const EXECUTION_FAILED: &str = "Execution failed";

/// Acknowledgment shown as soon as a save is sent.
pub const SCRIPT_SAVED: &str = "Script saved!";

/// Which panel is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Database,
    Scripts,
    Prompt,
    Python,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Database, Tab::Scripts, Tab::Prompt, Tab::Python];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Database => "Database Query",
            Tab::Scripts => "Reference Scripts",
            Tab::Prompt => "Prompt Engineering",
            Tab::Python => "Python IDE",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Database => 0,
            Tab::Scripts => 1,
            Tab::Prompt => 2,
            Tab::Python => 3,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Discrete user actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectTab(Tab),
    NextTab,
    PrevTab,
    /// Edit the active panel's input.
    Edit(EditOp),
    SelectScript(String),
    SelectNextScript,
    SelectPrevScript,
    RefreshScripts,
    RunQuery,
    SaveScript,
    TestPrompt,
    RunPython,
    /// The active panel's primary action.
    Submit,
}

/// What the database panel last received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryView {
    Table(ResultTable),
    Executed {
        message: String,
        rows_affected: Option<i64>,
    },
}

#[derive(Debug, Clone)]
pub struct DatabasePanel {
    pub query: TextBuffer,
    pub result: Option<QueryView>,
    pub error: Option<String>,
    pub pending: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptsPanel {
    pub catalog: ScriptCatalog,
    pub content: TextBuffer,
    pub loading: bool,
    /// Content of the selected script arrived intact. Edits and saves
    /// require it.
    pub loaded: bool,
    pub notice: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PromptPanel {
    pub input: TextBuffer,
    pub response: String,
    pub error: Option<String>,
    pub pending: bool,
}

/// Invariant: `output` and `error` are never both populated.
#[derive(Debug, Clone)]
pub struct PythonPanel {
    pub code: TextBuffer,
    pub output: String,
    pub error: Option<String>,
    pub running: bool,
}

/// The whole console state.
#[derive(Debug)]
pub struct ShellState {
    pub active_tab: Tab,
    pub database: DatabasePanel,
    pub scripts: ScriptsPanel,
    pub prompt: PromptPanel,
    pub python: PythonPanel,
    ledger: RequestLedger,
}

impl ShellState {
    pub fn new(defaults: &PanelDefaults) -> Self {
        Self {
            active_tab: Tab::Database,
            database: DatabasePanel {
                query: TextBuffer::new(&defaults.query),
                result: None,
                error: None,
                pending: false,
            },
            scripts: ScriptsPanel::default(),
            prompt: PromptPanel {
                input: TextBuffer::new(&defaults.prompt),
                response: String::new(),
                error: None,
                pending: false,
            },
            python: PythonPanel {
                code: TextBuffer::new(&defaults.python),
                output: String::new(),
                error: None,
                running: false,
            },
            ledger: RequestLedger::new(),
        }
    }

    /// Requests issued once at startup: the script catalog.
    pub fn start(&mut self) -> Vec<Request> {
        vec![self.ledger.issue(BackendCall::ListScripts)]
    }

    /// Whether the given panel has a request in flight.
    pub fn is_busy(&self, tab: Tab) -> bool {
        match tab {
            Tab::Database => self.database.pending,
            Tab::Scripts => self.scripts.loading,
            Tab::Prompt => self.prompt.pending,
            Tab::Python => self.python.running,
        }
    }

    /// Handle a user action.
    pub fn apply(&mut self, action: Action) -> Vec<Request> {
        match action {
            Action::SelectTab(tab) => {
                self.active_tab = tab;
                vec![]
            }
            Action::NextTab => {
                self.active_tab = self.active_tab.next();
                vec![]
            }
            Action::PrevTab => {
                self.active_tab = self.active_tab.prev();
                vec![]
            }
            Action::Edit(op) => {
                self.edit(op);
                vec![]
            }
            Action::SelectScript(name) => self.select_script(&name),
            Action::SelectNextScript => self.step_script(1),
            Action::SelectPrevScript => self.step_script(-1),
            Action::RefreshScripts => vec![self.ledger.issue(BackendCall::ListScripts)],
            Action::RunQuery => self.run_query(),
            Action::SaveScript => self.save_script(),
            Action::TestPrompt => self.test_prompt(),
            Action::RunPython => self.run_python(),
            Action::Submit => match self.active_tab {
                Tab::Database => self.run_query(),
                Tab::Scripts => self.save_script(),
                Tab::Prompt => self.test_prompt(),
                Tab::Python => self.run_python(),
            },
        }
    }

    /// Apply a backend completion. Stale completions are dropped.
    pub fn complete(&mut self, completion: Completion) -> Vec<Request> {
        let Completion { seq, result } = completion;
        if !self.ledger.is_current(result.slot(), seq) {
            debug!(seq, slot = ?result.slot(), "dropping superseded completion");
            return vec![];
        }

        match result {
            CallResult::Scripts(Ok(names)) => {
                self.scripts.error = None;
                let changed = self.scripts.catalog.replace(names);
                // A refresh also retries a selection whose content never arrived.
                let missing = self.scripts.catalog.selected().is_some()
                    && !self.scripts.loaded
                    && !self.scripts.loading;
                if changed || missing {
                    return self.load_selected();
                }
                vec![]
            }
            CallResult::Scripts(Err(e)) => {
                self.scripts.error = Some(format!("Could not list scripts: {e}"));
                vec![]
            }
            CallResult::ScriptContent { name, result } => {
                self.scripts.loading = false;
                match result {
                    Ok(text) => {
                        self.scripts.content.set_text(&text);
                        self.scripts.loaded = true;
                        self.scripts.error = None;
                    }
                    Err(e) => {
                        self.scripts.error = Some(format!("Could not load {name}: {e}"));
                    }
                }
                vec![]
            }
            CallResult::Saved { name, result } => {
                if let Err(e) = result {
                    self.scripts.notice = None;
                    self.scripts.error = Some(format!("Could not save {name}: {e}"));
                }
                vec![]
            }
            CallResult::Query(result) => {
                self.database.pending = false;
                match result {
                    Ok(QueryOutcome::Rows(rows)) => {
                        self.database.result = Some(QueryView::Table(ResultTable::from_rows(&rows)));
                        self.database.error = None;
                    }
                    Ok(QueryOutcome::Executed {
                        message,
                        rows_affected,
                    }) => {
                        self.database.result = Some(QueryView::Executed {
                            message,
                            rows_affected,
                        });
                        self.database.error = None;
                    }
                    Err(e) => {
                        self.database.result = None;
                        self.database.error = Some(e.to_string());
                    }
                }
                vec![]
            }
            CallResult::Prompt(result) => {
                self.prompt.pending = false;
                match result {
                    Ok(text) => {
                        self.prompt.response = text;
                        self.prompt.error = None;
                    }
                    Err(e) => self.prompt.error = Some(e.to_string()),
                }
                vec![]
            }
            CallResult::Python(result) => {
                self.python.running = false;
                match result {
                    Ok(PythonOutcome::Output(output)) => {
                        self.python.output = output;
                        self.python.error = None;
                    }
                    Ok(PythonOutcome::Error(message)) => {
                        self.python.output.clear();
                        self.python.error = Some(message);
                    }
                    Err(_) => {
                        self.python.output.clear();
                        self.python.error = Some(EXECUTION_FAILED.into());
                    }
                }
                vec![]
            }
        }
    }

    fn edit(&mut self, op: EditOp) {
        match self.active_tab {
            Tab::Database => {
                self.database.query.apply(op);
            }
            Tab::Scripts => {
                // Nothing to edit until a script has loaded.
                if !self.scripts.loaded {
                    return;
                }
                if self.scripts.content.apply(op) {
                    self.scripts.notice = None;
                }
            }
            Tab::Prompt => {
                self.prompt.input.apply(op);
            }
            Tab::Python => {
                self.python.code.apply(op);
            }
        }
    }

    fn select_script(&mut self, name: &str) -> Vec<Request> {
        if !self.scripts.catalog.contains(name) {
            self.scripts.error = Some(format!("Unknown script: {name}"));
            return vec![];
        }
        if self.scripts.catalog.select(name) {
            self.load_selected()
        } else {
            vec![]
        }
    }

    fn step_script(&mut self, offset: isize) -> Vec<Request> {
        match self.scripts.catalog.neighbor(offset).map(str::to_string) {
            Some(name) => self.select_script(&name),
            None => vec![],
        }
    }

    /// Fetch the selected script, discarding any unsaved edits.
    fn load_selected(&mut self) -> Vec<Request> {
        self.scripts.content.clear();
        self.scripts.notice = None;
        self.scripts.loaded = false;
        match self.scripts.catalog.selected() {
            Some(name) => {
                let name = name.to_string();
                self.scripts.loading = true;
                vec![self.ledger.issue(BackendCall::LoadScript { name })]
            }
            None => {
                // A load still in flight belongs to a script that is gone.
                self.ledger.supersede(Slot::ScriptContent);
                self.scripts.loading = false;
                vec![]
            }
        }
    }

    fn run_query(&mut self) -> Vec<Request> {
        self.database.result = None;
        if self.database.query.is_blank() {
            self.database.error = Some("No query provided".into());
            return vec![];
        }
        self.database.error = None;
        self.database.pending = true;
        let query = self.database.query.text();
        vec![self.ledger.issue(BackendCall::RunQuery { query })]
    }

    fn save_script(&mut self) -> Vec<Request> {
        let Some(name) = self.scripts.catalog.selected().map(str::to_string) else {
            self.scripts.error = Some("No script selected".into());
            return vec![];
        };
        if self.scripts.loading {
            self.scripts.error = Some(format!("{name} is still loading"));
            return vec![];
        }
        if !self.scripts.loaded {
            self.scripts.error = Some(format!("{name} did not load; reload before saving"));
            return vec![];
        }
        let content = self.scripts.content.text();
        self.scripts.error = None;
        self.scripts.notice = Some(SCRIPT_SAVED.into());
        vec![self.ledger.issue(BackendCall::SaveScript { name, content })]
    }

    fn test_prompt(&mut self) -> Vec<Request> {
        if self.prompt.input.is_blank() {
            self.prompt.error = Some("Prompt is empty".into());
            return vec![];
        }
        self.prompt.error = None;
        self.prompt.pending = true;
        let prompt = self.prompt.input.text();
        vec![self.ledger.issue(BackendCall::TestPrompt { prompt })]
    }

    fn run_python(&mut self) -> Vec<Request> {
        self.python.output.clear();
        if self.python.code.is_blank() {
            self.python.error = Some("No code to run".into());
            return vec![];
        }
        self.python.error = None;
        self.python.running = true;
        let code = self.python.code.text();
        vec![self.ledger.issue(BackendCall::RunPython { code })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use serde_json::json;

    fn shell() -> ShellState {
        ShellState::new(&PanelDefaults::default())
    }

    fn only(requests: Vec<Request>) -> Request {
        assert_eq!(requests.len(), 1, "expected exactly one request: {requests:?}");
        requests.into_iter().next().unwrap()
    }

    fn complete(shell: &mut ShellState, seq: u64, result: CallResult) -> Vec<Request> {
        shell.complete(Completion { seq, result })
    }

    /// Start the shell and deliver a catalog, returning the load request.
    fn with_catalog(shell: &mut ShellState, names: &[&str]) -> Vec<Request> {
        let list = only(shell.start());
        let names = names.iter().map(|s| s.to_string()).collect();
        complete(shell, list.seq, CallResult::Scripts(Ok(names)))
    }

    fn rows(v: serde_json::Value) -> Vec<crate::backend::Row> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn defaults() {
        let s = shell();
        assert_eq!(s.active_tab, Tab::Database);
        assert_eq!(s.database.query.text(), "SELECT * FROM demo;");
        assert_eq!(s.python.code.text(), "print(\"Hello from Python IDE\")");
        assert!(s.prompt.input.text().is_empty());
    }

    #[test]
    fn tab_cycle_visits_all_four() {
        let mut tab = Tab::Database;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(tab);
            tab = tab.next();
        }
        assert_eq!(seen, Tab::ALL);
        assert_eq!(tab, Tab::Database);
        assert_eq!(Tab::Database.prev(), Tab::Python);
    }

    #[test]
    fn select_tab_is_unconditional() {
        let mut s = shell();
        for tab in Tab::ALL {
            assert!(s.apply(Action::SelectTab(tab)).is_empty());
            assert_eq!(s.active_tab, tab);
        }
    }

    #[test]
    fn start_lists_scripts() {
        let mut s = shell();
        let req = only(s.start());
        assert_eq!(req.call, BackendCall::ListScripts);
    }

    #[test]
    fn catalog_selects_first_and_loads_it() {
        let mut s = shell();
        let load = only(with_catalog(&mut s, &["a.py", "b.txt"]));
        assert_eq!(s.scripts.catalog.selected(), Some("a.py"));
        assert_eq!(load.call, BackendCall::LoadScript { name: "a.py".into() });
        assert!(s.scripts.loading);
    }

    #[test]
    fn empty_catalog_loads_nothing() {
        let mut s = shell();
        assert!(with_catalog(&mut s, &[]).is_empty());
        assert_eq!(s.scripts.catalog.selected(), None);
        assert!(!s.scripts.loading);
    }

    #[test]
    fn selecting_script_fetches_once_and_discards_edits() {
        let mut s = shell();
        let load_a = only(with_catalog(&mut s, &["a.py", "b.txt"]));
        complete(
            &mut s,
            load_a.seq,
            CallResult::ScriptContent {
                name: "a.py".into(),
                result: Ok("print('a')".into()),
            },
        );
        s.apply(Action::SelectTab(Tab::Scripts));
        s.apply(Action::Edit(EditOp::Insert('!')));
        assert_eq!(s.scripts.content.text(), "print('a')!");

        let load_b = only(s.apply(Action::SelectScript("b.txt".into())));
        assert_eq!(load_b.call, BackendCall::LoadScript { name: "b.txt".into() });
        assert!(s.scripts.content.text().is_empty());

        complete(
            &mut s,
            load_b.seq,
            CallResult::ScriptContent {
                name: "b.txt".into(),
                result: Ok("hello b".into()),
            },
        );
        assert_eq!(s.scripts.content.text(), "hello b");
        assert!(!s.scripts.loading);
    }

    #[test]
    fn reselecting_current_script_does_not_fetch() {
        let mut s = shell();
        with_catalog(&mut s, &["a.py"]);
        assert!(s.apply(Action::SelectScript("a.py".into())).is_empty());
    }

    #[test]
    fn unknown_script_is_rejected() {
        let mut s = shell();
        with_catalog(&mut s, &["a.py"]);
        assert!(s.apply(Action::SelectScript("zzz".into())).is_empty());
        assert_eq!(s.scripts.catalog.selected(), Some("a.py"));
        assert!(s.scripts.error.as_deref().unwrap().contains("zzz"));
    }

    #[test]
    fn stale_script_content_is_dropped() {
        let mut s = shell();
        let load_a = only(with_catalog(&mut s, &["a.py", "b.txt"]));
        let load_b = only(s.apply(Action::SelectNextScript));
        complete(
            &mut s,
            load_b.seq,
            CallResult::ScriptContent {
                name: "b.txt".into(),
                result: Ok("b".into()),
            },
        );
        // a.py's fetch arrives late and must not overwrite b.txt.
        complete(
            &mut s,
            load_a.seq,
            CallResult::ScriptContent {
                name: "a.py".into(),
                result: Ok("a".into()),
            },
        );
        assert_eq!(s.scripts.content.text(), "b");
        assert_eq!(s.scripts.catalog.selected(), Some("b.txt"));
    }

    #[test]
    fn refresh_keeps_selection_without_refetch() {
        let mut s = shell();
        with_catalog(&mut s, &["a.py", "b.txt"]);
        let list = only(s.apply(Action::RefreshScripts));
        let follow = complete(
            &mut s,
            list.seq,
            CallResult::Scripts(Ok(vec!["a.py".into(), "c.py".into()])),
        );
        assert!(follow.is_empty());
        assert_eq!(s.scripts.catalog.names(), ["a.py", "c.py"]);
    }

    #[test]
    fn save_sends_content_and_acknowledges() {
        let mut s = shell();
        let load = only(with_catalog(&mut s, &["a.py"]));
        complete(
            &mut s,
            load.seq,
            CallResult::ScriptContent {
                name: "a.py".into(),
                result: Ok("x = 1".into()),
            },
        );
        s.apply(Action::SelectTab(Tab::Scripts));
        let save = only(s.apply(Action::Submit));
        assert_eq!(
            save.call,
            BackendCall::SaveScript {
                name: "a.py".into(),
                content: "x = 1".into()
            }
        );
        assert_eq!(s.scripts.notice.as_deref(), Some(SCRIPT_SAVED));
    }

    #[test]
    fn save_failure_replaces_acknowledgment() {
        let mut s = shell();
        let load = only(with_catalog(&mut s, &["a.py"]));
        complete(
            &mut s,
            load.seq,
            CallResult::ScriptContent {
                name: "a.py".into(),
                result: Ok(String::new()),
            },
        );
        let save = only(s.apply(Action::SaveScript));
        complete(
            &mut s,
            save.seq,
            CallResult::Saved {
                name: "a.py".into(),
                result: Err(BackendError::Status { status: 500 }),
            },
        );
        assert!(s.scripts.notice.is_none());
        assert!(s.scripts.error.as_deref().unwrap().contains("500"));
    }

    #[test]
    fn save_refused_without_selection_or_while_loading() {
        let mut s = shell();
        assert!(s.apply(Action::SaveScript).is_empty());
        assert!(s.scripts.error.is_some());

        with_catalog(&mut s, &["a.py"]);
        assert!(s.scripts.loading);
        assert!(s.apply(Action::SaveScript).is_empty());
        assert!(s.scripts.notice.is_none());
    }

    #[test]
    fn edits_ignored_while_script_loading() {
        let mut s = shell();
        with_catalog(&mut s, &["a.py"]);
        s.apply(Action::SelectTab(Tab::Scripts));
        s.apply(Action::Edit(EditOp::Insert('x')));
        assert!(s.scripts.content.text().is_empty());
    }

    #[test]
    fn failed_load_refuses_edits_and_saves() {
        let mut s = shell();
        let load = only(with_catalog(&mut s, &["a.py"]));
        complete(
            &mut s,
            load.seq,
            CallResult::ScriptContent {
                name: "a.py".into(),
                result: Err(BackendError::Status { status: 502 }),
            },
        );
        assert!(!s.scripts.loading);
        assert!(!s.scripts.loaded);

        s.apply(Action::SelectTab(Tab::Scripts));
        s.apply(Action::Edit(EditOp::Insert('x')));
        assert!(s.scripts.content.text().is_empty());

        // An empty save would overwrite the script on the backend.
        assert!(s.apply(Action::Submit).is_empty());
        assert!(s.apply(Action::SaveScript).is_empty());
        assert!(s.scripts.notice.is_none());
        assert!(s.scripts.error.as_deref().unwrap().contains("did not load"));

        // A refresh retries the fetch; once it lands, saving works.
        let reload = only(s.apply(Action::RefreshScripts));
        let retry = only(complete(&mut s, reload.seq, CallResult::Scripts(Ok(vec!["a.py".into()]))));
        assert_eq!(retry.call, BackendCall::LoadScript { name: "a.py".into() });
        complete(
            &mut s,
            retry.seq,
            CallResult::ScriptContent {
                name: "a.py".into(),
                result: Ok("x = 1".into()),
            },
        );
        assert!(s.scripts.loaded);
        let save = only(s.apply(Action::SaveScript));
        assert_eq!(
            save.call,
            BackendCall::SaveScript {
                name: "a.py".into(),
                content: "x = 1".into()
            }
        );
    }

    #[test]
    fn emptied_catalog_drops_outstanding_load() {
        let mut s = shell();
        let load = only(with_catalog(&mut s, &["a.py"]));
        let refresh = only(s.apply(Action::RefreshScripts));
        assert!(complete(&mut s, refresh.seq, CallResult::Scripts(Ok(vec![]))).is_empty());
        assert_eq!(s.scripts.catalog.selected(), None);
        assert!(!s.scripts.loading);

        complete(
            &mut s,
            load.seq,
            CallResult::ScriptContent {
                name: "a.py".into(),
                result: Ok("stale a".into()),
            },
        );
        assert!(s.scripts.content.text().is_empty());
        assert!(!s.scripts.loaded);
    }

    #[test]
    fn query_success_renders_demo_row() {
        let mut s = shell();
        let req = only(s.apply(Action::RunQuery));
        assert_eq!(req.call, BackendCall::RunQuery { query: "SELECT * FROM demo;".into() });
        assert!(s.database.pending);

        complete(
            &mut s,
            req.seq,
            CallResult::Query(Ok(QueryOutcome::Rows(rows(json!([{"id": 1, "name": "x"}]))))),
        );
        let Some(QueryView::Table(table)) = &s.database.result else {
            panic!("expected a table");
        };
        assert_eq!(table.headers, ["id", "name"]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "x".to_string()]]);
        assert!(s.database.error.is_none());
        assert!(!s.database.pending);
    }

    #[test]
    fn empty_query_result_has_no_headers() {
        let mut s = shell();
        let req = only(s.apply(Action::RunQuery));
        complete(&mut s, req.seq, CallResult::Query(Ok(QueryOutcome::Rows(vec![]))));
        let Some(QueryView::Table(table)) = &s.database.result else {
            panic!("expected a table");
        };
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn query_failure_clears_previous_table() {
        let mut s = shell();
        let first = only(s.apply(Action::RunQuery));
        complete(
            &mut s,
            first.seq,
            CallResult::Query(Ok(QueryOutcome::Rows(rows(json!([{"id": 1}]))))),
        );
        assert!(s.database.result.is_some());

        let second = only(s.apply(Action::RunQuery));
        assert!(s.database.result.is_none(), "pending state shows no table");
        complete(
            &mut s,
            second.seq,
            CallResult::Query(Err(BackendError::Api {
                status: 400,
                message: "no such table: demo".into(),
            })),
        );
        assert!(s.database.result.is_none());
        assert_eq!(s.database.error.as_deref(), Some("no such table: demo"));
    }

    #[test]
    fn query_error_cleared_on_next_run() {
        let mut s = shell();
        let req = only(s.apply(Action::RunQuery));
        complete(&mut s, req.seq, CallResult::Query(Err(BackendError::Status { status: 500 })));
        assert!(s.database.error.is_some());
        s.apply(Action::RunQuery);
        assert!(s.database.error.is_none());
    }

    #[test]
    fn executed_statement_acknowledged() {
        let mut s = shell();
        let req = only(s.apply(Action::RunQuery));
        complete(
            &mut s,
            req.seq,
            CallResult::Query(Ok(QueryOutcome::Executed {
                message: "Query executed successfully".into(),
                rows_affected: Some(2),
            })),
        );
        assert!(matches!(
            s.database.result,
            Some(QueryView::Executed { rows_affected: Some(2), .. })
        ));
    }

    #[test]
    fn blank_query_rejected_locally() {
        let mut s = shell();
        s.database.query.clear();
        assert!(s.apply(Action::RunQuery).is_empty());
        assert_eq!(s.database.error.as_deref(), Some("No query provided"));
        assert!(!s.database.pending);
    }

    #[test]
    fn superseded_query_response_is_ignored() {
        let mut s = shell();
        let first = only(s.apply(Action::RunQuery));
        let second = only(s.apply(Action::RunQuery));
        complete(
            &mut s,
            second.seq,
            CallResult::Query(Ok(QueryOutcome::Rows(rows(json!([{"v": "new"}]))))),
        );
        complete(
            &mut s,
            first.seq,
            CallResult::Query(Ok(QueryOutcome::Rows(rows(json!([{"v": "old"}]))))),
        );
        let Some(QueryView::Table(table)) = &s.database.result else {
            panic!("expected a table");
        };
        assert_eq!(table.rows[0], ["new"]);
    }

    #[test]
    fn python_output_and_error_are_exclusive() {
        let mut s = shell();
        let run = only(s.apply(Action::RunPython));
        assert!(s.python.running);
        complete(
            &mut s,
            run.seq,
            CallResult::Python(Ok(PythonOutcome::Output("Hello from Python IDE\n".into()))),
        );
        assert_eq!(s.python.output, "Hello from Python IDE\n");
        assert!(s.python.error.is_none());

        let run = only(s.apply(Action::RunPython));
        complete(
            &mut s,
            run.seq,
            CallResult::Python(Ok(PythonOutcome::Error("SyntaxError".into()))),
        );
        assert!(s.python.output.is_empty());
        assert_eq!(s.python.error.as_deref(), Some("SyntaxError"));
        assert!(!s.python.running);
    }

    #[test]
    fn python_transport_failure_is_generic() {
        let mut s = shell();
        let run = only(s.apply(Action::RunPython));
        complete(
            &mut s,
            run.seq,
            CallResult::Python(Err(BackendError::Status { status: 502 })),
        );
        assert_eq!(s.python.error.as_deref(), Some(EXECUTION_FAILED));
        assert!(s.python.output.is_empty());
    }

    #[test]
    fn prompt_round_trip() {
        let mut s = shell();
        s.apply(Action::SelectTab(Tab::Prompt));
        assert!(s.apply(Action::Submit).is_empty(), "blank prompt rejected");
        assert!(s.prompt.error.is_some());

        for c in "hi".chars() {
            s.apply(Action::Edit(EditOp::Insert(c)));
        }
        let req = only(s.apply(Action::Submit));
        assert_eq!(req.call, BackendCall::TestPrompt { prompt: "hi".into() });
        assert!(s.is_busy(Tab::Prompt));

        complete(&mut s, req.seq, CallResult::Prompt(Ok("Echo: hi".into())));
        assert_eq!(s.prompt.response, "Echo: hi");
        assert!(s.prompt.error.is_none());
        assert!(!s.is_busy(Tab::Prompt));
    }

    #[test]
    fn errors_stay_in_their_panel() {
        let mut s = shell();
        let req = only(s.apply(Action::RunQuery));
        complete(&mut s, req.seq, CallResult::Query(Err(BackendError::Status { status: 500 })));
        assert!(s.database.error.is_some());
        assert!(s.scripts.error.is_none());
        assert!(s.prompt.error.is_none());
        assert!(s.python.error.is_none());
    }

    #[test]
    fn edits_route_to_active_panel() {
        let mut s = shell();
        s.apply(Action::SelectTab(Tab::Python));
        s.apply(Action::Edit(EditOp::Newline));
        s.apply(Action::Edit(EditOp::Insert('x')));
        assert!(s.python.code.text().ends_with("\nx"));
        assert_eq!(s.database.query.text(), "SELECT * FROM demo;");
    }

    #[test]
    fn catalog_failure_is_surfaced() {
        let mut s = shell();
        let list = only(s.start());
        complete(
            &mut s,
            list.seq,
            CallResult::Scripts(Err(BackendError::InvalidResponse("bad".into()))),
        );
        assert!(s.scripts.error.as_deref().unwrap().starts_with("Could not list scripts"));
    }
}
