//! ConsoleApp: the TEA model.
//!
//! Wraps the shell state with presentation-only state (focus, quit
//! flag). Update receives TuiMessages and queues backend requests for
//! the runner to dispatch. No side effects in view.

use crate::shell::{Action, Request, ShellState, Tab};

use super::event::TuiMessage;

/// Which sub-pane has focus within the Scripts tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptsFocus {
    Catalog,
    Editor,
}

impl ScriptsFocus {
    pub fn toggle(self) -> Self {
        match self {
            Self::Catalog => Self::Editor,
            Self::Editor => Self::Catalog,
        }
    }
}

/// The main TUI application state (TEA model).
pub struct ConsoleApp {
    /// Panel state.
    pub shell: ShellState,
    /// Backend base URL (status bar).
    pub backend_url: String,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Which sub-pane has focus within the Scripts tab.
    pub scripts_focus: ScriptsFocus,
    /// Requests waiting to be dispatched (consumed by runner).
    pending_requests: Vec<Request>,
}

impl ConsoleApp {
    pub fn new(shell: ShellState, backend_url: impl Into<String>) -> Self {
        Self {
            shell,
            backend_url: backend_url.into(),
            should_quit: false,
            scripts_focus: ScriptsFocus::Catalog,
            pending_requests: Vec::new(),
        }
    }

    /// Queue the startup requests.
    pub fn start(&mut self) {
        let requests = self.shell.start();
        self.pending_requests.extend(requests);
    }

    /// The visible tab.
    pub fn active_tab(&self) -> Tab {
        self.shell.active_tab
    }

    /// Run a shell action and queue whatever requests it issues.
    pub fn dispatch(&mut self, action: Action) {
        let requests = self.shell.apply(action);
        self.pending_requests.extend(requests);
    }

    /// Drain queued requests.
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.pending_requests)
    }

    /// Handle a TUI message (TEA update).
    pub fn update(&mut self, msg: TuiMessage) {
        match msg {
            TuiMessage::Input(key) => super::input::handle_key(self, key),
            TuiMessage::Completion(completion) => {
                let requests = self.shell.complete(completion);
                self.pending_requests.extend(requests);
            }
            TuiMessage::Quit => self.should_quit = true,
        }
    }
}
