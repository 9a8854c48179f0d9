//! The console shell: UI-agnostic state for the four panels.
//!
//! The TUI feeds [`Action`]s in and dispatches the [`Request`]s that
//! come back; backend results return as [`Completion`]s.

pub mod catalog;
pub mod request;
pub mod state;
pub mod table;
pub mod text;

pub use catalog::{ScriptCatalog, ScriptLanguage};
pub use request::{execute, BackendCall, CallResult, Completion, Request, RequestLedger, Slot};
pub use state::{Action, QueryView, ShellState, Tab};
pub use table::ResultTable;
pub use text::{EditOp, TextBuffer};
