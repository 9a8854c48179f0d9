//! The console: ratatui TUI presentation layer.
//!
//! One tab per panel, only the active one drawn. All panel behavior
//! lives in `shell`; the TUI maps keys to shell actions and ferries
//! backend requests to spawned tasks.
//!
//! ## Architecture (TEA)
//!
//! Model (`ConsoleApp`) + Update (message handler) + View (render).
//! Immediate mode: the only retained widget state is rebuilt per frame.
//! Backend completions re-enter through `TuiMessage::Completion`, never
//! by touching the model from another task.

pub mod app;
pub mod dashboard;
pub mod event;
pub mod input;
pub mod layout;
pub mod runner;
