//! Messages that drive the TUI update loop.
//!
//! The runner multiplexes crossterm key events and backend completions
//! into a single stream of `TuiMessage`s.

use crossterm::event::KeyEvent;

use crate::shell::Completion;

#[derive(Debug)]
pub enum TuiMessage {
    /// Keyboard input.
    Input(KeyEvent),
    /// A backend request finished.
    Completion(Completion),
    /// Quit the TUI.
    Quit,
}
