//! Key binding dispatch for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::shell::{Action, EditOp, Tab};

use super::app::{ConsoleApp, ScriptsFocus};

/// Spaces inserted for Tab in code editors.
const TAB_WIDTH: usize = 4;

/// Handle a key event, mutating app state.
pub fn handle_key(app: &mut ConsoleApp, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    // Global bindings
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
            app.should_quit = true;
            return;
        }
        KeyCode::F(n @ 1..=4) => {
            app.dispatch(Action::SelectTab(Tab::ALL[n as usize - 1]));
            return;
        }
        KeyCode::Char(c @ '1'..='4') if alt => {
            let idx = c as usize - '1' as usize;
            app.dispatch(Action::SelectTab(Tab::ALL[idx]));
            return;
        }
        KeyCode::Right if ctrl => {
            app.dispatch(Action::NextTab);
            return;
        }
        KeyCode::Left if ctrl => {
            app.dispatch(Action::PrevTab);
            return;
        }
        KeyCode::F(5) => {
            app.dispatch(Action::Submit);
            return;
        }
        KeyCode::Char('r') if ctrl => {
            app.dispatch(Action::Submit);
            return;
        }
        _ => {}
    }

    if app.active_tab() == Tab::Scripts && handle_scripts_key(app, key, ctrl) {
        return;
    }

    if ctrl || alt {
        return;
    }
    if key.code == KeyCode::Tab {
        for _ in 0..TAB_WIDTH {
            app.dispatch(Action::Edit(EditOp::Insert(' ')));
        }
        return;
    }
    if let Some(op) = edit_op(key.code) {
        app.dispatch(Action::Edit(op));
    }
}

/// Scripts-tab bindings. Returns true if the key was consumed.
fn handle_scripts_key(app: &mut ConsoleApp, key: KeyEvent, ctrl: bool) -> bool {
    match key.code {
        KeyCode::Char('s') if ctrl => {
            app.dispatch(Action::SaveScript);
            true
        }
        KeyCode::Char('l') if ctrl => {
            app.dispatch(Action::RefreshScripts);
            true
        }
        KeyCode::BackTab => {
            app.scripts_focus = app.scripts_focus.toggle();
            true
        }
        _ if app.scripts_focus == ScriptsFocus::Catalog => {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => app.dispatch(Action::SelectPrevScript),
                KeyCode::Down | KeyCode::Char('j') => app.dispatch(Action::SelectNextScript),
                KeyCode::Enter | KeyCode::Tab => app.scripts_focus = ScriptsFocus::Editor,
                _ => {}
            }
            // The catalog swallows everything else.
            true
        }
        KeyCode::Esc => {
            app.scripts_focus = ScriptsFocus::Catalog;
            true
        }
        _ => false,
    }
}

/// Map a key to a text edit.
fn edit_op(code: KeyCode) -> Option<EditOp> {
    let op = match code {
        KeyCode::Char(c) => EditOp::Insert(c),
        KeyCode::Enter => EditOp::Newline,
        KeyCode::Backspace => EditOp::Backspace,
        KeyCode::Delete => EditOp::Delete,
        KeyCode::Left => EditOp::Left,
        KeyCode::Right => EditOp::Right,
        KeyCode::Up => EditOp::Up,
        KeyCode::Down => EditOp::Down,
        KeyCode::Home => EditOp::Home,
        KeyCode::End => EditOp::End,
        _ => return None,
    };
    Some(op)
}
