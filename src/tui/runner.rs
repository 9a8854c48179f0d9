//! TUI runner: main loop that wires everything together.
//!
//! Creates terminal, runs the TEA loop, and spawns a task per backend
//! request. Completions and key events come back over unbounded channels.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::config::ConsoleConfig;
use crate::shell::{execute, Completion, Request, ShellState, Tab};

use super::app::ConsoleApp;
use super::event::TuiMessage;
use super::layout;

/// How long the key reader waits before re-checking for shutdown.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Runs `restore` when dropped, covering every exit from `run_tui`.
struct RestoreOnDrop<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> Drop for RestoreOnDrop<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        warn!("failed to leave raw mode: {e}");
    }
    if let Err(e) = io::stdout().execute(LeaveAlternateScreen) {
        warn!("failed to leave alternate screen: {e}");
    }
}

/// Forward key events from `next_event` into `tx` until the receiver is
/// dropped or the source fails. `Ok(None)` means nothing arrived yet.
fn forward_keys<F>(mut next_event: F, tx: &UnboundedSender<KeyEvent>)
where
    F: FnMut() -> io::Result<Option<Event>>,
{
    while !tx.is_closed() {
        match next_event() {
            Ok(Some(Event::Key(key))) => {
                if tx.send(key).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("terminal input failed: {e}");
                break;
            }
        }
    }
}

/// One blocking reader for the whole session, so a key is never read on
/// behalf of a select branch that lost the race.
fn spawn_key_reader(tx: UnboundedSender<KeyEvent>) {
    tokio::task::spawn_blocking(move || {
        forward_keys(
            || {
                if event::poll(INPUT_POLL)? {
                    event::read().map(Some)
                } else {
                    Ok(None)
                }
            },
            &tx,
        );
        debug!("key reader stopped");
    });
}

/// Spawn a backend request. The completion is sent on `tx`; a closed
/// channel (TUI gone) drops it silently.
pub fn dispatch(backend: &Arc<dyn Backend>, tx: &UnboundedSender<Completion>, request: Request) {
    let backend = Arc::clone(backend);
    let tx = tx.clone();
    tokio::spawn(async move {
        let completion = execute(backend.as_ref(), request).await;
        if tx.send(completion).is_err() {
            debug!("completion dropped: console closed");
        }
    });
}

/// Run the TUI main loop. Blocks until quit.
pub async fn run_tui(
    config: &ConsoleConfig,
    backend: Arc<dyn Backend>,
    initial_tab: Tab,
) -> anyhow::Result<()> {
    let mut shell = ShellState::new(&config.defaults);
    shell.active_tab = initial_tab;
    let mut app = ConsoleApp::new(shell, config.backend_url.clone());
    app.start();

    // Setup terminal. The guard restores it on every return path.
    enable_raw_mode()?;
    let _restore = RestoreOnDrop {
        restore: restore_terminal,
    };
    io::stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let (key_tx, mut key_rx) = mpsc::unbounded_channel::<KeyEvent>();
    spawn_key_reader(key_tx);
    let mut render_interval = interval(Duration::from_millis(33)); // ~30fps

    info!(backend = %config.backend_url, "console started");

    loop {
        for request in app.take_requests() {
            dispatch(&backend, &tx, request);
        }

        tokio::select! {
            _ = render_interval.tick() => {
                terminal.draw(|f| layout::draw(f, &app))?;
            }
            Some(completion) = rx.recv() => {
                app.update(TuiMessage::Completion(completion));
            }
            key = key_rx.recv() => {
                // The reader only stops on its own when the terminal fails.
                app.update(match key {
                    Some(key) => TuiMessage::Input(key),
                    None => TuiMessage::Quit,
                });
            }
        }

        if app.should_quit {
            break;
        }
    }

    info!("console stopped");
    Ok(())
}
