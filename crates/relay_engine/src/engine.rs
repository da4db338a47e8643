use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use futures_util::future::join_all;
use relay_logging::{relay_debug, relay_error, relay_info, relay_warn};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{ChannelEventSink, RelayEvent, RelaySession, SessionCommand};

/// How long a dropped engine waits for sessions to close cleanly.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

const ENGINE_STOPPED: &str = "relay engine is not running";

enum EngineCommand {
    Connect,
    Subscribe,
    Disconnect,
    Shutdown,
}

struct ActiveSession {
    commands: UnboundedSender<SessionCommand>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct Sessions {
    active: Option<ActiveSession>,
    /// Cancelled sessions that may still be sending their close frame.
    closing: Vec<JoinHandle<()>>,
}

impl Sessions {
    /// Cancels the active session, if any. Returns whether there was one.
    fn retire_active(&mut self) -> bool {
        self.closing.retain(|task| !task.is_finished());
        match self.active.take() {
            Some(active) => {
                active.cancel.cancel();
                self.closing.push(active.task);
                true
            }
            None => false,
        }
    }
}

/// Runs relay sessions on a background thread with its own tokio runtime.
///
/// Commands go in through the handle's methods; [`RelayEvent`]s come back
/// through [`EngineHandle::try_recv`] / [`EngineHandle::recv_timeout`].
/// Dropping the handle closes the active session and joins the thread.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_tx: mpsc::Sender<RelayEvent>,
    event_rx: mpsc::Receiver<RelayEvent>,
    thread: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(session: RelaySession) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let engine_events = event_tx.clone();

        let thread = thread::spawn(move || {
            let runtime = match Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    relay_error!("failed to start tokio runtime: {}", err);
                    return;
                }
            };
            let mut sessions = Sessions::default();
            while let Ok(command) = cmd_rx.recv() {
                if matches!(command, EngineCommand::Shutdown) {
                    break;
                }
                handle_command(&runtime, &session, &mut sessions, command, &engine_events);
            }

            sessions.retire_active();
            if !sessions.closing.is_empty() {
                relay_debug!(
                    "engine shutting down, waiting for {} session(s)",
                    sessions.closing.len()
                );
                let closing = std::mem::take(&mut sessions.closing);
                runtime.block_on(async {
                    let _ = tokio::time::timeout(SHUTDOWN_GRACE, join_all(closing)).await;
                });
            }
        });

        Self {
            cmd_tx,
            event_tx,
            event_rx,
            thread: Some(thread),
        }
    }

    /// Starts a session. If the engine thread is gone the attempt is
    /// reported as a `ConnectError` so callers never wait on it.
    pub fn connect(&self) {
        if self.cmd_tx.send(EngineCommand::Connect).is_err() {
            relay_error!("connect dropped: relay engine is not running");
            let _ = self.event_tx.send(RelayEvent::ConnectError {
                message: ENGINE_STOPPED.to_string(),
            });
        }
    }

    pub fn subscribe(&self) {
        if self.cmd_tx.send(EngineCommand::Subscribe).is_err() {
            relay_warn!("subscribe dropped: relay engine is not running");
        }
    }

    /// Ends the active session. A stopped engine has no session, so this
    /// reports the disconnect itself.
    pub fn disconnect(&self) {
        if self.cmd_tx.send(EngineCommand::Disconnect).is_err() {
            let _ = self.event_tx.send(RelayEvent::Disconnected {
                reason: Some(ENGINE_STOPPED.to_string()),
            });
        }
    }

    pub fn try_recv(&self) -> Option<RelayEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<RelayEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                relay_error!("relay engine thread panicked");
            }
        }
    }
}

fn handle_command(
    runtime: &Runtime,
    session: &RelaySession,
    sessions: &mut Sessions,
    command: EngineCommand,
    event_tx: &mpsc::Sender<RelayEvent>,
) {
    match command {
        EngineCommand::Connect => {
            if sessions.retire_active() {
                relay_info!("replacing previous relay session");
            }
            let (commands, command_rx) = unbounded_channel();
            let cancel = CancellationToken::new();
            let session = session.clone();
            let sink = ChannelEventSink::new(event_tx.clone());
            let session_cancel = cancel.clone();
            let task = runtime.spawn(async move {
                session.run(command_rx, session_cancel, &sink).await;
            });
            sessions.active = Some(ActiveSession {
                commands,
                cancel,
                task,
            });
        }
        EngineCommand::Subscribe => match sessions.active.as_ref() {
            Some(active) => {
                if active.commands.send(SessionCommand::Subscribe).is_err() {
                    relay_warn!("subscribe dropped: session already ended");
                }
            }
            None => relay_warn!("subscribe requested without a session"),
        },
        EngineCommand::Disconnect => {
            if !sessions.retire_active() {
                relay_debug!("disconnect requested without a session");
            }
        }
        EngineCommand::Shutdown => {}
    }
}
