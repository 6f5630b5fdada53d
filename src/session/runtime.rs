//! Async runtime that owns a dialogue session
//!
//! One task per session applies transitions in arrival order and executes
//! their effects. Response turns run as separate tasks that sleep through the
//! thinking delay and report back, so a slow turn never holds up a submission.

use super::delay::ThinkingDelay;
use super::message::{Message, MessageLog, Sender};
use super::state::{PendingTurn, SessionState};
use super::transition::{is_blank, transition};
use super::{Effect, Event, WELCOME};
use crate::persona::Persona;
use crate::resolver::ResponseResolver;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// Sent in place of a response whose resolution panicked
pub const APOLOGY: &str = "Sorry, something went wrong while answering. Please try again.";

const COMMAND_BUFFER: usize = 64;
const BROADCAST_BUFFER: usize = 128;

/// The session runtime has shut down
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session is closed")]
    Closed,
}

/// Observations pushed to the host surface
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Message { message: Message },
    Typing { active: bool },
    Persona { persona: Persona },
}

/// Point-in-time view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub persona: Persona,
    pub typing: bool,
    pub messages: Vec<Message>,
}

enum Command {
    Event(Event),
    Snapshot(oneshot::Sender<SessionSnapshot>),
}

/// Cloneable handle for driving a running session
#[derive(Clone)]
pub struct DialogueHandle {
    id: String,
    command_tx: mpsc::Sender<Command>,
    broadcast_tx: broadcast::Sender<SessionEvent>,
    shutdown: CancellationToken,
    last_active: Arc<Mutex<Instant>>,
}

impl DialogueHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Queue user input. Returns `false` when the input is blank and was ignored.
    pub async fn submit(&self, text: impl Into<String>) -> Result<bool, SessionError> {
        let text = text.into();
        let queued = !is_blank(&text);
        self.send(Command::Event(Event::UserSubmit { text })).await?;
        Ok(queued)
    }

    pub async fn switch_persona(&self, persona: Persona) -> Result<(), SessionError> {
        self.send(Command::Event(Event::PersonaSelected { persona }))
            .await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Snapshot(reply_tx)).await?;
        reply_rx.await.map_err(|_| SessionError::Closed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.touch();
        self.broadcast_tx.subscribe()
    }

    /// Stop the session and cancel any turns still waiting on their delay
    pub fn close(&self) {
        self.shutdown.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled() || self.command_tx.is_closed()
    }

    /// Time since the host last drove or observed this session
    pub fn idle_for(&self) -> Duration {
        self.last_active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }

    fn touch(&self) {
        *self.last_active.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    async fn send(&self, command: Command) -> Result<(), SessionError> {
        // The actor may not have dropped its receiver yet
        if self.shutdown.is_cancelled() {
            return Err(SessionError::Closed);
        }
        self.touch();
        self.command_tx
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }
}

/// Owner of one session's state and message log
pub struct SessionRuntime {
    id: String,
    state: SessionState,
    log: MessageLog,
    resolver: ResponseResolver,
    delay: ThinkingDelay,
    command_rx: mpsc::Receiver<Command>,
    turn_tx: mpsc::UnboundedSender<Event>,
    turn_rx: mpsc::UnboundedReceiver<Event>,
    broadcast_tx: broadcast::Sender<SessionEvent>,
    shutdown: CancellationToken,
}

impl SessionRuntime {
    pub fn new(
        id: impl Into<String>,
        resolver: ResponseResolver,
        delay: ThinkingDelay,
    ) -> (Self, DialogueHandle) {
        let id = id.into();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (turn_tx, turn_rx) = mpsc::unbounded_channel();
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_BUFFER);
        let shutdown = CancellationToken::new();

        let mut log = MessageLog::new();
        log.append(Sender::Bot, WELCOME);

        let handle = DialogueHandle {
            id: id.clone(),
            command_tx,
            broadcast_tx: broadcast_tx.clone(),
            shutdown: shutdown.clone(),
            last_active: Arc::new(Mutex::new(Instant::now())),
        };
        let runtime = Self {
            id,
            state: SessionState::default(),
            log,
            resolver,
            delay,
            command_rx,
            turn_tx,
            turn_rx,
            broadcast_tx,
            shutdown,
        };
        (runtime, handle)
    }

    /// Create a session and run it on the current tokio runtime
    pub fn spawn(
        id: impl Into<String>,
        resolver: ResponseResolver,
        delay: ThinkingDelay,
    ) -> DialogueHandle {
        let (runtime, handle) = Self::new(id, resolver, delay);
        tokio::spawn(runtime.run());
        handle
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.id, "Starting dialogue session");

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => break,
                command = self.command_rx.recv() => match command {
                    Some(Command::Event(event)) => self.process_event(event),
                    Some(Command::Snapshot(reply)) => {
                        let _ = reply.send(self.snapshot());
                    }
                    // Every handle dropped
                    None => break,
                },
                Some(event) = self.turn_rx.recv() => self.process_event(event),
            }
        }

        // Outstanding turns observe child tokens and exit without reporting
        self.shutdown.cancel();
        tracing::info!(
            session_id = %self.id,
            abandoned_turns = self.state.pending.len(),
            "Dialogue session stopped"
        );
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            persona: self.state.persona(),
            typing: self.state.is_typing(),
            messages: self.log.messages().to_vec(),
        }
    }

    fn process_event(&mut self, event: Event) {
        let result = match transition(&self.state, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "Ignoring event");
                return;
            }
        };

        self.state = result.new_state;
        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendMessage { sender, text } => {
                let message = self.log.append(sender, text).clone();
                tracing::debug!(
                    session_id = %self.id,
                    sequence_id = message.sequence_id,
                    sender = ?message.sender,
                    "Message appended"
                );
                self.notify(SessionEvent::Message { message });
            }
            Effect::ScheduleResponse { turn } => self.schedule_turn(turn),
            Effect::NotifyTyping { active } => self.notify(SessionEvent::Typing { active }),
            Effect::NotifyPersona { persona } => {
                tracing::info!(session_id = %self.id, %persona, "Persona switched");
                self.notify(SessionEvent::Persona { persona });
            }
        }
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.broadcast_tx.send(event);
    }

    fn schedule_turn(&self, turn: PendingTurn) {
        let delay = self.delay.next_delay();
        let resolver = self.resolver.clone();
        let turn_tx = self.turn_tx.clone();
        let cancel = self.shutdown.child_token();
        let session_id = self.id.clone();

        tracing::debug!(
            session_id = %session_id,
            turn_id = turn.id,
            persona = %turn.persona,
            delay_ms = %delay.as_millis(),
            "Scheduling response"
        );

        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!(session_id = %session_id, turn_id = turn.id, "Turn cancelled");
                }
                () = tokio::time::sleep(delay) => {
                    let text = resolve_turn(&resolver, &turn);
                    let _ = turn_tx.send(Event::ResponseReady { turn_id: turn.id, text });
                }
            }
        });
    }
}

/// Resolve a turn, substituting [`APOLOGY`] if resolution panics
fn resolve_turn(resolver: &ResponseResolver, turn: &PendingTurn) -> String {
    guarded(turn, || resolver.resolve(turn.persona, &turn.input))
}

fn guarded(turn: &PendingTurn, resolve: impl FnOnce() -> String) -> String {
    catch_unwind(AssertUnwindSafe(resolve)).unwrap_or_else(|_| {
        tracing::error!(turn_id = turn.id, persona = %turn.persona, "Response resolution panicked");
        APOLOGY.to_string()
    })
}
