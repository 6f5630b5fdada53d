//! Dialogue sessions
//!
//! The session logic is a pure state machine (`transition`) over persona and
//! pending turns. `SessionRuntime` owns the message log, runs the thinking
//! delays and executes the effects the state machine asks for.

mod delay;
mod effect;
pub mod event;
mod manager;
mod message;
mod runtime;
mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub(crate) mod testing;

pub use delay::ThinkingDelay;
pub use effect::Effect;
pub use event::Event;
pub use manager::SessionManager;
pub use message::{Message, MessageLog, Sender};
pub use runtime::{
    DialogueHandle, SessionError, SessionEvent, SessionRuntime, SessionSnapshot, APOLOGY,
};
pub use state::{PendingTurn, SessionState, TurnId};
pub use transition::{is_blank, transition, TransitionError, TransitionResult};

/// First bot message of every session
pub const WELCOME: &str =
    "Namaste! 🙏 I am your Bharat Seva assistant. How can I help you today?";
