//! Effects produced by state transitions

use super::message::Sender;
use super::state::PendingTurn;
use crate::persona::Persona;

/// Work for the runtime to carry out after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Append a message to the log and notify observers
    AppendMessage { sender: Sender, text: String },

    /// Start the thinking delay for a turn, then resolve it
    ScheduleResponse { turn: PendingTurn },

    /// Typing indicator appeared or went away
    NotifyTyping { active: bool },

    /// Active persona changed
    NotifyPersona { persona: Persona },
}

impl Effect {
    pub fn user_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}
