//! Session state owned by the transition function

use crate::persona::{Persona, PersonaState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier of one submitted turn, unique within a session
pub type TurnId = u64;

/// A response turn waiting on its thinking delay.
///
/// Persona and input are captured when the user submits, so a persona switch
/// during the delay does not change how this turn is answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTurn {
    pub id: TurnId,
    pub persona: Persona,
    /// Trimmed user input
    pub input: String,
}

/// Everything the transition function reads and writes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub personas: PersonaState,
    /// Turns scheduled but not yet answered
    pub pending: BTreeSet<TurnId>,
    pub next_turn: TurnId,
}

impl SessionState {
    pub fn persona(&self) -> Persona {
        self.personas.current()
    }

    /// Whether the typing indicator should be shown
    pub fn is_typing(&self) -> bool {
        !self.pending.is_empty()
    }
}
