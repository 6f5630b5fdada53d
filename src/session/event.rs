//! Events that drive the session state machine

use super::state::TurnId;
use crate::persona::Persona;

/// Inputs to [`super::transition`]
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Host events
    UserSubmit {
        text: String,
    },
    PersonaSelected {
        persona: Persona,
    },

    // Turn events
    ResponseReady {
        turn_id: TurnId,
        text: String,
    },
}
