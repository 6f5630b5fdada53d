//! Pure state transition function
//!
//! Given the same state and event this always yields the same result and
//! performs no I/O; timers, logging and message storage belong to the runtime.

use super::{Effect, Event, PendingTurn, SessionState, TurnId};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("No pending turn with id {0}")]
    UnknownTurn(TurnId),
}

/// Whether submitted text carries nothing to answer
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Pure transition function
pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    match event {
        // Blank input is ignored outright: no message, no turn
        Event::UserSubmit { text } if is_blank(&text) => Ok(TransitionResult::new(state.clone())),

        Event::UserSubmit { text } => {
            let mut next = state.clone();
            let turn = PendingTurn {
                id: next.next_turn,
                persona: next.persona(),
                input: text.trim().to_string(),
            };
            next.next_turn += 1;
            next.pending.insert(turn.id);

            let mut result = TransitionResult::new(next).with_effect(Effect::user_message(text));
            if !state.is_typing() {
                result = result.with_effect(Effect::NotifyTyping { active: true });
            }
            Ok(result.with_effect(Effect::ScheduleResponse { turn }))
        }

        Event::PersonaSelected { persona } => {
            let mut next = state.clone();
            let greeting = next.personas.switch_to(persona);
            Ok(TransitionResult::new(next)
                .with_effect(Effect::NotifyPersona { persona })
                .with_effect(Effect::bot_message(greeting)))
        }

        Event::ResponseReady { turn_id, text } => {
            if !state.pending.contains(&turn_id) {
                return Err(TransitionError::UnknownTurn(turn_id));
            }
            let mut next = state.clone();
            next.pending.remove(&turn_id);

            let mut result = TransitionResult::new(next);
            if !result.new_state.is_typing() {
                result = result.with_effect(Effect::NotifyTyping { active: false });
            }
            Ok(result.with_effect(Effect::bot_message(text)))
        }
    }
}
