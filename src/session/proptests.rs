//! Property-based tests for the session state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::*;
use crate::persona::Persona;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Host-level actions; responses are addressed by index into the pending set
#[derive(Debug, Clone)]
enum Action {
    Submit(String),
    Switch(Persona),
    Answer(usize),
}

fn arb_persona() -> impl Strategy<Value = Persona> {
    prop_oneof![
        Just(Persona::General),
        Just(Persona::Scheme),
        Just(Persona::Eligibility),
        Just(Persona::Support),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,5}",
        "[a-zA-Z ?]{1,30}",
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        arb_text().prop_map(Action::Submit),
        arb_persona().prop_map(Action::Switch),
        (0usize..8).prop_map(Action::Answer),
    ]
}

fn to_event(state: &SessionState, action: &Action) -> Option<Event> {
    match action {
        Action::Submit(text) => Some(Event::UserSubmit { text: text.clone() }),
        Action::Switch(persona) => Some(Event::PersonaSelected { persona: *persona }),
        Action::Answer(index) => {
            let pending: Vec<_> = state.pending.iter().copied().collect();
            if pending.is_empty() {
                return None;
            }
            Some(Event::ResponseReady {
                turn_id: pending[index % pending.len()],
                text: "answer".to_string(),
            })
        }
    }
}

fn appended(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, Effect::AppendMessage { .. }))
        .count()
}

// ============================================================================
// Invariants
// ============================================================================

proptest! {
    #[test]
    fn prop_typing_tracks_pending(actions in prop::collection::vec(arb_action(), 0..40)) {
        let mut state = SessionState::default();
        let mut typing = false;

        for action in &actions {
            let Some(event) = to_event(&state, action) else { continue };
            let result = transition(&state, event).unwrap();

            for effect in &result.effects {
                if let Effect::NotifyTyping { active } = effect {
                    prop_assert_ne!(*active, typing, "typing notified without a change");
                    typing = *active;
                }
            }
            state = result.new_state;
            prop_assert_eq!(typing, state.is_typing());
        }
    }

    #[test]
    fn prop_turns_snapshot_current_persona(actions in prop::collection::vec(arb_action(), 0..40)) {
        let mut state = SessionState::default();

        for action in &actions {
            let Some(event) = to_event(&state, action) else { continue };
            let persona_before = state.persona();
            let result = transition(&state, event).unwrap();

            for effect in &result.effects {
                if let Effect::ScheduleResponse { turn } = effect {
                    prop_assert_eq!(turn.persona, persona_before);
                    prop_assert_eq!(turn.input.trim(), turn.input.as_str());
                    prop_assert!(!turn.input.is_empty());
                }
            }
            state = result.new_state;
        }
    }

    #[test]
    fn prop_each_event_appends_expected_messages(actions in prop::collection::vec(arb_action(), 0..40)) {
        let mut state = SessionState::default();

        for action in &actions {
            let Some(event) = to_event(&state, action) else { continue };
            let expected = match &event {
                Event::UserSubmit { text } if is_blank(text) => 0,
                _ => 1,
            };
            let result = transition(&state, event).unwrap();

            prop_assert_eq!(appended(&result.effects), expected);
            state = result.new_state;
        }
    }

    #[test]
    fn prop_turn_ids_unique(texts in prop::collection::vec("[a-z]{1,8}", 1..20)) {
        let mut state = SessionState::default();
        let mut seen = std::collections::HashSet::new();

        for text in texts {
            let result = transition(&state, Event::UserSubmit { text }).unwrap();
            for effect in &result.effects {
                if let Effect::ScheduleResponse { turn } = effect {
                    prop_assert!(seen.insert(turn.id));
                }
            }
            state = result.new_state;
        }
        prop_assert_eq!(state.pending.len(), seen.len());
    }
}
