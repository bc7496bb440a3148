//! Property-based tests for the session state machine

use super::state::*;
use super::transition::*;
use super::*;
use crate::api::ApiError;
use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_714_600_000 + secs, 0).unwrap()
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,4}",
        "[a-zA-Z ?]{1,30}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    (0i64..10_000).prop_flat_map(|secs| {
        prop_oneof![
            3 => arb_text().prop_map(|text| Event::DraftEdited { text }),
            3 => Just(Event::SendRequested { at: at(secs) }),
            2 => arb_text().prop_map(move |text| Event::ReplyReceived { text, at: at(secs) }),
            1 => Just(Event::ReplyFailed {
                error: ApiError::network("Connection failed"),
                at: at(secs),
            }),
            1 => arb_text().prop_map(move |briefing| Event::Primed { briefing, at: at(secs) }),
        ]
    })
}

/// Every user message is answered by the bot message right after it,
/// except the last one while a request is pending
fn check_answered(state: &SessionState) -> Result<(), TestCaseError> {
    for (i, message) in state.messages.iter().enumerate() {
        prop_assert_eq!(message.id, i);
        if message.sender == Sender::User {
            match state.messages.get(i + 1) {
                Some(next) => prop_assert_eq!(next.sender, Sender::Bot),
                None => prop_assert!(state.pending, "dangling user message while idle"),
            }
        }
    }
    if state.pending {
        prop_assert_eq!(state.last_message().map(|m| m.sender), Some(Sender::User));
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_history_is_append_only_and_answered(
        events in prop::collection::vec(arb_event(), 0..40)
    ) {
        let mut state = SessionState::with_greeting("Hello!", at(0));

        for event in events {
            let before = state.clone();
            let is_send = matches!(event, Event::SendRequested { .. });

            let outcome = transition(&state, event);
            if is_send {
                prop_assert_eq!(before.can_send(), outcome.is_ok());
            }
            match outcome {
                Ok(result) => {
                    state = result.new_state;

                    // Nothing is ever reordered or removed
                    prop_assert!(state.messages.len() >= before.messages.len());
                    prop_assert_eq!(&state.messages[..before.messages.len()], &before.messages[..]);

                    if is_send {
                        prop_assert_eq!(state.messages.len(), before.messages.len() + 1);
                        prop_assert_eq!(&state.last_message().unwrap().content, &before.draft);
                        prop_assert!(state.draft.is_empty());
                        prop_assert!(state.pending);
                        let request = result.effects.iter().find_map(|e| match e {
                            Effect::RequestReply { request } => Some(request),
                            Effect::PublishSession => None,
                        });
                        let request = request.unwrap();
                        prop_assert_eq!(&request.message, &before.draft);
                        prop_assert_eq!(&request.history, &before.history());
                    }
                }
                Err(_) => {
                    // A refused event is a self-loop
                    prop_assert_eq!(&state, &before);
                }
            }

            check_answered(&state)?;
        }
    }

    /// Single-flight: a send while pending never appends anything
    #[test]
    fn prop_send_while_pending_is_noop(draft in arb_text(), next in arb_text()) {
        let state = SessionState {
            draft: format!("{draft}x"),
            ..SessionState::default()
        };
        let state = transition(&state, Event::SendRequested { at: at(1) }).unwrap().new_state;
        let state = transition(&state, Event::DraftEdited { text: next.clone() }).unwrap().new_state;

        let err = transition(&state, Event::SendRequested { at: at(2) }).unwrap_err();
        prop_assert_eq!(err, TransitionError::RequestInFlight);
        prop_assert_eq!(&state.draft, &next);
        prop_assert_eq!(state.messages.len(), 1);
    }
}
