//! Pure state transition function for the conversation session

use super::state::{Sender, SessionState, FALLBACK_REPLY};
use super::{Effect, Event};
use crate::api::ChatRequest;
use chrono::{DateTime, Utc};
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

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Events the session refuses; the caller sees a silent no-op
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Draft is empty")]
    EmptyDraft,
    #[error("A chat request is already in flight")]
    RequestInFlight,
    #[error("Briefing is empty")]
    EmptyBriefing,
    #[error("No chat request is in flight")]
    NoRequestInFlight,
}

impl TransitionError {
    pub fn is_user_input_rejected(&self) -> bool {
        !matches!(self, TransitionError::NoRequestInFlight)
    }
}

pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::DraftEdited { text } => {
            let mut new_state = state.clone();
            new_state.draft = text;
            Ok(TransitionResult::new(new_state).with_effect(Effect::PublishSession))
        }

        Event::SendRequested { at } => {
            if !state.can_send() {
                return Err(if state.pending {
                    TransitionError::RequestInFlight
                } else {
                    TransitionError::EmptyDraft
                });
            }

            let mut new_state = state.clone();
            // History replayed to the backend excludes the message being sent
            let history = new_state.history();
            let message = std::mem::take(&mut new_state.draft);
            new_state.append(message.clone(), Sender::User, at);
            new_state.pending = true;

            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::RequestReply {
                    request: ChatRequest { message, history },
                })
                .with_effect(Effect::PublishSession))
        }

        Event::ReplyReceived { text, at } => {
            let reply = if text.trim().is_empty() {
                FALLBACK_REPLY.to_string()
            } else {
                text
            };
            settle(state, reply, at)
        }

        Event::ReplyFailed { at, .. } => settle(state, FALLBACK_REPLY.to_string(), at),

        Event::Primed { briefing, at } => {
            if state.pending {
                return Err(TransitionError::RequestInFlight);
            }
            if briefing.trim().is_empty() {
                return Err(TransitionError::EmptyBriefing);
            }

            let mut new_state = state.clone();
            new_state.append(briefing, Sender::Bot, at);
            Ok(TransitionResult::new(new_state).with_effect(Effect::PublishSession))
        }
    }
}

/// Answer the pending user message and clear the single-flight flag
fn settle(
    state: &SessionState,
    reply: String,
    at: DateTime<Utc>,
) -> Result<TransitionResult, TransitionError> {
    if !state.pending {
        return Err(TransitionError::NoRequestInFlight);
    }

    let mut new_state = state.clone();
    new_state.append(reply, Sender::Bot, at);
    new_state.pending = false;
    Ok(TransitionResult::new(new_state).with_effect(Effect::PublishSession))
}
