//! Conversation session state machine
//!
//! `idle --send--> pending --(reply | failure)--> idle`. Every accepted user
//! message is answered by exactly one bot message, and the full history is
//! replayed to the stateless chat backend on each request.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ChatMessage, Sender, SessionState, FALLBACK_REPLY};
pub use transition::{transition, TransitionError, TransitionResult};
