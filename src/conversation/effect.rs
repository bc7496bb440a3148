//! Effects produced by session transitions

use crate::api::ChatRequest;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send one chat request; its outcome comes back as a reply event
    RequestReply { request: ChatRequest },

    /// Push the current session to observers
    PublishSession,
}
