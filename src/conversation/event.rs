//! Events that drive the conversation session

use crate::api::ApiError;
use chrono::{DateTime, Utc};

/// Events that trigger session transitions
///
/// Timestamps travel with the event so the transition stays pure.
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    DraftEdited { text: String },
    SendRequested { at: DateTime<Utc> },

    // Chat backend events
    ReplyReceived { text: String, at: DateTime<Utc> },
    ReplyFailed { error: ApiError, at: DateTime<Utc> },

    /// Location/weather context pushed in from the aggregator
    Primed { briefing: String, at: DateTime<Utc> },
}
