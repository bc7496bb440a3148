//! SmartSea client core
//!
//! Marine conditions and fishing assistant for small-boat fishers. The
//! [`runtime::EnvironmentAggregator`] merges the fishing-data and weather
//! endpoints into one view per searched location, and the
//! [`runtime::ConversationSession`] keeps the chat history with the
//! stateless assistant backend.

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate, clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod conversation;
pub mod environment;
pub mod runtime;
