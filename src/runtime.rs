//! Runtimes driving the two state machines
//!
//! Each component runs as a single task that owns its state, drains an
//! inbox one message at a time and executes the effects returned by the
//! pure transition function. Requests are spawned as background tasks that
//! report back through the same inbox, so state is only ever mutated by the
//! owning task. Observers get read-only snapshots over a `watch` channel.

mod aggregator;
mod session;

#[cfg(test)]
pub mod testing;

pub use aggregator::{AggregatorRuntime, EnvironmentAggregator};
pub use session::{ConversationSession, SessionRuntime};

use tokio::sync::{mpsc, oneshot};

/// Message delivered to a runtime task
#[derive(Debug)]
pub enum Inbox<E> {
    /// Feed an event to the state machine
    Event(E),
    /// Acknowledge once every earlier message has been applied
    Flush(oneshot::Sender<()>),
}

/// Send a flush marker and wait for the runtime to reach it.
/// Returns immediately if the runtime has stopped.
async fn flush<E>(inbox: &mpsc::UnboundedSender<Inbox<E>>) {
    let (ack_tx, ack_rx) = oneshot::channel();
    if inbox.send(Inbox::Flush(ack_tx)).is_ok() {
        let _ = ack_rx.await;
    }
}
