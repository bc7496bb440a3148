//! Conversation session runtime and handle

use super::{flush, Inbox};
use crate::api::ChatBackend;
use crate::conversation::{transition, Effect, Event, SessionState};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Task owning the session state
pub struct SessionRuntime<C>
where
    C: ChatBackend + 'static,
{
    state: SessionState,
    backend: Arc<C>,
    inbox_rx: mpsc::UnboundedReceiver<Inbox<Event>>,
    inbox_tx: mpsc::WeakUnboundedSender<Inbox<Event>>,
    session_tx: watch::Sender<SessionState>,
}

impl<C> SessionRuntime<C>
where
    C: ChatBackend + 'static,
{
    pub async fn run(mut self) {
        tracing::info!(messages = self.state.messages.len(), "Conversation session started");

        while let Some(message) = self.inbox_rx.recv().await {
            match message {
                Inbox::Event(event) => self.process_event(event),
                Inbox::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }

        tracing::info!(messages = self.state.messages.len(), "Conversation session stopped");
    }

    fn process_event(&mut self, event: Event) {
        if let Event::ReplyFailed { error, .. } = &event {
            tracing::warn!(kind = error.kind.label(), error = %error, "Chat request failed");
        }

        match transition(&self.state, event) {
            Ok(result) => {
                self.state = result.new_state;
                for effect in result.effects {
                    self.execute_effect(effect);
                }
            }
            Err(e) if e.is_user_input_rejected() => {
                tracing::debug!(error = %e, "Session input ignored");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unexpected chat reply dropped");
            }
        }
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::RequestReply { request } => {
                let Some(inbox) = self.inbox_tx.upgrade() else {
                    return;
                };
                let backend = Arc::clone(&self.backend);
                tracing::debug!(history = request.history.len(), "Requesting chat reply");
                tokio::spawn(async move {
                    let event = match backend.chat(&request).await {
                        Ok(text) => Event::ReplyReceived {
                            text,
                            at: Utc::now(),
                        },
                        Err(error) => Event::ReplyFailed {
                            error,
                            at: Utc::now(),
                        },
                    };
                    let _ = inbox.send(Inbox::Event(event));
                });
            }

            Effect::PublishSession => {
                self.session_tx.send_replace(self.state.clone());
            }
        }
    }
}

/// Handle to the session task
#[derive(Clone)]
pub struct ConversationSession {
    inbox: mpsc::UnboundedSender<Inbox<Event>>,
    session_rx: watch::Receiver<SessionState>,
}

impl ConversationSession {
    /// Build the runtime without starting it
    pub fn new<C>(backend: C, initial: SessionState) -> (Self, SessionRuntime<C>)
    where
        C: ChatBackend + 'static,
    {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (session_tx, session_rx) = watch::channel(initial.clone());

        let runtime = SessionRuntime {
            state: initial,
            backend: Arc::new(backend),
            inbox_rx,
            inbox_tx: inbox_tx.downgrade(),
            session_tx,
        };
        let handle = Self {
            inbox: inbox_tx,
            session_rx,
        };
        (handle, runtime)
    }

    pub fn spawn<C>(backend: C, initial: SessionState) -> Self
    where
        C: ChatBackend + 'static,
    {
        let (handle, runtime) = Self::new(backend, initial);
        tokio::spawn(runtime.run());
        handle
    }

    /// Start a session opening with a bot greeting
    pub fn with_greeting<C>(backend: C, greeting: impl Into<String>) -> Self
    where
        C: ChatBackend + 'static,
    {
        Self::spawn(backend, SessionState::with_greeting(greeting, Utc::now()))
    }

    pub fn update_draft(&self, text: impl Into<String>) {
        self.deliver(Event::DraftEdited { text: text.into() });
    }

    /// Send the current draft. Ignored while a reply is pending or when the
    /// draft is blank.
    pub fn send(&self) {
        self.deliver(Event::SendRequested { at: Utc::now() });
    }

    /// Append a bot message carrying context, such as a conditions briefing.
    /// Ignored while a reply is pending.
    pub fn prime(&self, briefing: impl Into<String>) {
        self.deliver(Event::Primed {
            briefing: briefing.into(),
            at: Utc::now(),
        });
    }

    pub fn snapshot(&self) -> SessionState {
        self.session_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.session_rx.clone()
    }

    pub async fn flush(&self) {
        flush(&self.inbox).await;
    }

    /// Wait until no reply is pending and return the session
    pub async fn settled(&self) -> SessionState {
        self.flush().await;
        let mut session_rx = self.session_rx.clone();
        let settled = session_rx
            .wait_for(|session| !session.pending)
            .await
            .map(|session| session.clone());
        settled.unwrap_or_else(|_| self.snapshot())
    }

    fn deliver(&self, event: Event) {
        if self.inbox.send(Inbox::Event(event)).is_err() {
            tracing::warn!("Conversation session is not running; input dropped");
        }
    }
}
