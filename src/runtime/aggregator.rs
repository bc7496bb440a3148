//! Environment aggregator runtime and handle

use super::{flush, Inbox};
use crate::api::MarineDataSource;
use crate::environment::{transition, AggregatorState, Effect, Event, RequestState, ViewModel};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Task owning the aggregator state
pub struct AggregatorRuntime<A>
where
    A: MarineDataSource + 'static,
{
    state: AggregatorState,
    source: Arc<A>,
    inbox_rx: mpsc::UnboundedReceiver<Inbox<Event>>,
    /// Weak so the runtime stops once every handle is dropped
    inbox_tx: mpsc::WeakUnboundedSender<Inbox<Event>>,
    view_tx: watch::Sender<ViewModel>,
}

impl<A> AggregatorRuntime<A>
where
    A: MarineDataSource + 'static,
{
    pub async fn run(mut self) {
        tracing::info!("Environment aggregator started");

        while let Some(message) = self.inbox_rx.recv().await {
            match message {
                Inbox::Event(event) => self.process_event(event),
                Inbox::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }

        tracing::info!("Environment aggregator stopped");
    }

    fn process_event(&mut self, event: Event) {
        log_response_failure(&event);

        let result = match transition(&self.state, event) {
            Ok(r) => r,
            Err(e) if e.is_user_input_rejected() => {
                tracing::debug!(error = %e, "Search rejected");
                return;
            }
            Err(e) => {
                tracing::debug!(error = %e, "Dropping response");
                return;
            }
        };

        let previous = self.state.view.request_state;
        self.state = result.new_state;
        let current = self.state.view.request_state;
        if previous != current || current == RequestState::Loading {
            let location = self
                .state
                .in_flight
                .as_ref()
                .map_or(self.state.view.location.as_str(), |search| search.location.as_str());
            tracing::info!(
                token = self.state.current_token,
                from = ?previous,
                to = ?current,
                location,
                "Search state changed"
            );
        }

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::FetchFishingData { token, location } => {
                let Some(inbox) = self.inbox_tx.upgrade() else {
                    return;
                };
                let source = Arc::clone(&self.source);
                tokio::spawn(async move {
                    let result = source.fishing_data(&location).await;
                    let _ = inbox.send(Inbox::Event(Event::FishingDataLoaded { token, result }));
                });
            }

            Effect::FetchWeather { token, location } => {
                let Some(inbox) = self.inbox_tx.upgrade() else {
                    return;
                };
                let source = Arc::clone(&self.source);
                tokio::spawn(async move {
                    let result = source.weather(&location).await;
                    let _ = inbox.send(Inbox::Event(Event::WeatherLoaded { token, result }));
                });
            }

            Effect::PublishView => {
                self.view_tx.send_replace(self.state.view.clone());
            }
        }
    }
}

fn log_response_failure(event: &Event) {
    match event {
        Event::FishingDataLoaded {
            token,
            result: Err(e),
        } => {
            tracing::warn!(token, kind = e.kind.label(), error = %e, "Fishing data query failed");
        }
        Event::WeatherLoaded {
            token,
            result: Err(e),
        } => {
            tracing::warn!(token, kind = e.kind.label(), error = %e, "Weather query failed");
        }
        _ => {}
    }
}

/// Handle to the aggregator task; the only way to mutate the view
#[derive(Clone)]
pub struct EnvironmentAggregator {
    inbox: mpsc::UnboundedSender<Inbox<Event>>,
    view_rx: watch::Receiver<ViewModel>,
}

impl EnvironmentAggregator {
    /// Build the runtime without starting it
    pub fn new<A>(source: A) -> (Self, AggregatorRuntime<A>)
    where
        A: MarineDataSource + 'static,
    {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(ViewModel::default());

        let runtime = AggregatorRuntime {
            state: AggregatorState::default(),
            source: Arc::new(source),
            inbox_rx,
            inbox_tx: inbox_tx.downgrade(),
            view_tx,
        };
        let handle = Self {
            inbox: inbox_tx,
            view_rx,
        };
        (handle, runtime)
    }

    /// Start the aggregator on the current tokio runtime
    pub fn spawn<A>(source: A) -> Self
    where
        A: MarineDataSource + 'static,
    {
        let (handle, runtime) = Self::new(source);
        tokio::spawn(runtime.run());
        handle
    }

    /// Start a search. Fire-and-forget: progress is observed through the view.
    /// Blank queries are ignored.
    pub fn search(&self, query: impl Into<String>) {
        if self.inbox.send(Inbox::Event(Event::search(query))).is_err() {
            tracing::warn!("Environment aggregator is not running; search dropped");
        }
    }

    /// Latest published view
    pub fn snapshot(&self) -> ViewModel {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewModel> {
        self.view_rx.clone()
    }

    /// Wait until every call made so far has been applied
    pub async fn flush(&self) {
        flush(&self.inbox).await;
    }

    /// Wait for the latest search to settle and return the resulting view
    pub async fn settled(&self) -> ViewModel {
        self.flush().await;
        let mut view_rx = self.view_rx.clone();
        let settled = view_rx
            .wait_for(|view| view.request_state.is_settled())
            .await
            .map(|view| view.clone());
        settled.unwrap_or_else(|_| self.snapshot())
    }
}
