//! Mock backends for runtime tests
//!
//! Responses are scripted per call. A scripted response can be gated so a
//! test decides exactly when the request completes, which is how completion
//! order is controlled in the last-request-wins tests.

use crate::api::{ApiError, ChatBackend, ChatRequest, FishingData, MarineDataSource, WeatherReport};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::{oneshot, watch};

/// Releases one gated response
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub fn release(self) {
        let _ = self.0.send(());
    }
}

struct Scripted<T> {
    result: Result<T, ApiError>,
    gate: Option<oneshot::Receiver<()>>,
}

impl<T> Scripted<T> {
    fn ready(result: Result<T, ApiError>) -> Self {
        Self { result, gate: None }
    }

    fn gated(result: Result<T, ApiError>) -> (Self, Gate) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                result,
                gate: Some(rx),
            },
            Gate(tx),
        )
    }

    async fn resolve(self) -> Result<T, ApiError> {
        if let Some(gate) = self.gate {
            let _ = gate.await;
        }
        self.result
    }
}

type Script<T> = Mutex<HashMap<String, VecDeque<Scripted<T>>>>;

fn push<T>(script: &Script<T>, location: &str, scripted: Scripted<T>) {
    script
        .lock()
        .unwrap()
        .entry(location.to_string())
        .or_default()
        .push_back(scripted);
}

fn pop<T>(script: &Script<T>, location: &str) -> Option<Scripted<T>> {
    script
        .lock()
        .unwrap()
        .get_mut(location)
        .and_then(VecDeque::pop_front)
}

// ============================================================================
// Mock marine data source
// ============================================================================

/// Marine data source answering from per-location scripts
pub struct MockMarineSource {
    fishing: Script<FishingData>,
    weather: Script<WeatherReport>,
    /// (endpoint, location) of every call, in call order
    calls: Mutex<Vec<(String, String)>>,
    completed: watch::Sender<usize>,
}

impl MockMarineSource {
    pub fn new() -> Self {
        Self {
            fishing: Mutex::new(HashMap::new()),
            weather: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            completed: watch::Sender::new(0),
        }
    }

    pub fn script_fishing(&self, location: &str, result: Result<FishingData, ApiError>) {
        push(&self.fishing, location, Scripted::ready(result));
    }

    pub fn script_fishing_gated(&self, location: &str, result: Result<FishingData, ApiError>) -> Gate {
        let (scripted, gate) = Scripted::gated(result);
        push(&self.fishing, location, scripted);
        gate
    }

    pub fn script_weather(&self, location: &str, result: Result<WeatherReport, ApiError>) {
        push(&self.weather, location, Scripted::ready(result));
    }

    pub fn script_weather_gated(&self, location: &str, result: Result<WeatherReport, ApiError>) -> Gate {
        let (scripted, gate) = Scripted::gated(result);
        push(&self.weather, location, scripted);
        gate
    }

    pub fn recorded_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Wait until `count` calls have returned.
    ///
    /// The runtime forwards a response to its inbox in the same poll the call
    /// returns, so on a current-thread runtime every returned response has
    /// been enqueued by the time this resolves.
    pub async fn wait_for_completions(&self, count: usize) {
        let mut completed = self.completed.subscribe();
        let _ = completed.wait_for(|n| *n >= count).await;
    }

    fn record(&self, endpoint: &str, location: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), location.to_string()));
    }

    fn complete(&self) {
        self.completed.send_modify(|n| *n += 1);
    }
}

impl Default for MockMarineSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarineDataSource for MockMarineSource {
    async fn fishing_data(&self, location: &str) -> Result<FishingData, ApiError> {
        self.record("get_fishing_data", location);
        let result = match pop(&self.fishing, location) {
            Some(scripted) => scripted.resolve().await,
            None => Err(ApiError::network("No mock fishing data queued")),
        };
        self.complete();
        result
    }

    async fn weather(&self, location: &str) -> Result<WeatherReport, ApiError> {
        self.record("weather", location);
        let result = match pop(&self.weather, location) {
            Some(scripted) => scripted.resolve().await,
            None => Err(ApiError::network("No mock weather queued")),
        };
        self.complete();
        result
    }
}

// ============================================================================
// Mock chat backend
// ============================================================================

/// Chat backend returning queued replies in order
pub struct MockChatBackend {
    replies: Mutex<VecDeque<Scripted<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_reply(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Scripted::ready(Ok(text.into())));
    }

    pub fn queue_error(&self, error: ApiError) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Scripted::ready(Err(error)));
    }

    pub fn queue_gated_reply(&self, text: impl Into<String>) -> Gate {
        let (scripted, gate) = Scripted::gated(Ok(text.into()));
        self.replies.lock().unwrap().push_back(scripted);
        gate
    }

    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockChatBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<String, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        let scripted = self.replies.lock().unwrap().pop_front();
        match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Err(ApiError::network("No mock reply queued")),
        }
    }
}
