//! Pure state transition function for the aggregator
//!
//! No I/O happens here: given the same state and event it always produces
//! the same new state and effects.

use super::merge::compose;
use super::state::{AggregatorState, InFlightSearch, Leg, RequestState};
use super::{Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: AggregatorState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: AggregatorState) -> Self {
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

/// Events the aggregator refuses; the runtime logs and drops them
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Search query is empty")]
    EmptyQuery,
    #[error("Response for search {token} superseded by search {current}")]
    StaleResponse { token: u64, current: u64 },
    #[error("Search {token} is not waiting for this response")]
    UnexpectedResponse { token: u64 },
}

impl TransitionError {
    /// Rejections caused directly by user input (as opposed to late responses)
    pub fn is_user_input_rejected(&self) -> bool {
        matches!(self, TransitionError::EmptyQuery)
    }
}

pub fn transition(state: &AggregatorState, event: Event) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::Search { query } => {
            let location = query.trim();
            if location.is_empty() {
                return Err(TransitionError::EmptyQuery);
            }

            // A new search always re-enters Loading and replaces whatever was
            // in flight; the previous view stays until this one settles.
            let token = state.current_token + 1;
            let mut new_state = state.clone();
            new_state.current_token = token;
            new_state.in_flight = Some(InFlightSearch::new(token, location));
            new_state.view.request_state = RequestState::Loading;

            Ok(TransitionResult::new(new_state)
                .with_effect(Effect::FetchFishingData {
                    token,
                    location: location.to_string(),
                })
                .with_effect(Effect::FetchWeather {
                    token,
                    location: location.to_string(),
                })
                .with_effect(Effect::PublishView))
        }

        Event::FishingDataLoaded { token, result } => {
            let mut new_state = state.clone();
            let search = current_search(&mut new_state, token)?;
            if !search.primary.is_waiting() {
                return Err(TransitionError::UnexpectedResponse { token });
            }

            match result {
                Ok(data) => {
                    search.primary = Leg::Landed(data);
                    Ok(settle_if_complete(new_state))
                }
                Err(_) => {
                    // Primary failure fails the whole search; the previous
                    // view is kept and the secondary response will be dropped
                    new_state.in_flight = None;
                    new_state.view.request_state = RequestState::Failed;
                    Ok(TransitionResult::new(new_state).with_effect(Effect::PublishView))
                }
            }
        }

        Event::WeatherLoaded { token, result } => {
            let mut new_state = state.clone();
            let search = current_search(&mut new_state, token)?;
            if !search.secondary.is_waiting() {
                return Err(TransitionError::UnexpectedResponse { token });
            }

            search.secondary = match result {
                Ok(report) => Leg::Landed(report),
                Err(_) => Leg::Failed,
            };
            Ok(settle_if_complete(new_state))
        }
    }
}

fn current_search(
    state: &mut AggregatorState,
    token: u64,
) -> Result<&mut InFlightSearch, TransitionError> {
    let current = state.current_token;
    if token != current {
        return Err(TransitionError::StaleResponse { token, current });
    }
    state
        .in_flight
        .as_mut()
        .filter(|search| search.token == token)
        .ok_or(TransitionError::UnexpectedResponse { token })
}

/// Commit the search once the primary landed and the secondary settled
fn settle_if_complete(mut state: AggregatorState) -> TransitionResult {
    let committed = match &state.in_flight {
        Some(search) if !search.secondary.is_waiting() => search
            .primary
            .landed()
            .map(|primary| compose(&search.location, primary, search.secondary.landed())),
        _ => None,
    };

    match committed {
        Some(view) => {
            state.view = view;
            state.in_flight = None;
            TransitionResult::new(state).with_effect(Effect::PublishView)
        }
        None => TransitionResult::new(state),
    }
}
