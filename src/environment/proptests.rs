//! Property-based tests for the aggregator state machine

use super::state::*;
use super::transition::*;
use super::*;
use crate::api::types::{WeatherShape, ZoneShape};
use crate::api::{ApiError, FishingData, WeatherReport};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

const PORTS: [&str; 6] = [
    "Chennai",
    "Cuddalore",
    "Nagapattinam",
    "Rameswaram",
    "Thoothukudi",
    "Palk Bay",
];

/// Scripted outcome of one search
#[derive(Debug, Clone)]
struct SearchScript {
    location: String,
    primary_ok: bool,
    border: bool,
    border_km: u8,
    secondary_ok: bool,
    secondary_humidity: bool,
}

fn primary_for(script: &SearchScript) -> Result<FishingData, ApiError> {
    if !script.primary_ok {
        return Err(ApiError::network("Connection failed"));
    }
    Ok(FishingData {
        weather: Some(WeatherShape {
            temperature: Some(28.0),
            conditions: Some(format!("primary {}", script.location)),
            wind_speed: Some(15.0),
            humidity: Some(70.0),
            ..WeatherShape::default()
        }),
        fishing_zones: Some(vec![ZoneShape {
            name: Some(format!("Coastal Zone near {}", script.location)),
            distance: Some("5km".to_string()),
            conditions: Some("Favorable".to_string()),
            border_proximity: Some(f64::from(script.border_km) + 2.0),
        }]),
        border_warning: Some(script.border),
        border_distance: Some(f64::from(script.border_km)),
        alerts: None,
    })
}

fn secondary_for(script: &SearchScript) -> Result<WeatherReport, ApiError> {
    if !script.secondary_ok {
        return Err(ApiError::parse("Failed to parse response"));
    }
    Ok(WeatherReport {
        current: Some(WeatherShape {
            temperature: Some(30.0),
            conditions: Some(format!("secondary {}", script.location)),
            humidity: script.secondary_humidity.then_some(82.0),
            ..WeatherShape::default()
        }),
        ..WeatherReport::default()
    })
}

fn arb_script() -> impl Strategy<Value = SearchScript> {
    (
        prop::sample::select(PORTS.to_vec()),
        any::<bool>(),
        any::<bool>(),
        0u8..12,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(location, primary_ok, border, border_km, secondary_ok, secondary_humidity)| {
                SearchScript {
                    location: location.to_string(),
                    primary_ok,
                    border,
                    border_km,
                    secondary_ok,
                    secondary_humidity,
                }
            },
        )
}

fn response_events(token: u64, script: &SearchScript) -> [Event; 2] {
    [
        Event::FishingDataLoaded {
            token,
            result: primary_for(script),
        },
        Event::WeatherLoaded {
            token,
            result: secondary_for(script),
        },
    ]
}

/// Several searches issued back-to-back, then all responses in any order
fn arb_back_to_back() -> impl Strategy<Value = (Vec<SearchScript>, Vec<Event>)> {
    prop::collection::vec(arb_script(), 1..5).prop_flat_map(|scripts| {
        let responses: Vec<Event> = scripts
            .iter()
            .zip(1u64..)
            .flat_map(|(script, token)| response_events(token, script))
            .collect();
        (Just(scripts), Just(responses).prop_shuffle())
    })
}

/// Arbitrary interleaving of searches and (possibly stale) responses
fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        prop::sample::select(vec!["", "  ", "Chennai", "Rameswaram", "Palk Bay"])
            .prop_map(Event::search),
        (0u64..6, arb_script()).prop_map(|(token, script)| Event::FishingDataLoaded {
            token,
            result: primary_for(&script),
        }),
        (0u64..6, arb_script()).prop_map(|(token, script)| Event::WeatherLoaded {
            token,
            result: secondary_for(&script),
        }),
    ]
}

fn run(state: AggregatorState, events: impl IntoIterator<Item = Event>) -> AggregatorState {
    events.into_iter().fold(state, |state, event| {
        transition(&state, event).map_or(state, |result| result.new_state)
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Only the last of several back-to-back searches is ever reflected,
    /// whatever order the responses arrive in
    #[test]
    fn prop_last_request_wins((scripts, responses) in arb_back_to_back()) {
        let mut state = AggregatorState::default();
        for script in &scripts {
            state = run(state, [Event::search(script.location.clone())]);
        }
        let state = run(state, responses);

        let last = scripts.last().unwrap();
        prop_assert!(state.in_flight.is_none());
        prop_assert_eq!(state.current_token, scripts.len() as u64);

        if last.primary_ok {
            prop_assert_eq!(state.view.request_state, RequestState::Ready);
            prop_assert_eq!(&state.view.location, &last.location);
            prop_assert_eq!(state.view.fishing_zones.len(), 1);
            prop_assert_eq!(
                &state.view.fishing_zones[0].name,
                &format!("Coastal Zone near {}", last.location)
            );
            prop_assert_eq!(state.view.border_warning.active, last.border);

            let weather = state.view.current_weather.as_ref().unwrap();
            let expected_source = if last.secondary_ok { "secondary" } else { "primary" };
            prop_assert_eq!(
                &weather.conditions,
                &format!("{expected_source} {}", last.location)
            );
            // Humidity is never erased by an omitting secondary response
            let expected_humidity = if last.secondary_ok && last.secondary_humidity { 82.0 } else { 70.0 };
            prop_assert_eq!(weather.humidity, Some(expected_humidity));
        } else {
            // Nothing committed before the last search, so only the state moved
            prop_assert_eq!(
                state.view,
                ViewModel { request_state: RequestState::Failed, ..ViewModel::default() }
            );
        }
    }

    /// Structural invariants hold for any event sequence
    #[test]
    fn prop_invariants_hold(events in prop::collection::vec(arb_event(), 0..30)) {
        let mut state = AggregatorState::default();
        let mut accepted_searches = 0u64;

        for event in events {
            let is_search = matches!(event, Event::Search { .. });
            let before = state.clone();
            match transition(&state, event) {
                Ok(result) => {
                    if is_search {
                        accepted_searches += 1;
                        prop_assert_eq!(result.new_state.view.request_state, RequestState::Loading);
                    }
                    state = result.new_state;
                }
                Err(_) => {
                    // Rejected events never change anything
                    prop_assert_eq!(&state, &before);
                }
            }

            prop_assert_eq!(state.current_token, accepted_searches);
            if accepted_searches > 0 {
                prop_assert_ne!(state.view.request_state, RequestState::Idle);
            }
            if state.view.request_state == RequestState::Loading {
                prop_assert!(state.in_flight.is_some());
            } else {
                prop_assert!(state.in_flight.is_none());
            }
            if let Some(search) = &state.in_flight {
                prop_assert_eq!(search.token, state.current_token);
            }
            // The border flag only ever comes from an explicit primary signal
            if state.view.border_warning.active {
                prop_assert!(!state.view.location.is_empty());
            }
        }
    }
}
