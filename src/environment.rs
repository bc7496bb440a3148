//! Environment aggregator state machine
//!
//! Each search issues a primary (zones/border) and a secondary
//! (weather/forecast/marine/alerts) query. Their responses are merged into a
//! single [`ViewModel`]; only the latest search may write to it.

mod effect;
pub mod event;
pub mod merge;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{
    AggregatorState, AlertSeverity, BorderWarning, CurrentWeather, FishingZone, ForecastEntry,
    MarineReading, RequestState, ViewModel, WeatherAlert, ZoneAdvisory,
};
pub use transition::{transition, TransitionError, TransitionResult};
