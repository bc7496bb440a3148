//! Events that drive the environment aggregator

use crate::api::{ApiError, FishingData, WeatherReport};

/// Events that trigger aggregator transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// User asked for a location
    Search { query: String },

    /// Primary query settled
    FishingDataLoaded {
        token: u64,
        result: Result<FishingData, ApiError>,
    },

    /// Secondary query settled
    WeatherLoaded {
        token: u64,
        result: Result<WeatherReport, ApiError>,
    },
}

impl Event {
    pub fn search(query: impl Into<String>) -> Self {
        Event::Search {
            query: query.into(),
        }
    }
}
