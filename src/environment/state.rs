//! View model and search bookkeeping

use crate::api::{FishingData, WeatherReport};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Zones at or below this distance (km) from the border get a caution note
pub const ZONE_CAUTION_KM: f64 = 8.0;
/// Zones at or below this distance (km) get the stronger warning
pub const ZONE_DANGER_KM: f64 = 5.0;

// ============================================================================
// View Model
// ============================================================================

/// Lifecycle of the latest search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    /// No search issued yet
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

impl RequestState {
    pub fn is_settled(self) -> bool {
        !matches!(self, RequestState::Loading)
    }
}

/// Current conditions at the searched location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub conditions: String,
    pub description: Option<String>,
    /// km/h
    pub wind_speed: f64,
    /// Percent
    pub humidity: Option<f64>,
    pub icon: Option<String>,
    pub observed_at: Option<NaiveDateTime>,
}

/// One forecast slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: String,
    pub time: String,
    pub temperature: f64,
    pub conditions: String,
    pub description: String,
    pub wind_speed: f64,
    pub icon: String,
}

/// One marine forecast slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarineReading {
    pub time: String,
    pub wind_speed: f64,
    pub wind_direction_degrees: f64,
    pub wind_direction_compass: String,
    pub conditions: String,
    /// Probability of precipitation, percent
    pub rain_chance: f64,
    pub sea_level: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    #[default]
    Normal,
    Severe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub title: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub source: String,
    pub severity: AlertSeverity,
}

/// Per-zone proximity note, independent of the global border warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneAdvisory {
    Caution,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishingZone {
    pub name: String,
    pub distance: String,
    pub conditions: String,
    pub border_proximity_km: Option<f64>,
}

impl FishingZone {
    pub fn advisory(&self) -> Option<ZoneAdvisory> {
        match self.border_proximity_km? {
            km if km <= ZONE_DANGER_KM => Some(ZoneAdvisory::Danger),
            km if km <= ZONE_CAUTION_KM => Some(ZoneAdvisory::Caution),
            _ => None,
        }
    }
}

/// Global border warning, only ever set from the primary response's flag
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BorderWarning {
    pub active: bool,
    pub distance_km: f64,
}

/// Everything a renderer needs for the latest search
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewModel {
    /// Last successfully queried location; empty until the first success
    pub location: String,
    pub current_weather: Option<CurrentWeather>,
    pub forecast: Vec<ForecastEntry>,
    pub marine: Vec<MarineReading>,
    pub alerts: Vec<WeatherAlert>,
    pub fishing_zones: Vec<FishingZone>,
    pub border_warning: BorderWarning,
    pub request_state: RequestState,
}

impl ViewModel {
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    /// Plain-text summary of a ready view, used to prime the assistant
    pub fn briefing(&self) -> Option<String> {
        if self.request_state != RequestState::Ready || self.location.is_empty() {
            return None;
        }

        let mut parts = vec![format!("Conditions at {}:", self.location)];
        if let Some(weather) = &self.current_weather {
            parts.push(format!(
                "{}°C, {}, wind {} km/h.",
                weather.temperature, weather.conditions, weather.wind_speed
            ));
        } else {
            parts.push("no current weather available.".to_string());
        }
        if self.border_warning.active {
            parts.push(format!(
                "Border warning: {} km from international waters.",
                self.border_warning.distance_km
            ));
        }
        if self.has_alerts() {
            let titles: Vec<&str> = self.alerts.iter().map(|a| a.title.as_str()).collect();
            parts.push(format!("Active alerts: {}.", titles.join(", ")));
        }
        Some(parts.join(" "))
    }
}

// ============================================================================
// Search bookkeeping
// ============================================================================

/// Progress of one of the two queries of a search
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Leg<T> {
    #[default]
    Waiting,
    Landed(T),
    Failed,
}

impl<T> Leg<T> {
    pub fn is_waiting(&self) -> bool {
        matches!(self, Leg::Waiting)
    }

    pub fn landed(&self) -> Option<&T> {
        match self {
            Leg::Landed(value) => Some(value),
            _ => None,
        }
    }
}

/// The search whose responses may still write to the view
#[derive(Debug, Clone, PartialEq)]
pub struct InFlightSearch {
    pub token: u64,
    pub location: String,
    pub primary: Leg<FishingData>,
    pub secondary: Leg<WeatherReport>,
}

impl InFlightSearch {
    pub fn new(token: u64, location: impl Into<String>) -> Self {
        Self {
            token,
            location: location.into(),
            primary: Leg::Waiting,
            secondary: Leg::Waiting,
        }
    }
}

/// Full aggregator state: the published view plus the request counter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregatorState {
    pub view: ViewModel,
    /// Incremented on every accepted search; responses carrying an older
    /// token are dropped
    pub current_token: u64,
    pub in_flight: Option<InFlightSearch>,
}
