//! Wire shapes of the marine data and chat endpoints
//!
//! Every field is optional on the wire. Absence is tolerated everywhere and
//! only the domain layer decides what a missing value means.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Current conditions as reported by either endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeatherShape {
    pub temperature: Option<f64>,
    pub conditions: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "windSpeed")]
    pub wind_speed: Option<f64>,
    pub humidity: Option<f64>,
    pub icon: Option<String>,
    pub timestamp: Option<String>,
}

/// One forecast slot
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ForecastShape {
    pub date: Option<String>,
    pub time: Option<String>,
    pub temperature: Option<f64>,
    pub conditions: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "windSpeed")]
    pub wind_speed: Option<f64>,
    pub icon: Option<String>,
}

/// One marine forecast slot
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MarineShape {
    pub time: Option<String>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub wind_direction_compass: Option<String>,
    pub conditions: Option<String>,
    pub rain_chance: Option<f64>,
    pub sea_level: Option<f64>,
}

/// Weather alert
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlertShape {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub source: Option<String>,
    pub severity: Option<String>,
}

/// Recommended fishing zone
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ZoneShape {
    pub name: Option<String>,
    pub distance: Option<String>,
    pub conditions: Option<String>,
    #[serde(rename = "borderProximity")]
    pub border_proximity: Option<f64>,
}

/// `GET /get_fishing_data?location=..`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FishingData {
    pub weather: Option<WeatherShape>,
    pub fishing_zones: Option<Vec<ZoneShape>>,
    pub border_warning: Option<bool>,
    pub border_distance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_alerts")]
    pub alerts: Option<Vec<AlertShape>>,
}

/// `GET /weather/<location>`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeatherReport {
    pub current: Option<WeatherShape>,
    pub forecast: Option<Vec<ForecastShape>>,
    pub marine: Option<Vec<MarineShape>>,
    #[serde(default, deserialize_with = "lenient_alerts")]
    pub alerts: Option<Vec<AlertShape>>,
}

/// Role of a replayed history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Model,
}

/// Replayed history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: WireRole,
    pub content: String,
}

/// `POST /chat` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
}

/// `POST /chat` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    pub response: Option<String>,
}

/// `alerts` that is not an array decodes as absent rather than a parse
/// failure, so it never shadows alerts from the other response.
/// Entries that do not look like alerts are dropped individually.
fn lenient_alerts<'de, D>(deserializer: D) -> Result<Option<Vec<AlertShape>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        Some(_) => None,
    })
}
