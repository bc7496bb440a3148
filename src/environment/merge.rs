//! Field-wise merge of the primary and secondary responses
//!
//! The secondary response is the more detailed weather source: every field it
//! carries wins, every field it omits falls back to the primary response.

use super::state::{
    AlertSeverity, BorderWarning, CurrentWeather, FishingZone, ForecastEntry, MarineReading,
    RequestState, ViewModel, WeatherAlert,
};
use crate::api::types::{AlertShape, ForecastShape, MarineShape, WeatherShape, ZoneShape};
use crate::api::{FishingData, WeatherReport};
use chrono::{DateTime, NaiveDateTime};

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Build the committed view of a settled search
pub fn compose(location: &str, primary: &FishingData, secondary: Option<&WeatherReport>) -> ViewModel {
    let weather = overlay_weather(
        primary.weather.as_ref(),
        secondary.and_then(|s| s.current.as_ref()),
    );

    let alerts = secondary
        .and_then(|s| s.alerts.as_ref())
        .or(primary.alerts.as_ref())
        .map(|alerts| alerts.iter().map(weather_alert).collect())
        .unwrap_or_default();

    ViewModel {
        location: location.to_string(),
        current_weather: weather.as_ref().and_then(current_weather),
        forecast: secondary
            .and_then(|s| s.forecast.as_ref())
            .map(|slots| slots.iter().filter_map(forecast_entry).collect())
            .unwrap_or_default(),
        marine: secondary
            .and_then(|s| s.marine.as_ref())
            .map(|slots| slots.iter().filter_map(marine_reading).collect())
            .unwrap_or_default(),
        alerts,
        fishing_zones: primary
            .fishing_zones
            .as_ref()
            .map(|zones| zones.iter().map(fishing_zone).collect())
            .unwrap_or_default(),
        border_warning: border_warning(primary),
        request_state: RequestState::Ready,
    }
}

/// `top` fields win where present; absent fields never erase `base`
pub fn overlay_weather(base: Option<&WeatherShape>, top: Option<&WeatherShape>) -> Option<WeatherShape> {
    match (base, top) {
        (None, None) => None,
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (Some(base), Some(top)) => Some(WeatherShape {
            temperature: top.temperature.or(base.temperature),
            conditions: top.conditions.clone().or_else(|| base.conditions.clone()),
            description: top.description.clone().or_else(|| base.description.clone()),
            wind_speed: top.wind_speed.or(base.wind_speed),
            humidity: top.humidity.or(base.humidity),
            icon: top.icon.clone().or_else(|| base.icon.clone()),
            timestamp: top.timestamp.clone().or_else(|| base.timestamp.clone()),
        }),
    }
}

pub fn border_warning(primary: &FishingData) -> BorderWarning {
    BorderWarning {
        active: primary.border_warning.unwrap_or(false),
        distance_km: primary.border_distance.unwrap_or(0.0),
    }
}

/// 16-point compass name for a bearing in degrees
pub fn compass_point(degrees: f64) -> &'static str {
    // rem_euclid keeps negative and >360 bearings on the rose
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (degrees.rem_euclid(360.0) / 22.5).round_ties_even() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

/// Backend stamps observations as local `YYYY-MM-DD HH:MM`
pub fn parse_observed_at(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

fn current_weather(shape: &WeatherShape) -> Option<CurrentWeather> {
    Some(CurrentWeather {
        temperature: shape.temperature?,
        conditions: shape.conditions.clone().unwrap_or_default(),
        description: shape.description.clone(),
        wind_speed: shape.wind_speed.unwrap_or(0.0),
        humidity: shape.humidity,
        icon: shape.icon.clone(),
        observed_at: shape.timestamp.as_deref().and_then(parse_observed_at),
    })
}

fn forecast_entry(slot: &ForecastShape) -> Option<ForecastEntry> {
    Some(ForecastEntry {
        date: slot.date.clone()?,
        time: slot.time.clone().unwrap_or_default(),
        temperature: slot.temperature?,
        conditions: slot.conditions.clone().unwrap_or_default(),
        description: slot.description.clone().unwrap_or_default(),
        wind_speed: slot.wind_speed.unwrap_or(0.0),
        icon: slot.icon.clone().unwrap_or_default(),
    })
}

fn marine_reading(slot: &MarineShape) -> Option<MarineReading> {
    let degrees = slot.wind_direction.unwrap_or(0.0);
    Some(MarineReading {
        time: slot.time.clone()?,
        wind_speed: slot.wind_speed.unwrap_or(0.0),
        wind_direction_degrees: degrees,
        wind_direction_compass: slot
            .wind_direction_compass
            .clone()
            .unwrap_or_else(|| compass_point(degrees).to_string()),
        conditions: slot.conditions.clone().unwrap_or_default(),
        rain_chance: slot.rain_chance.unwrap_or(0.0),
        sea_level: slot.sea_level,
    })
}

fn weather_alert(alert: &AlertShape) -> WeatherAlert {
    let severity = match alert.severity.as_deref() {
        Some(s) if s.eq_ignore_ascii_case("severe") => AlertSeverity::Severe,
        _ => AlertSeverity::Normal,
    };
    WeatherAlert {
        title: alert
            .title
            .clone()
            .unwrap_or_else(|| "Weather Alert".to_string()),
        description: alert.description.clone().unwrap_or_default(),
        start: alert.start.clone().unwrap_or_default(),
        end: alert.end.clone().unwrap_or_default(),
        source: alert.source.clone().unwrap_or_default(),
        severity,
    }
}

fn fishing_zone(zone: &ZoneShape) -> FishingZone {
    FishingZone {
        name: zone.name.clone().unwrap_or_default(),
        distance: zone.distance.clone().unwrap_or_default(),
        conditions: zone.conditions.clone().unwrap_or_default(),
        border_proximity_km: zone.border_proximity,
    }
}
