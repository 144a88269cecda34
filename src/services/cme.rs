use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::services::normalizer::{is_truthy, parse_number_or_default};
use crate::services::simulated::fallback_cme_events;

pub const SOURCE_DONKI: &str = "NASA DONKI";
pub const SOURCE_FALLBACK: &str = "Fallback Data";

const MAX_EVENTS: usize = 10;
const EARTH_CONE_DEG: f64 = 30.0;
const SUN_EARTH_DISTANCE_KM: f64 = 150e6;
const TRACKING_WINDOW_HOURS: f64 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub enum CmeDirection {
    #[serde(rename = "Earth-directed")]
    EarthDirected,
    #[serde(rename = "Off-limb")]
    OffLimb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub enum CmeIntensity {
    Weak,
    Moderate,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub enum CmeStatus {
    Tracking,
    Dissipating,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CmeEvent {
    pub id: String,
    /// Start time as reported upstream.
    pub start_time: String,
    /// km/s at 21.5 solar radii.
    pub speed: f64,
    pub direction: CmeDirection,
    pub intensity: CmeIntensity,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub status: CmeStatus,
    pub source: String,
}

/// DONKI stamps look like `2024-05-10T06:36Z`; full RFC 3339 also parses.
pub fn parse_donki_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%MZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S%.fZ"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Earth-directed when both angles are present and inside the ±30° cone.
/// A `null` latitude or longitude counts as missing.
pub fn determine_direction(analysis: &Map<String, JsonValue>) -> CmeDirection {
    let (Some(latitude), Some(longitude)) = (
        analysis.get("latitude").filter(|v| !v.is_null()),
        analysis.get("longitude").filter(|v| !v.is_null()),
    ) else {
        return CmeDirection::OffLimb;
    };
    let latitude = parse_number_or_default(Some(latitude), 0.0);
    let longitude = parse_number_or_default(Some(longitude), 0.0);
    if latitude.abs() < EARTH_CONE_DEG && longitude.abs() < EARTH_CONE_DEG {
        CmeDirection::EarthDirected
    } else {
        CmeDirection::OffLimb
    }
}

pub fn classify_intensity(speed: f64) -> CmeIntensity {
    if speed > 1000.0 {
        CmeIntensity::Strong
    } else if speed > 500.0 {
        CmeIntensity::Moderate
    } else {
        CmeIntensity::Weak
    }
}

/// Constant-speed transit over 1 AU; `None` unless Earth-directed.
pub fn calculate_arrival(
    direction: CmeDirection,
    start: DateTime<Utc>,
    speed_km_s: f64,
) -> Option<DateTime<Utc>> {
    if direction != CmeDirection::EarthDirected || speed_km_s <= 0.0 {
        return None;
    }
    let travel_ms = (SUN_EARTH_DISTANCE_KM / speed_km_s) * 1000.0;
    if !travel_ms.is_finite() {
        return None;
    }
    start.checked_add_signed(Duration::milliseconds(travel_ms.round() as i64))
}

pub fn cme_status(direction: CmeDirection, start: DateTime<Utc>, now: DateTime<Utc>) -> CmeStatus {
    let hours_since = (now - start).num_milliseconds() as f64 / 3_600_000.0;
    if direction == CmeDirection::EarthDirected && hours_since < TRACKING_WINDOW_HOURS {
        CmeStatus::Tracking
    } else {
        CmeStatus::Dissipating
    }
}

/// Maps a DONKI `CMEAnalysis` payload to at most ten events. A payload that
/// is not an array yields the fallback event.
pub fn process_cme_data(payload: &JsonValue, now: DateTime<Utc>) -> Vec<CmeEvent> {
    let Some(entries) = payload.as_array() else {
        return fallback_cme_events(now);
    };

    entries
        .iter()
        .filter_map(|entry| entry.as_object())
        .filter(|analysis| is_truthy(analysis.get("speed21_5")))
        .filter_map(|analysis| {
            let start_raw = analysis.get("startTime")?.as_str()?;
            let start = parse_donki_time(start_raw)?;
            Some(build_event(analysis, start_raw, start, now))
        })
        .take(MAX_EVENTS)
        .collect()
}

fn build_event(
    analysis: &Map<String, JsonValue>,
    start_raw: &str,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> CmeEvent {
    let speed = parse_number_or_default(analysis.get("speed21_5"), 0.0);
    let direction = determine_direction(analysis);
    let id = analysis
        .get("associatedCMEID")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("CME-{}", start.timestamp_millis()));

    CmeEvent {
        id,
        start_time: start_raw.to_string(),
        speed,
        direction,
        intensity: classify_intensity(speed),
        estimated_arrival: calculate_arrival(direction, start, speed),
        status: cme_status(direction, start, now),
        source: SOURCE_DONKI.to_string(),
    }
}
