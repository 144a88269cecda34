//! Summaries of the GOES X-ray and planetary Kp products that accompany the
//! solar-wind view.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::services::normalizer::{parse_number, parse_time_tag, table_rows};

const FLARE_BAND: &str = "0.1-0.8nm";

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlareSummary {
    /// W/m² in the long-wavelength band.
    pub current_flux: f64,
    pub current_class: String,
    pub observed_at: DateTime<Utc>,
    pub peak_flux: f64,
    pub peak_class: String,
    pub peak_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeomagneticSummary {
    pub current_kp: Option<f64>,
    pub observed_at: Option<DateTime<Utc>>,
    pub storm_level: String,
    pub max_predicted_kp: Option<f64>,
    pub predicted_storm_level: String,
}

/// GOES letter class with a one-decimal magnitude, e.g. `M2.1`.
pub fn flare_class(flux: f64) -> String {
    let (letter, base) = if flux < 1e-7 {
        ('A', 1e-8)
    } else if flux < 1e-6 {
        ('B', 1e-7)
    } else if flux < 1e-5 {
        ('C', 1e-6)
    } else if flux < 1e-4 {
        ('M', 1e-5)
    } else {
        ('X', 1e-4)
    };
    format!("{letter}{:.1}", flux / base)
}

/// NOAA G-scale from a Kp value.
pub fn storm_level(kp: f64) -> &'static str {
    match kp {
        kp if kp >= 9.0 => "G5",
        kp if kp >= 8.0 => "G4",
        kp if kp >= 7.0 => "G3",
        kp if kp >= 6.0 => "G2",
        kp if kp >= 5.0 => "G1",
        _ => "G0",
    }
}

pub fn summarize_flares(payload: &JsonValue) -> Option<FlareSummary> {
    let mut readings: Vec<(DateTime<Utc>, f64)> = table_rows(payload)
        .iter()
        .filter(|row| row.get("energy").and_then(|v| v.as_str()) == Some(FLARE_BAND))
        .filter_map(|row| {
            let at = row.get("time_tag").and_then(|v| v.as_str()).and_then(parse_time_tag)?;
            let flux = parse_number(row.get("flux")).filter(|flux| *flux > 0.0)?;
            Some((at, flux))
        })
        .collect();
    readings.sort_by_key(|(at, _)| *at);

    let (observed_at, current_flux) = *readings.last()?;
    let (peak_time, peak_flux) = readings
        .iter()
        .copied()
        .fold((observed_at, current_flux), |peak, reading| {
            if reading.1 > peak.1 {
                reading
            } else {
                peak
            }
        });

    Some(FlareSummary {
        current_flux,
        current_class: flare_class(current_flux),
        observed_at,
        peak_flux,
        peak_class: flare_class(peak_flux),
        peak_time,
    })
}

/// Rows marked `observed` or `estimated` count as measured; `predicted` rows
/// in the future feed the forecast maximum.
pub fn summarize_geomagnetic(payload: &JsonValue, now: DateTime<Utc>) -> Option<GeomagneticSummary> {
    let rows = table_rows(payload);
    let mut latest: Option<(DateTime<Utc>, f64)> = None;
    let mut max_predicted: Option<f64> = None;

    for row in &rows {
        let Some(at) = row.get("time_tag").and_then(|v| v.as_str()).and_then(parse_time_tag) else {
            continue;
        };
        let Some(kp) = parse_number(row.get("kp").or_else(|| row.get("Kp"))) else {
            continue;
        };
        match row.get("observed").and_then(|v| v.as_str()) {
            Some("observed" | "estimated") => {
                if latest.map_or(true, |(seen, _)| at >= seen) {
                    latest = Some((at, kp));
                }
            }
            Some("predicted") if at >= now => {
                max_predicted = Some(max_predicted.map_or(kp, |max: f64| max.max(kp)));
            }
            _ => {}
        }
    }

    if latest.is_none() && max_predicted.is_none() {
        return None;
    }
    Some(GeomagneticSummary {
        current_kp: latest.map(|(_, kp)| kp),
        observed_at: latest.map(|(at, _)| at),
        storm_level: storm_level(latest.map_or(0.0, |(_, kp)| kp)).to_string(),
        max_predicted_kp: max_predicted,
        predicted_storm_level: storm_level(max_predicted.unwrap_or(0.0)).to_string(),
    })
}
