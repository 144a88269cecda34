//! Turns SWPC magnetometer and plasma payloads into one time-ordered series
//! plus the derived views the dashboard consumes (current conditions,
//! downsampled series, synthetic flux spectrum, data-quality label).

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

use crate::services::simulated::{fallback_current_conditions, SimulatedDataSource};

pub const ANOMALY_SPEED_KM_S: f64 = 600.0;
pub const ANOMALY_DENSITY_CM3: f64 = 25.0;
pub const ANOMALY_TEMPERATURE_K: f64 = 500_000.0;

const MAX_SERIES_POINTS: u32 = 50;
const RECENT_SAMPLES: usize = 10;
const FLUX_CHANNELS: u32 = 20;
const FLUX_ENERGY_STEP_KEV: u32 = 50;

/// Magnetometer row from `mag-1-day.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct MagRecord {
    pub timestamp: DateTime<Utc>,
    pub bt: f64,
    pub bx: f64,
    pub by: f64,
    pub bz: f64,
}

/// Plasma row from `plasma-1-day.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlasmaRecord {
    pub timestamp: DateTime<Utc>,
    pub speed: f64,
    pub density: f64,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedSample {
    /// Epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub timestamp: DateTime<Utc>,
    pub time: String,
    pub magnetic_field: f64,
    pub bx: f64,
    pub by: f64,
    pub bz: f64,
    pub solar_wind_speed: f64,
    pub proton_density: f64,
    pub temperature: f64,
    pub anomaly: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub enum ConditionLevel {
    Normal,
    Elevated,
    Critical,
}

impl ConditionLevel {
    /// `value > high` is critical, `value > low` elevated.
    pub fn classify(value: f64, low: f64, high: f64) -> Self {
        if value > high {
            ConditionLevel::Critical
        } else if value > low {
            ConditionLevel::Elevated
        } else {
            ConditionLevel::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionLevels {
    pub solar_wind_speed: ConditionLevel,
    pub proton_density: ConditionLevel,
    pub temperature: ConditionLevel,
    pub magnetic_field: ConditionLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub solar_wind_speed: f64,
    pub proton_density: f64,
    pub temperature: f64,
    pub magnetic_field: f64,
    pub last_update: DateTime<Utc>,
    pub levels: ConditionLevels,
}

impl CurrentConditions {
    pub fn from_values(
        solar_wind_speed: f64,
        proton_density: f64,
        temperature: f64,
        magnetic_field: f64,
        last_update: DateTime<Utc>,
    ) -> Self {
        let levels = ConditionLevels {
            solar_wind_speed: ConditionLevel::classify(solar_wind_speed, 400.0, 500.0),
            proton_density: ConditionLevel::classify(proton_density, 10.0, 20.0),
            temperature: ConditionLevel::classify(temperature, 100_000.0, 200_000.0),
            magnetic_field: ConditionLevel::classify(magnetic_field, 5.0, 10.0),
        };
        Self {
            solar_wind_speed,
            proton_density,
            temperature,
            magnetic_field,
            last_update,
            levels,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FluxPoint {
    pub energy: u32,
    pub protons: i64,
    pub electrons: i64,
    pub alphas: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub enum DataQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    #[serde(rename = "No Data")]
    NoData,
    Simulated,
}

/// Lenient numeric read: JSON numbers and numeric strings parse, anything
/// else (missing, null, text, non-finite) is `None`.
pub fn parse_number(value: Option<&JsonValue>) -> Option<f64> {
    let parsed = match value? {
        JsonValue::Number(number) => number.as_f64(),
        JsonValue::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Like [`parse_number`] but substitutes `default` for unusable input. A
/// genuine `0` stays `0`.
pub fn parse_number_or_default(value: Option<&JsonValue>, default: f64) -> f64 {
    parse_number(value).unwrap_or(default)
}

/// Whether a field counts as present under SWPC's loose conventions: null,
/// empty strings, `false` and numeric zero are absent; any other string
/// (including `"0.00"`) is present.
pub(crate) fn is_truthy(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::Bool(flag)) => *flag,
        Some(JsonValue::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(JsonValue::String(text)) => !text.is_empty(),
        Some(_) => true,
    }
}

/// SWPC stamps are naive UTC (`2024-05-10 12:34:00.000`); RFC 3339 is
/// accepted as well.
pub fn parse_time_tag(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

pub(crate) fn clock_label(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%H:%M:%S").to_string()
}

/// Flattens a product payload into keyed rows. Accepts arrays of objects and
/// SWPC's table form, where the first row holds the column names.
pub(crate) fn table_rows(payload: &JsonValue) -> Vec<Map<String, JsonValue>> {
    let Some(rows) = payload.as_array() else {
        return Vec::new();
    };
    let header: Option<Vec<String>> = rows.first().and_then(|first| {
        first.as_array().and_then(|cells| {
            cells
                .iter()
                .map(|cell| cell.as_str().map(str::to_string))
                .collect()
        })
    });

    match header {
        Some(columns) => rows
            .iter()
            .skip(1)
            .filter_map(|row| row.as_array())
            .map(|cells| {
                columns
                    .iter()
                    .cloned()
                    .zip(cells.iter().cloned())
                    .collect::<Map<String, JsonValue>>()
            })
            .collect(),
        None => rows
            .iter()
            .filter_map(|row| row.as_object().cloned())
            .collect(),
    }
}

fn row_time(row: &Map<String, JsonValue>) -> Option<DateTime<Utc>> {
    row.get("time_tag")
        .and_then(|value| value.as_str())
        .and_then(parse_time_tag)
}

/// Rows without a usable `time_tag` or a present `bt` are dropped.
pub fn decode_mag_payload(payload: &JsonValue) -> Vec<MagRecord> {
    table_rows(payload)
        .iter()
        .filter(|row| is_truthy(row.get("bt")))
        .filter_map(|row| {
            Some(MagRecord {
                timestamp: row_time(row)?,
                bt: parse_number_or_default(row.get("bt"), 0.0),
                bx: parse_number_or_default(row.get("bx_gsm"), 0.0),
                by: parse_number_or_default(row.get("by_gsm"), 0.0),
                bz: parse_number_or_default(row.get("bz_gsm"), 0.0),
            })
        })
        .collect()
}

/// Rows without a usable `time_tag` or a present `speed` are dropped.
pub fn decode_plasma_payload(payload: &JsonValue) -> Vec<PlasmaRecord> {
    table_rows(payload)
        .iter()
        .filter(|row| is_truthy(row.get("speed")))
        .filter_map(|row| {
            Some(PlasmaRecord {
                timestamp: row_time(row)?,
                speed: parse_number_or_default(row.get("speed"), 0.0),
                density: parse_number_or_default(row.get("density"), 0.0),
                temperature: parse_number_or_default(row.get("temperature"), 0.0),
            })
        })
        .collect()
}

pub fn detect_anomaly(record: &PlasmaRecord) -> bool {
    record.speed > ANOMALY_SPEED_KM_S
        || record.density > ANOMALY_DENSITY_CM3
        || record.temperature > ANOMALY_TEMPERATURE_K
}

/// Joins plasma rows with magnetometer rows carrying the identical
/// millisecond timestamp. Plasma rows drive the output; a row with no exact
/// magnetometer partner reports a zero field.
pub fn combine(
    mag: &[MagRecord],
    plasma: &[PlasmaRecord],
    cutoff: DateTime<Utc>,
) -> Vec<UnifiedSample> {
    let mag_by_millis: HashMap<i64, &MagRecord> = mag
        .iter()
        .filter(|record| record.timestamp >= cutoff)
        .map(|record| (record.timestamp.timestamp_millis(), record))
        .collect();

    let mut combined: Vec<UnifiedSample> = plasma
        .iter()
        .filter(|record| record.timestamp >= cutoff)
        .map(|record| {
            let field = mag_by_millis.get(&record.timestamp.timestamp_millis());
            UnifiedSample {
                timestamp: record.timestamp,
                time: clock_label(record.timestamp),
                magnetic_field: field.map_or(0.0, |m| m.bt),
                bx: field.map_or(0.0, |m| m.bx),
                by: field.map_or(0.0, |m| m.by),
                bz: field.map_or(0.0, |m| m.bz),
                solar_wind_speed: record.speed,
                proton_density: record.density,
                temperature: record.temperature,
                anomaly: detect_anomaly(record),
            }
        })
        .collect();

    combined.sort_by_key(|sample| sample.timestamp);
    combined
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn current_conditions(samples: &[UnifiedSample], now: DateTime<Utc>) -> CurrentConditions {
    let Some(latest) = samples.last() else {
        return fallback_current_conditions(now);
    };
    CurrentConditions::from_values(
        latest.solar_wind_speed.round(),
        round_to_tenth(latest.proton_density),
        latest.temperature.round(),
        round_to_tenth(latest.magnetic_field),
        latest.timestamp,
    )
}

/// Keeps every Nth sample, `N = max(1, hours / 50)`.
pub fn time_series(samples: &[UnifiedSample], hours: u32) -> Vec<UnifiedSample> {
    let stride = (hours / MAX_SERIES_POINTS).max(1) as usize;
    samples.iter().step_by(stride).cloned().collect()
}

/// Last ten samples, newest first.
pub fn recent_data(samples: &[UnifiedSample]) -> Vec<UnifiedSample> {
    samples.iter().rev().take(RECENT_SAMPLES).cloned().collect()
}

/// Synthetic 20-channel spectrum scaled by the latest wind conditions. This
/// is a placeholder model, not a measurement.
pub fn particle_flux(
    samples: &[UnifiedSample],
    source: &dyn SimulatedDataSource,
) -> Vec<FluxPoint> {
    let speed = samples
        .last()
        .map(|s| s.solar_wind_speed)
        .filter(|v| *v != 0.0)
        .unwrap_or(400.0);
    let temperature = samples
        .last()
        .map(|s| s.temperature)
        .filter(|v| *v != 0.0)
        .unwrap_or(100_000.0);
    let base_intensity = speed / 400.0;
    let temp_factor = (temperature / 100_000.0).min(2.0);

    (1..=FLUX_CHANNELS)
        .map(|i| {
            let energy = i * FLUX_ENERGY_STEP_KEV;
            let energy_factor = (-f64::from(energy) / 500.0).exp();
            let protons = base_intensity
                * temp_factor
                * energy_factor
                * (source.next_unit() * 800.0 + 200.0);
            let electrons = base_intensity * energy_factor * (source.next_unit() * 600.0 + 100.0);
            let alphas = base_intensity * energy_factor * (source.next_unit() * 150.0 + 50.0);
            FluxPoint {
                energy,
                protons: protons.round() as i64,
                electrons: electrons.round() as i64,
                alphas: alphas.round() as i64,
            }
        })
        .collect()
}

pub fn assess_data_quality(samples: &[UnifiedSample]) -> DataQuality {
    if samples.is_empty() {
        return DataQuality::NoData;
    }
    let valid = samples
        .iter()
        .filter(|s| s.solar_wind_speed > 0.0 && s.proton_density > 0.0 && s.temperature > 0.0)
        .count();
    let ratio = valid as f64 / samples.len() as f64;
    if ratio > 0.9 {
        DataQuality::Excellent
    } else if ratio > 0.7 {
        DataQuality::Good
    } else if ratio > 0.5 {
        DataQuality::Fair
    } else {
        DataQuality::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::simulated::ConstantSource;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, minute, 0).unwrap()
    }

    fn plasma(minute: u32, speed: f64, density: f64, temperature: f64) -> PlasmaRecord {
        PlasmaRecord {
            timestamp: at(minute),
            speed,
            density,
            temperature,
        }
    }

    fn mag(minute: u32, bt: f64) -> MagRecord {
        MagRecord {
            timestamp: at(minute),
            bt,
            bx: 1.0,
            by: -2.0,
            bz: 3.0,
        }
    }

    fn sample(speed: f64, density: f64, temperature: f64) -> UnifiedSample {
        UnifiedSample {
            timestamp: at(0),
            time: "12:00:00".to_string(),
            magnetic_field: 0.0,
            bx: 0.0,
            by: 0.0,
            bz: 0.0,
            solar_wind_speed: speed,
            proton_density: density,
            temperature,
            anomaly: false,
        }
    }

    #[test]
    fn anomaly_flags_follow_speed_threshold() {
        let rows = vec![
            plasma(0, 300.0, 5.0, 100_000.0),
            plasma(1, 620.0, 5.0, 100_000.0),
            plasma(2, 410.0, 5.0, 100_000.0),
        ];
        let combined = combine(&[], &rows, at(0));
        let flags: Vec<bool> = combined.iter().map(|s| s.anomaly).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert!(combined.iter().all(|s| s.magnetic_field == 0.0));
    }

    #[test]
    fn anomaly_thresholds_are_strict() {
        assert!(!detect_anomaly(&plasma(0, 600.0, 25.0, 500_000.0)));
        assert!(detect_anomaly(&plasma(0, 400.0, 25.1, 0.0)));
        assert!(detect_anomaly(&plasma(0, 400.0, 1.0, 500_001.0)));
    }

    #[test]
    fn join_requires_identical_timestamps() {
        let mut offset = mag(1, 9.0);
        offset.timestamp += Duration::milliseconds(1);
        let combined = combine(
            &[mag(0, 5.5), offset],
            &[plasma(0, 400.0, 5.0, 1.0), plasma(1, 400.0, 5.0, 1.0)],
            at(0),
        );

        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].magnetic_field, 5.5);
        assert_eq!((combined[0].bx, combined[0].by, combined[0].bz), (1.0, -2.0, 3.0));
        assert_eq!(combined[1].magnetic_field, 0.0);
        assert_eq!(combined[1].bz, 0.0);
    }

    #[test]
    fn combine_applies_cutoff_and_sorts() {
        let combined = combine(
            &[],
            &[
                plasma(30, 450.0, 5.0, 1.0),
                plasma(5, 420.0, 5.0, 1.0),
                plasma(15, 430.0, 5.0, 1.0),
            ],
            at(10),
        );
        let speeds: Vec<f64> = combined.iter().map(|s| s.solar_wind_speed).collect();
        assert_eq!(speeds, vec![430.0, 450.0]);
        assert_eq!(combined[0].time, "12:15:00");
    }

    #[test]
    fn combine_is_pure() {
        let mags = vec![mag(0, 4.0), mag(2, 6.0)];
        let rows = vec![plasma(2, 500.0, 3.0, 2.0), plasma(0, 700.0, 4.0, 1.0)];
        let first = combine(&mags, &rows, at(0));
        let second = combine(&mags, &rows, at(0));
        assert_eq!(first, second);
        assert_eq!(rows[0].speed, 500.0);
    }

    #[test]
    fn decodes_swpc_table_payloads() {
        let mag_payload = json!([
            ["time_tag", "bx_gsm", "by_gsm", "bz_gsm", "lon_gsm", "lat_gsm", "bt"],
            ["2024-05-10 12:00:00.000", "1.5", "-0.5", "-3.25", "100", "10", "4.12"],
            ["2024-05-10 12:01:00.000", "1.0", "0.0", "0.0", "100", "10", null],
        ]);
        let plasma_payload = json!([
            ["time_tag", "density", "speed", "temperature"],
            ["2024-05-10 12:00:00.000", "5.3", "412.4", "98000"],
            ["2024-05-10 12:01:00.000", "5.1", "", "97000"],
        ]);

        let mags = decode_mag_payload(&mag_payload);
        let rows = decode_plasma_payload(&plasma_payload);
        assert_eq!(mags.len(), 1);
        assert_eq!(mags[0].bt, 4.12);
        assert_eq!(mags[0].bz, -3.25);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].timestamp, at(0));
        assert_eq!(rows[0].speed, 412.4);

        let combined = combine(&mags, &rows, at(0));
        assert_eq!(combined[0].magnetic_field, 4.12);
    }

    #[test]
    fn decodes_object_rows_with_mixed_value_types() {
        let payload = json!([
            { "time_tag": "2024-05-10T12:00:00Z", "speed": 500, "density": "bad", "temperature": "0" },
            { "time_tag": "not a time", "speed": "450" },
            { "speed": "450" },
            { "time_tag": "2024-05-10 12:02:00", "speed": 0 },
        ]);
        let rows = decode_plasma_payload(&payload);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].speed, 500.0);
        assert_eq!(rows[0].density, 0.0);
        assert_eq!(rows[0].temperature, 0.0);
    }

    #[test]
    fn non_array_payload_decodes_to_nothing() {
        assert!(decode_mag_payload(&json!({ "error": "rate limited" })).is_empty());
        assert!(decode_plasma_payload(&JsonValue::Null).is_empty());
    }

    #[test]
    fn parse_number_keeps_zero_distinct_from_missing() {
        assert_eq!(parse_number(Some(&json!("0"))), Some(0.0));
        assert_eq!(parse_number(Some(&json!(0))), Some(0.0));
        assert_eq!(parse_number(Some(&json!(" 12.5 "))), Some(12.5));
        assert_eq!(parse_number(Some(&json!("n/a"))), None);
        assert_eq!(parse_number(Some(&JsonValue::Null)), None);
        assert_eq!(parse_number(None), None);
        assert_eq!(parse_number_or_default(Some(&json!("NaN")), -1.0), -1.0);
        assert_eq!(parse_number_or_default(Some(&json!("0")), -1.0), 0.0);
    }

    #[test]
    fn current_conditions_rounds_latest_sample() {
        let mut latest = sample(452.6, 7.25, 101_234.5);
        latest.magnetic_field = 4.449;
        latest.timestamp = at(5);
        let current = current_conditions(&[sample(300.0, 1.0, 1.0), latest], at(59));

        assert_eq!(current.solar_wind_speed, 453.0);
        assert_eq!(current.proton_density, 7.3);
        assert_eq!(current.temperature, 101_235.0);
        assert_eq!(current.magnetic_field, 4.4);
        assert_eq!(current.last_update, at(5));
        assert_eq!(current.levels.solar_wind_speed, ConditionLevel::Elevated);
        assert_eq!(current.levels.temperature, ConditionLevel::Elevated);
        assert_eq!(current.levels.proton_density, ConditionLevel::Normal);
    }

    #[test]
    fn current_conditions_falls_back_when_empty() {
        let current = current_conditions(&[], at(30));
        assert_eq!(current.solar_wind_speed, 420.0);
        assert_eq!(current.proton_density, 8.5);
        assert_eq!(current.temperature, 105_000.0);
        assert_eq!(current.magnetic_field, 4.2);
        assert_eq!(current.last_update, at(30));
    }

    #[test]
    fn condition_levels_use_strict_thresholds() {
        assert_eq!(ConditionLevel::classify(400.0, 400.0, 500.0), ConditionLevel::Normal);
        assert_eq!(ConditionLevel::classify(500.0, 400.0, 500.0), ConditionLevel::Elevated);
        assert_eq!(ConditionLevel::classify(500.1, 400.0, 500.0), ConditionLevel::Critical);
    }

    #[test]
    fn time_series_strides_by_range() {
        let samples: Vec<UnifiedSample> = (0..10)
            .map(|i| sample(f64::from(400 + i), 1.0, 1.0))
            .collect();

        assert_eq!(time_series(&samples, 24).len(), 10);
        let weekly = time_series(&samples, 168);
        let speeds: Vec<f64> = weekly.iter().map(|s| s.solar_wind_speed).collect();
        assert_eq!(speeds, vec![400.0, 403.0, 406.0, 409.0]);
    }

    #[test]
    fn recent_data_is_newest_first_and_capped() {
        let samples: Vec<UnifiedSample> = (0..15)
            .map(|i| sample(f64::from(i), 1.0, 1.0))
            .collect();
        let recent = recent_data(&samples);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].solar_wind_speed, 14.0);
        assert_eq!(recent[9].solar_wind_speed, 5.0);
    }

    #[test]
    fn particle_flux_matches_placeholder_model() {
        let flux = particle_flux(&[sample(800.0, 5.0, 300_000.0)], &ConstantSource(0.5));
        assert_eq!(flux.len(), 20);
        assert_eq!(flux[0].energy, 50);
        assert_eq!(flux[19].energy, 1000);

        // base 2.0, temperature factor capped at 2.0, exp(-0.1) at 50 keV.
        let decay = (-0.1f64).exp();
        assert_eq!(flux[0].protons, (2.0 * 2.0 * decay * 600.0).round() as i64);
        assert_eq!(flux[0].electrons, (2.0 * decay * 400.0).round() as i64);
        assert_eq!(flux[0].alphas, (2.0 * decay * 125.0).round() as i64);
        assert!(flux.windows(2).all(|w| w[0].protons >= w[1].protons));
    }

    #[test]
    fn particle_flux_defaults_without_samples() {
        let flux = particle_flux(&[], &ConstantSource(0.0));
        let decay = (-0.1f64).exp();
        assert_eq!(flux[0].protons, (decay * 200.0).round() as i64);
        assert_eq!(flux[0].electrons, (decay * 100.0).round() as i64);
    }

    #[test]
    fn data_quality_labels() {
        assert_eq!(assess_data_quality(&[]), DataQuality::NoData);

        let mut samples: Vec<UnifiedSample> = (0..19).map(|_| sample(400.0, 5.0, 1e5)).collect();
        samples.push(sample(400.0, 0.0, 1e5));
        assert_eq!(assess_data_quality(&samples), DataQuality::Excellent);

        let mixed = |valid: usize, total: usize| -> Vec<UnifiedSample> {
            (0..total)
                .map(|i| {
                    if i < valid {
                        sample(400.0, 5.0, 1e5)
                    } else {
                        sample(0.0, 5.0, 1e5)
                    }
                })
                .collect()
        };
        assert_eq!(assess_data_quality(&mixed(9, 10)), DataQuality::Good);
        assert_eq!(assess_data_quality(&mixed(6, 10)), DataQuality::Fair);
        assert_eq!(assess_data_quality(&mixed(5, 10)), DataQuality::Poor);
    }

    #[test]
    fn data_quality_serializes_display_labels() {
        assert_eq!(serde_json::to_value(DataQuality::NoData).unwrap(), json!("No Data"));
        assert_eq!(serde_json::to_value(DataQuality::Simulated).unwrap(), json!("Simulated"));
    }
}
