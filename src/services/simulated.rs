//! Synthetic stand-ins used when upstream feeds are unavailable.
//!
//! Randomness is drawn through [`SimulatedDataSource`] so callers can inject a
//! seeded generator and get reproducible series.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::services::cme::{CmeDirection, CmeEvent, CmeIntensity, CmeStatus, SOURCE_FALLBACK};
use crate::services::normalizer::{clock_label, CurrentConditions, UnifiedSample};

pub trait SimulatedDataSource: Send + Sync {
    /// Uniform sample in `[0, 1)`.
    fn next_unit(&self) -> f64;
}

pub struct RandomSource {
    rng: Mutex<StdRng>,
}

impl RandomSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl SimulatedDataSource for RandomSource {
    fn next_unit(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen::<f64>()
    }
}

/// Always yields the same value.
pub struct ConstantSource(pub f64);

impl SimulatedDataSource for ConstantSource {
    fn next_unit(&self) -> f64 {
        self.0
    }
}

/// One sample per hour from `now - hours` up to `now`, oldest first.
pub fn generate_mock_solar_data(
    hours: u32,
    now: DateTime<Utc>,
    source: &dyn SimulatedDataSource,
) -> Vec<UnifiedSample> {
    (0..=hours)
        .rev()
        .map(|i| {
            let step = f64::from(i);
            let timestamp = now - Duration::hours(i64::from(i));
            let solar_wind_speed =
                380.0 + source.next_unit() * 200.0 + (step * 0.1).sin() * 50.0;
            let proton_density = 5.0 + source.next_unit() * 15.0 + (step * 0.2).sin() * 3.0;
            let temperature =
                80_000.0 + source.next_unit() * 120_000.0 + (step * 0.15).cos() * 30_000.0;
            let magnetic_field = 3.0 + source.next_unit() * 8.0 + (step * 0.3).sin() * 2.0;
            UnifiedSample {
                timestamp,
                time: clock_label(timestamp),
                magnetic_field,
                bx: 0.0,
                by: 0.0,
                bz: 0.0,
                solar_wind_speed,
                proton_density,
                temperature,
                anomaly: source.next_unit() > 0.95,
            }
        })
        .collect()
}

pub fn fallback_current_conditions(now: DateTime<Utc>) -> CurrentConditions {
    CurrentConditions::from_values(420.0, 8.5, 105_000.0, 4.2, now)
}

pub fn fallback_cme_events(now: DateTime<Utc>) -> Vec<CmeEvent> {
    vec![CmeEvent {
        id: "CME-FALLBACK-001".to_string(),
        start_time: (now - Duration::hours(24)).to_rfc3339_opts(SecondsFormat::Millis, true),
        speed: 850.0,
        direction: CmeDirection::EarthDirected,
        intensity: CmeIntensity::Moderate,
        estimated_arrival: Some(now + Duration::hours(48)),
        status: CmeStatus::Tracking,
        source: SOURCE_FALLBACK.to_string(),
    }]
}
