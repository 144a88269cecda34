use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use url::Url;

use crate::services::cme::{process_cme_data, CmeEvent, CmeStatus};
use crate::services::fetch_gateway::FetchGateway;
use crate::services::normalizer::{
    assess_data_quality, combine, current_conditions, decode_mag_payload, decode_plasma_payload,
    particle_flux, recent_data, time_series, CurrentConditions, DataQuality, FluxPoint,
    UnifiedSample,
};
use crate::services::simulated::{fallback_cme_events, generate_mock_solar_data, SimulatedDataSource};
use crate::services::space_weather::{
    summarize_flares, summarize_geomagnetic, FlareSummary, GeomagneticSummary,
};

const MAG_PATH: &str = "/products/solar-wind/mag-1-day.json";
const PLASMA_PATH: &str = "/products/solar-wind/plasma-1-day.json";
const XRAYS_PATH: &str = "/json/goes/primary/xrays-1-day.json";
const KP_FORECAST_PATH: &str = "/products/noaa-planetary-k-index-forecast.json";
const CME_LOOKBACK_DAYS: i64 = 7;

#[derive(Debug, thiserror::Error)]
#[error("unsupported {kind} '{value}'")]
pub struct ParseSelectorError {
    kind: &'static str,
    value: String,
}

/// Instrument selection requested by the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    #[default]
    Aspex,
    Suit,
    Combined,
}

impl FromStr for Dataset {
    type Err = ParseSelectorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "aspex" => Ok(Dataset::Aspex),
            "suit" => Ok(Dataset::Suit),
            "combined" => Ok(Dataset::Combined),
            other => Err(ParseSelectorError {
                kind: "dataset",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub enum TimeRange {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[default]
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
}

impl TimeRange {
    pub fn hours(self) -> u32 {
        match self {
            TimeRange::OneHour => 1,
            TimeRange::SixHours => 6,
            TimeRange::Day => 24,
            TimeRange::Week => 168,
        }
    }
}

impl FromStr for TimeRange {
    type Err = ParseSelectorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "1h" => Ok(TimeRange::OneHour),
            "6h" => Ok(TimeRange::SixHours),
            "24h" => Ok(TimeRange::Day),
            "7d" => Ok(TimeRange::Week),
            other => Err(ParseSelectorError {
                kind: "range",
                value: other.to_string(),
            }),
        }
    }
}

/// Upstream locations; base URLs carry no trailing slash.
#[derive(Debug, Clone)]
pub struct FeedEndpoints {
    pub swpc_base_url: String,
    pub donki_base_url: String,
    pub nasa_api_key: String,
}

impl FeedEndpoints {
    pub fn mag_url(&self) -> String {
        format!("{}{MAG_PATH}", self.swpc_base_url)
    }

    pub fn plasma_url(&self) -> String {
        format!("{}{PLASMA_PATH}", self.swpc_base_url)
    }

    pub fn xrays_url(&self) -> String {
        format!("{}{XRAYS_PATH}", self.swpc_base_url)
    }

    pub fn kp_forecast_url(&self) -> String {
        format!("{}{KP_FORECAST_PATH}", self.swpc_base_url)
    }

    /// `{donki}/{resource}?startDate=..&endDate=..&{extra}&api_key=..`
    pub fn donki_url(
        &self,
        resource: &str,
        start: NaiveDate,
        end: NaiveDate,
        extra: &[(&str, &str)],
    ) -> Result<String, url::ParseError> {
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();
        let mut params: Vec<(&str, &str)> = vec![("startDate", &start), ("endDate", &end)];
        params.extend_from_slice(extra);
        params.push(("api_key", &self.nasa_api_key));
        let url = Url::parse_with_params(&format!("{}/{resource}", self.donki_base_url), &params)?;
        Ok(url.into())
    }
}

/// Everything a dashboard view needs for one refresh.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub current: CurrentConditions,
    pub time_series: Vec<UnifiedSample>,
    pub particle_flux: Vec<FluxPoint>,
    pub cme_data: Vec<CmeEvent>,
    #[serde(rename = "activeCMEs")]
    pub active_cmes: Vec<CmeEvent>,
    pub recent_data: Vec<UnifiedSample>,
    pub data_quality: DataQuality,
    pub flares: Option<FlareSummary>,
    pub geomagnetic: Option<GeomagneticSummary>,
    pub dataset: Dataset,
    pub range: TimeRange,
    pub fetch_time: String,
}

struct SolarWindView {
    current: CurrentConditions,
    time_series: Vec<UnifiedSample>,
    particle_flux: Vec<FluxPoint>,
    recent_data: Vec<UnifiedSample>,
    data_quality: DataQuality,
}

pub struct SolarDataProcessor {
    gateway: Arc<FetchGateway>,
    endpoints: FeedEndpoints,
    simulated: Arc<dyn SimulatedDataSource>,
}

impl SolarDataProcessor {
    pub fn new(
        gateway: Arc<FetchGateway>,
        endpoints: FeedEndpoints,
        simulated: Arc<dyn SimulatedDataSource>,
    ) -> Self {
        Self {
            gateway,
            endpoints,
            simulated,
        }
    }

    pub fn gateway(&self) -> &FetchGateway {
        &self.gateway
    }

    pub fn endpoints(&self) -> &FeedEndpoints {
        &self.endpoints
    }

    /// Never fails: each upstream branch degrades to its own fallback and the
    /// degradation shows up in `data_quality` or the CME `source` field.
    pub async fn fetch_solar_data(&self, dataset: Dataset, range: TimeRange) -> DashboardSnapshot {
        let now = Utc::now();
        let (solar_wind, cme_data, flares, geomagnetic) = tokio::join!(
            self.solar_wind_view(range, now),
            self.cme_events(now),
            self.flare_summary(),
            self.geomagnetic_summary(now),
        );

        let active_cmes = cme_data
            .iter()
            .filter(|event| event.status == CmeStatus::Tracking)
            .cloned()
            .collect();

        tracing::debug!(
            ?dataset,
            ?range,
            samples = solar_wind.time_series.len(),
            quality = ?solar_wind.data_quality,
            cmes = cme_data.len(),
            "assembled dashboard snapshot"
        );

        DashboardSnapshot {
            current: solar_wind.current,
            time_series: solar_wind.time_series,
            particle_flux: solar_wind.particle_flux,
            cme_data,
            active_cmes,
            recent_data: solar_wind.recent_data,
            data_quality: solar_wind.data_quality,
            flares,
            geomagnetic,
            dataset,
            range,
            fetch_time: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    async fn solar_wind_view(&self, range: TimeRange, now: DateTime<Utc>) -> SolarWindView {
        let hours = range.hours();
        let mag_url = self.endpoints.mag_url();
        let plasma_url = self.endpoints.plasma_url();
        let fetched = tokio::try_join!(
            self.gateway.fetch_json(&mag_url),
            self.gateway.fetch_json(&plasma_url),
        );

        match fetched {
            Ok((mag_payload, plasma_payload)) => {
                let cutoff = now - Duration::hours(i64::from(hours));
                let combined = combine(
                    &decode_mag_payload(&mag_payload),
                    &decode_plasma_payload(&plasma_payload),
                    cutoff,
                );
                SolarWindView {
                    current: current_conditions(&combined, now),
                    time_series: time_series(&combined, hours),
                    particle_flux: particle_flux(&combined, self.simulated.as_ref()),
                    recent_data: recent_data(&combined),
                    data_quality: assess_data_quality(&combined),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "solar wind fetch failed; serving simulated series");
                self.simulated_solar_wind(hours, now)
            }
        }
    }

    fn simulated_solar_wind(&self, hours: u32, now: DateTime<Utc>) -> SolarWindView {
        let data = generate_mock_solar_data(hours, now, self.simulated.as_ref());
        SolarWindView {
            current: current_conditions(&data, now),
            particle_flux: particle_flux(&data, self.simulated.as_ref()),
            recent_data: recent_data(&data),
            time_series: data,
            data_quality: DataQuality::Simulated,
        }
    }

    async fn cme_events(&self, now: DateTime<Utc>) -> Vec<CmeEvent> {
        match self
            .fetch_donki("CMEAnalysis", now, CME_LOOKBACK_DAYS, &[])
            .await
        {
            Ok(payload) => process_cme_data(&payload, now),
            Err(err) => {
                tracing::warn!(error = %err, "CME analysis fetch failed; serving fallback event");
                fallback_cme_events(now)
            }
        }
    }

    async fn flare_summary(&self) -> Option<FlareSummary> {
        match self.gateway.fetch_json(&self.endpoints.xrays_url()).await {
            Ok(payload) => summarize_flares(&payload),
            Err(err) => {
                tracing::warn!(error = %err, "X-ray flux fetch failed");
                None
            }
        }
    }

    async fn geomagnetic_summary(&self, now: DateTime<Utc>) -> Option<GeomagneticSummary> {
        match self.gateway.fetch_json(&self.endpoints.kp_forecast_url()).await {
            Ok(payload) => summarize_geomagnetic(&payload, now),
            Err(err) => {
                tracing::warn!(error = %err, "Kp forecast fetch failed");
                None
            }
        }
    }
}
