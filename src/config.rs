use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::services::fetch_gateway::FetchPolicy;
use crate::services::solar_processor::{Dataset, FeedEndpoints, TimeRange};

const DEFAULT_SWPC_BASE_URL: &str = "https://services.swpc.noaa.gov";
const DEFAULT_DONKI_BASE_URL: &str = "https://api.nasa.gov/DONKI";

pub(crate) fn setup_config_path() -> Option<PathBuf> {
    std::env::var("SOLAR_SETUP_CONFIG_PATH")
        .ok()
        .map(|path| path.trim().to_string())
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SetupConfigOverrides {
    #[serde(default)]
    swpc_base_url: Option<String>,
    #[serde(default)]
    donki_base_url: Option<String>,
    #[serde(default)]
    nasa_api_key: Option<String>,
    #[serde(default)]
    enable_poller: Option<bool>,
    #[serde(default)]
    poll_interval_seconds: Option<u64>,
    #[serde(default)]
    poll_dataset: Option<String>,
    #[serde(default)]
    poll_range: Option<String>,
}

fn load_setup_config_overrides() -> Option<SetupConfigOverrides> {
    let path = setup_config_path()?;
    if !path.exists() {
        tracing::warn!(path = %path.display(), "setup config not found; using env defaults");
        return None;
    }
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to read setup config; using env defaults"
            );
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to parse setup config; using env defaults"
            );
            None
        }
    }
}

fn apply_setup_overrides(config: &mut MonitorConfig, overrides: &SetupConfigOverrides) {
    if let Some(url) = overrides
        .swpc_base_url
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        config.swpc_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(url) = overrides
        .donki_base_url
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        config.donki_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(key) = overrides
        .nasa_api_key
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        config.nasa_api_key = key.to_string();
    }
    if let Some(enabled) = overrides.enable_poller {
        config.enable_poller = enabled;
    }
    if let Some(value) = overrides.poll_interval_seconds.filter(|v| *v != 0) {
        config.poll_interval_seconds = clamp_poll_interval(value);
    }
    if let Some(dataset) = overrides.poll_dataset.as_deref() {
        match dataset.trim().parse::<Dataset>() {
            Ok(dataset) => config.poll_dataset = dataset,
            Err(err) => tracing::warn!(dataset, error = %err, "ignoring poll_dataset override"),
        }
    }
    if let Some(range) = overrides.poll_range.as_deref() {
        match range.trim().parse::<TimeRange>() {
            Ok(range) => config.poll_range = range,
            Err(err) => tracing::warn!(range, error = %err, "ignoring poll_range override"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub swpc_base_url: String,
    pub donki_base_url: String,
    pub nasa_api_key: String,
    pub min_request_interval_ms: u64,
    pub request_timeout_seconds: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub enable_poller: bool,
    pub poll_interval_seconds: u64,
    pub poll_dataset: Dataset,
    pub poll_range: TimeRange,
}

impl MonitorConfig {
    pub fn from_env() -> Result<Self> {
        let setup_overrides = load_setup_config_overrides();

        let swpc_base_url = env_string("SOLAR_SWPC_BASE_URL", DEFAULT_SWPC_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let donki_base_url = env_string("SOLAR_DONKI_BASE_URL", DEFAULT_DONKI_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let nasa_api_key = env_string("NASA_API_KEY", "DEMO_KEY");
        let min_request_interval_ms = env_u64("SOLAR_MIN_REQUEST_INTERVAL_MS", 1000);
        let request_timeout_seconds = env_u64("SOLAR_REQUEST_TIMEOUT_SECONDS", 10).clamp(1, 120);
        let max_retries = env_u32("SOLAR_MAX_RETRIES", 3).clamp(1, 10);
        let backoff_base_ms = env_u64("SOLAR_BACKOFF_BASE_MS", 1000);
        let enable_poller = env_bool("SOLAR_ENABLE_POLLER", true);
        let poll_interval_seconds = clamp_poll_interval(env_u64("SOLAR_POLL_INTERVAL_SECONDS", 30));
        let poll_dataset = env_optional_string("SOLAR_POLL_DATASET")
            .map(|raw| raw.parse::<Dataset>())
            .transpose()
            .context("SOLAR_POLL_DATASET must be one of aspex, suit, combined")?
            .unwrap_or_default();
        let poll_range = env_optional_string("SOLAR_POLL_RANGE")
            .map(|raw| raw.parse::<TimeRange>())
            .transpose()
            .context("SOLAR_POLL_RANGE must be one of 1h, 6h, 24h, 7d")?
            .unwrap_or_default();

        let mut config = Self {
            swpc_base_url,
            donki_base_url,
            nasa_api_key,
            min_request_interval_ms,
            request_timeout_seconds,
            max_retries,
            backoff_base_ms,
            enable_poller,
            poll_interval_seconds,
            poll_dataset,
            poll_range,
        };

        if let Some(overrides) = setup_overrides.as_ref() {
            apply_setup_overrides(&mut config, overrides);
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("SOLAR_SWPC_BASE_URL", &self.swpc_base_url),
            ("SOLAR_DONKI_BASE_URL", &self.donki_base_url),
        ] {
            let parsed = url::Url::parse(value)
                .with_context(|| format!("{label} is not a valid URL ({value})"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("{label} must use http or https");
            }
        }
        Ok(())
    }

    pub fn endpoints(&self) -> FeedEndpoints {
        FeedEndpoints {
            swpc_base_url: self.swpc_base_url.clone(),
            donki_base_url: self.donki_base_url.clone(),
            nasa_api_key: self.nasa_api_key.clone(),
        }
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            min_interval: Duration::from_millis(self.min_request_interval_ms),
            timeout: Duration::from_secs(self.request_timeout_seconds),
            max_retries: self.max_retries,
            backoff_base: Duration::from_millis(self.backoff_base_ms),
        }
    }
}

fn clamp_poll_interval(seconds: u64) -> u64 {
    seconds.clamp(10, 3600)
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_optional_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key)
        .ok()
        .map(|value| value.trim().to_lowercase())
    {
        Some(value) if value == "1" || value == "true" || value == "yes" => true,
        Some(value) if value == "0" || value == "false" || value == "no" => false,
        _ => default,
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
