use axum::Router;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::config::MonitorConfig;
use crate::services::fetch_gateway::{FetchGateway, FetchPolicy};
use crate::services::poller::SnapshotStore;
use crate::services::simulated::RandomSource;
use crate::services::solar_processor::{Dataset, SolarDataProcessor, TimeRange};
use crate::state::AppState;

/// Serves `router` on an ephemeral loopback port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let addr = listener.local_addr().expect("mock upstream addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

pub fn test_config(base_url: &str) -> MonitorConfig {
    MonitorConfig {
        swpc_base_url: base_url.to_string(),
        donki_base_url: format!("{base_url}/DONKI"),
        nasa_api_key: "TEST_KEY".to_string(),
        min_request_interval_ms: 0,
        request_timeout_seconds: 5,
        max_retries: 1,
        backoff_base_ms: 1,
        enable_poller: false,
        poll_interval_seconds: 10,
        poll_dataset: Dataset::Aspex,
        poll_range: TimeRange::Day,
    }
}

pub fn fast_policy() -> FetchPolicy {
    FetchPolicy {
        min_interval: Duration::ZERO,
        timeout: Duration::from_secs(5),
        max_retries: 1,
        backoff_base: Duration::from_millis(1),
    }
}

pub fn test_processor(base_url: &str) -> SolarDataProcessor {
    let config = test_config(base_url);
    SolarDataProcessor::new(
        Arc::new(FetchGateway::new(Client::new(), fast_policy())),
        config.endpoints(),
        Arc::new(RandomSource::seeded(7)),
    )
}

pub fn test_state(base_url: &str) -> AppState {
    AppState {
        processor: Arc::new(test_processor(base_url)),
        latest: SnapshotStore::default(),
    }
}
