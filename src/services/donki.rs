use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::cmp::Reverse;
use uuid::Uuid;

use crate::error::FetchError;
use crate::services::cme::parse_donki_time;
use crate::services::normalizer::{is_truthy, parse_number};
use crate::services::solar_processor::SolarDataProcessor;

const CME_HISTORY_DAYS: i64 = 7;

/// A DONKI space-weather notification in display form.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct SpaceWeatherAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub time: String,
    pub body: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct CmeHistoryItem {
    pub id: Option<String>,
    pub timestamp: Option<String>,
    pub speed: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct CmeHistory {
    pub latest: Option<CmeHistoryItem>,
    pub history: Vec<CmeHistoryItem>,
}

impl CmeHistory {
    pub fn empty() -> Self {
        Self {
            latest: None,
            history: Vec::new(),
        }
    }
}

fn text_field(row: &Map<String, JsonValue>, key: &str) -> Option<String> {
    row.get(key)
        .filter(|value| is_truthy(Some(value)))
        .map(|value| match value {
            JsonValue::String(text) => text.clone(),
            other => other.to_string(),
        })
}

pub fn normalize_alert(raw: &Map<String, JsonValue>, now: DateTime<Utc>) -> SpaceWeatherAlert {
    let id = match raw.get("messageID") {
        None | Some(JsonValue::Null) => Uuid::new_v4().to_string(),
        Some(JsonValue::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    };
    SpaceWeatherAlert {
        id,
        kind: text_field(raw, "messageType").unwrap_or_else(|| "Unknown".to_string()),
        time: text_field(raw, "messageIssueTime")
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        body: text_field(raw, "messageBody").unwrap_or_else(|| "No details available".to_string()),
        link: text_field(raw, "messageURL"),
    }
}

/// Normalizes, filters by `types` when non-empty, and orders newest first.
/// Alerts whose time does not parse sort last.
pub fn process_alerts(payload: &JsonValue, types: &[String], now: DateTime<Utc>) -> Vec<SpaceWeatherAlert> {
    let mut alerts: Vec<SpaceWeatherAlert> = payload
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|raw| normalize_alert(raw, now))
        .filter(|alert| types.is_empty() || types.iter().any(|kind| *kind == alert.kind))
        .collect();
    alerts.sort_by_key(|alert| Reverse(parse_donki_time(&alert.time)));
    alerts
}

/// History is kept in upstream order; `latest` is its first entry.
pub fn process_cme_history(payload: &JsonValue) -> CmeHistory {
    let history: Vec<CmeHistoryItem> = payload
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|item| {
            let analysis = item
                .get("cmeAnalyses")
                .and_then(JsonValue::as_array)
                .and_then(|analyses| analyses.first())
                .and_then(JsonValue::as_object);
            let measured = |key: &str| {
                analysis
                    .and_then(|a| a.get(key))
                    .filter(|value| is_truthy(Some(value)))
                    .and_then(|value| parse_number(Some(value)))
            };
            CmeHistoryItem {
                id: text_field(item, "activityID"),
                timestamp: text_field(item, "startTime"),
                speed: measured("speed"),
                lat: measured("latitude"),
                lon: measured("longitude"),
                note: text_field(item, "note"),
            }
        })
        .collect();

    CmeHistory {
        latest: history.first().cloned(),
        history,
    }
}

impl SolarDataProcessor {
    /// Notifications issued over the last `days` days. Upstream failures
    /// yield an empty list.
    pub async fn fetch_alerts(&self, days: u32, types: &[String]) -> Vec<SpaceWeatherAlert> {
        let now = Utc::now();
        match self
            .fetch_donki("notifications", now, i64::from(days), &[("type", "all")])
            .await
        {
            Ok(payload) => process_alerts(&payload, types, now),
            Err(err) => {
                tracing::warn!(error = %err, "DONKI notifications fetch failed");
                Vec::new()
            }
        }
    }

    pub async fn fetch_cme_history(&self) -> CmeHistory {
        match self.fetch_donki("CME", Utc::now(), CME_HISTORY_DAYS, &[]).await {
            Ok(payload) => process_cme_history(&payload),
            Err(err) => {
                tracing::warn!(error = %err, "DONKI CME catalog fetch failed");
                CmeHistory::empty()
            }
        }
    }

    pub(crate) async fn fetch_donki(
        &self,
        resource: &str,
        now: DateTime<Utc>,
        days: i64,
        extra: &[(&str, &str)],
    ) -> Result<JsonValue, FetchError> {
        let end = now.date_naive();
        let start = end - Duration::days(days);
        let url = self
            .endpoints()
            .donki_url(resource, start, end, extra)
            .map_err(|err| FetchError::Decode(format!("invalid DONKI URL: {err}")))?;
        self.gateway().fetch_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_upstream, test_processor};
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::TimeZone;
    use serde_json::json;
    use std::collections::HashMap;

    fn notifications() -> JsonValue {
        json!([
            {
                "messageID": "20240510-AL-001",
                "messageType": "FLR",
                "messageIssueTime": "2024-05-10T06:36Z",
                "messageBody": "M-class flare",
                "messageURL": "https://kauai.ccmc.gsfc.nasa.gov/DONKI/view/Alert/1/1"
            },
            {
                "messageID": "20240511-AL-002",
                "messageType": "CME",
                "messageIssueTime": "2024-05-11T01:00Z",
                "messageBody": "Earth-directed CME"
            },
            { "messageType": "", "messageIssueTime": "2024-05-09T12:00Z" }
        ])
    }

    #[test]
    fn alerts_are_normalized_and_newest_first() {
        let now = Utc.with_ymd_and_hms(2024, 5, 12, 0, 0, 0).unwrap();
        let alerts = process_alerts(&notifications(), &[], now);

        let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(&ids[..2], ["20240511-AL-002", "20240510-AL-001"]);
        assert_eq!(alerts[1].link.as_deref(), Some("https://kauai.ccmc.gsfc.nasa.gov/DONKI/view/Alert/1/1"));
        assert_eq!(alerts[0].link, None);

        let placeholder = &alerts[2];
        assert_eq!(placeholder.kind, "Unknown");
        assert_eq!(placeholder.body, "No details available");
        assert!(Uuid::parse_str(&placeholder.id).is_ok());
    }

    #[test]
    fn alerts_filter_by_type() {
        let alerts = process_alerts(&notifications(), &["CME".to_string()], Utc::now());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, "CME");
        assert_eq!(serde_json::to_value(&alerts[0]).unwrap()["type"], "CME");
    }

    #[test]
    fn missing_issue_time_defaults_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 5, 12, 0, 0, 0).unwrap();
        let alert = normalize_alert(json!({ "messageID": 17 }).as_object().unwrap(), now);
        assert_eq!(alert.id, "17");
        assert_eq!(alert.time, "2024-05-12T00:00:00.000Z");
    }

    #[test]
    fn cme_history_reads_first_analysis() {
        let payload = json!([
            {
                "activityID": "2024-05-10T06:36:00-CME-001",
                "startTime": "2024-05-10T06:36Z",
                "note": "Halo CME",
                "cmeAnalyses": [
                    { "speed": 1210.0, "latitude": -15.0, "longitude": 0 },
                    { "speed": 900.0, "latitude": 3.0, "longitude": 4.0 }
                ]
            },
            { "activityID": "2024-05-09T01:00:00-CME-001", "startTime": "2024-05-09T01:00Z", "cmeAnalyses": null }
        ]);
        let history = process_cme_history(&payload);

        assert_eq!(history.history.len(), 2);
        let latest = history.latest.expect("latest entry");
        assert_eq!(latest.id.as_deref(), Some("2024-05-10T06:36:00-CME-001"));
        assert_eq!(latest.speed, Some(1210.0));
        assert_eq!(latest.lat, Some(-15.0));
        assert_eq!(latest.lon, None);
        assert_eq!(latest.note.as_deref(), Some("Halo CME"));

        let bare = &history.history[1];
        assert_eq!(bare.speed, None);
        assert_eq!(bare.note, None);
    }

    #[test]
    fn non_array_history_is_empty() {
        assert_eq!(process_cme_history(&json!({ "error": "x" })), CmeHistory::empty());
    }

    #[tokio::test]
    async fn fetch_alerts_queries_window_and_key() {
        let router = Router::new().route(
            "/DONKI/notifications",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let window_ok = params.get("type").map(String::as_str) == Some("all")
                    && params.get("api_key").map(String::as_str) == Some("TEST_KEY")
                    && params.contains_key("startDate")
                    && params.contains_key("endDate");
                if !window_ok {
                    return Err(StatusCode::BAD_REQUEST);
                }
                Ok(Json(notifications()))
            }),
        );
        let base = spawn_upstream(router).await;
        let processor = test_processor(&base);

        let alerts = processor.fetch_alerts(7, &["FLR".to_string()]).await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "20240510-AL-001");
    }

    #[tokio::test]
    async fn upstream_failures_degrade_to_empty_results() {
        let router = Router::new().fallback(|| async { StatusCode::TOO_MANY_REQUESTS });
        let base = spawn_upstream(router).await;
        let processor = test_processor(&base);

        assert!(processor.fetch_alerts(7, &[]).await.is_empty());
        assert_eq!(processor.fetch_cme_history().await, CmeHistory::empty());
    }
}
