//! Backend endpoint diagnostics
//!
//! Probes each endpoint once, bypassing both the cache and the retry policy,
//! to report which parts of the backend are reachable and returning data.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::time::Instant;
use tracing::info;

use crate::api::{ApiClient, Endpoint, FetchError};

/// Default pause between two probes
pub const DEFAULT_PROBE_PAUSE: Duration = Duration::from_millis(100);

/// Maximum number of characters kept in a body preview
pub const PREVIEW_CHARS: usize = 150;

/// Outcome of probing one endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub endpoint: Endpoint,
    /// Whether the endpoint answered 2xx with a JSON body
    pub success: bool,
    /// HTTP status, when the backend answered at all
    pub status: Option<u16>,
    pub status_text: Option<String>,
    /// Whether the body carried anything besides empty containers
    pub has_data: bool,
    /// Start of the compact JSON body, for successful probes
    pub preview: Option<String>,
    /// Transport, timeout or parse failure description
    pub error: Option<String>,
    pub response_time: Duration,
}

/// Health of the backend derived from the share of successful probes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    /// Nothing was probed
    Unknown,
    /// Every endpoint succeeded
    Healthy,
    /// More than half of the endpoints succeeded
    Degraded,
    /// Half or fewer succeeded
    Down,
}

impl OverallStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OverallStatus::Unknown => "unknown",
            OverallStatus::Healthy => "healthy",
            OverallStatus::Degraded => "degraded",
            OverallStatus::Down => "down",
        }
    }
}

/// Results of one probe run
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub results: Vec<ProbeResult>,
    pub checked_at: DateTime<Local>,
}

impl ProbeReport {
    pub fn successes(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn overall_status(&self) -> OverallStatus {
        overall_status(&self.results)
    }
}

/// Classify a set of probe results
pub fn overall_status(results: &[ProbeResult]) -> OverallStatus {
    if results.is_empty() {
        return OverallStatus::Unknown;
    }

    let successes = results.iter().filter(|r| r.success).count();
    if successes == results.len() {
        OverallStatus::Healthy
    } else if successes * 2 > results.len() {
        OverallStatus::Degraded
    } else {
        OverallStatus::Down
    }
}

/// Whether a response body holds real data
///
/// A body counts as empty when it is not a container, when the container has
/// no entries, or when every entry is null or an empty container.
pub fn has_data(body: &serde_json::Value) -> bool {
    use serde_json::Value;

    fn is_blank(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    match body {
        Value::Object(map) => !map.is_empty() && !map.values().all(is_blank),
        Value::Array(items) => !items.is_empty() && !items.iter().all(is_blank),
        _ => false,
    }
}

/// Compact JSON of `body`, cut to [`PREVIEW_CHARS`] characters
///
/// A cut preview ends with `...`.
pub fn body_preview(body: &serde_json::Value) -> String {
    let text = body.to_string();
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}

/// Probe one endpoint with a single attempt
pub async fn probe_endpoint(api: &ApiClient, endpoint: Endpoint) -> ProbeResult {
    let started = Instant::now();
    let outcome = api
        .fetcher()
        .fetch_once_with_status::<serde_json::Value>(&api.url_for(endpoint))
        .await;
    let response_time = started.elapsed();

    let mut result = ProbeResult {
        endpoint,
        success: false,
        status: None,
        status_text: None,
        has_data: false,
        preview: None,
        error: None,
        response_time,
    };

    match outcome {
        Ok((status, body)) => {
            result.success = true;
            result.status = Some(status);
            result.has_data = has_data(&body);
            result.preview = Some(body_preview(&body));
        }
        Err(FetchError::Http {
            status,
            status_text,
        }) => {
            result.status = Some(status);
            result.status_text = Some(status_text);
        }
        Err(e) => result.error = Some(e.to_string()),
    }

    result
}

/// Probe endpoints one after another, pausing between them
pub async fn probe_endpoints(api: &ApiClient, endpoints: &[Endpoint], pause: Duration) -> ProbeReport {
    let mut results = Vec::with_capacity(endpoints.len());

    for (i, endpoint) in endpoints.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(pause).await;
        }
        let result = probe_endpoint(api, *endpoint).await;
        info!(
            %endpoint,
            success = result.success,
            status = ?result.status,
            elapsed_ms = result.response_time.as_millis() as u64,
            "probed endpoint"
        );
        results.push(result);
    }

    ProbeReport {
        results,
        checked_at: Local::now(),
    }
}
