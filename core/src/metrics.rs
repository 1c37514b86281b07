//! Raw per-client trace of completed requests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::http::HttpMethod;

/// One successful, validated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOutcome {
    /// Path relative to the base URL, including any query string.
    pub endpoint: String,
    pub method: HttpMethod,
    /// Wall time across all attempts, retry delays included.
    pub duration_ms: u64,
    pub status: u16,
    pub retry_count: u32,
    pub timestamp: DateTime<Utc>,
}

/// Append-only log of `RequestOutcome`s, cleared explicitly.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    entries: Arc<Mutex<Vec<RequestOutcome>>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: RequestOutcome) {
        self.entries.lock().push(outcome);
    }

    /// A copy of the log in recording order.
    pub fn snapshot(&self) -> Vec<RequestOutcome> {
        self.entries.lock().clone()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(endpoint: &str) -> RequestOutcome {
        RequestOutcome {
            endpoint: endpoint.to_string(),
            method: HttpMethod::Get,
            duration_ms: 12,
            status: 200,
            retry_count: 0,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn records_in_order() {
        let metrics = MetricsCollector::new();
        metrics.record(outcome("/posts"));
        metrics.record(outcome("/posts/1"));
        let endpoints: Vec<String> = metrics.snapshot().into_iter().map(|m| m.endpoint).collect();
        assert_eq!(endpoints, vec!["/posts", "/posts/1"]);
    }

    #[test]
    fn snapshot_is_detached() {
        let metrics = MetricsCollector::new();
        metrics.record(outcome("/posts"));
        let mut snapshot = metrics.snapshot();
        snapshot.clear();
        snapshot.push(outcome("/forged"));
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics.snapshot()[0].endpoint, "/posts");
    }

    #[test]
    fn clear_empties_the_log() {
        let metrics = MetricsCollector::new();
        metrics.record(outcome("/posts"));
        metrics.record(outcome("/users"));
        assert_eq!(metrics.len(), 2);
        metrics.clear();
        assert!(metrics.is_empty());
    }

    #[test]
    fn outcome_serializes_method_as_verb() {
        let json = serde_json::to_value(outcome("/todos/1")).unwrap();
        assert_eq!(json["method"], "GET");
        assert_eq!(json["retryCount"], 0);
        assert_eq!(json["durationMs"], 12);
    }
}
