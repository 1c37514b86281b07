//! Per-call request options and process-level client settings.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Options for a single call. Omitted fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestConfig {
    /// Retries after the first attempt; `max_retries + 1` attempts in total.
    pub max_retries: u32,
    /// Fixed wait between attempts.
    #[serde(rename = "retryDelayMs", with = "millis")]
    pub retry_delay: Duration,
    pub use_cache: bool,
    pub track_metrics: bool,
    /// Handed to the transport with each request.
    #[serde(rename = "timeoutMs", with = "millis")]
    pub timeout: Duration,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            use_cache: true,
            track_metrics: false,
            timeout: Duration::from_millis(30_000),
        }
    }
}

impl RequestConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_metrics(mut self, track_metrics: bool) -> Self {
        self.track_metrics = track_metrics;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Stricter policy for filtered queries: 5 retries, 500ms apart.
    pub fn filtered(&self) -> Self {
        self.clone()
            .with_max_retries(5)
            .with_retry_delay(Duration::from_millis(500))
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Settings shared by every client built from one `ApiClients`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientSettings {
    pub base_url: String,
    /// Options used by the fixed-name wrapper methods.
    pub defaults: RequestConfig,
    #[serde(rename = "cacheTtlSecs", deserialize_with = "secs")]
    pub cache_ttl: Duration,
    /// Endpoints containing any of these fragments are never recorded in
    /// metrics, even when tracking is requested.
    pub metrics_exclusions: Vec<String>,
}

fn secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            defaults: RequestConfig::default(),
            cache_ttl: crate::cache::DEFAULT_TTL,
            metrics_exclusions: Vec::new(),
        }
    }
}

impl ClientSettings {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Load settings from `PLACEHOLDER_*` environment variables, falling back
    /// to the defaults for anything unset.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut settings = match lookup("PLACEHOLDER_BASE_URL") {
            Some(url) => Self::new(&url),
            None => Self::default(),
        };

        if let Some(ms) = parse_var(&lookup, "PLACEHOLDER_TIMEOUT_MS")? {
            settings.defaults.timeout = Duration::from_millis(ms);
        }
        if let Some(n) = parse_var(&lookup, "PLACEHOLDER_MAX_RETRIES")? {
            settings.defaults.max_retries = u32::try_from(n).map_err(|_| {
                ApiError::Config(format!("PLACEHOLDER_MAX_RETRIES out of range: {n}"))
            })?;
        }
        if let Some(ms) = parse_var(&lookup, "PLACEHOLDER_RETRY_DELAY_MS")? {
            settings.defaults.retry_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_var(&lookup, "PLACEHOLDER_CACHE_TTL_SECS")? {
            settings.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(list) = lookup("PLACEHOLDER_METRICS_EXCLUDE") {
            settings.metrics_exclusions = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(settings)
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>, ApiError> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| ApiError::Config(format!("{key}={raw:?}: {e}")))
        })
        .transpose()
}
