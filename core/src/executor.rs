//! One logical HTTP call: retries, status checks, validation, metrics.
//!
//! # Design
//! The retry loop is driven by `RetryPolicy`'s state machine. Transport
//! failures and non-2xx statuses move it to `Retrying` or `Exhausted`;
//! anything wrong with a 2xx body (bad JSON, schema mismatch) is returned at
//! once, since another attempt would get the same body. Errors a transport
//! reports as non-retryable also return at once. Metrics are recorded
//! only for calls that validate.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::RequestConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::metrics::{MetricsCollector, RequestOutcome};
use crate::retry::{AttemptState, RetryPolicy};
use crate::schema::Validator;

/// Executes requests against one base URL and records outcomes into its own
/// `MetricsCollector`.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    base_url: String,
    metrics: MetricsCollector,
    metrics_exclusions: Arc<[String]>,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url)
            .field("metrics", &self.metrics.len())
            .field("metrics_exclusions", &self.metrics_exclusions)
            .finish()
    }
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            metrics: MetricsCollector::new(),
            metrics_exclusions: Arc::from(Vec::new()),
        }
    }

    /// Never record metrics for endpoints containing any of `fragments`.
    pub fn with_metrics_exclusions(mut self, fragments: Vec<String>) -> Self {
        self.metrics_exclusions = Arc::from(fragments);
        self
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request for `endpoint` (relative to the base URL). Only POST
    /// and PUT carry a body.
    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
        config: &RequestConfig,
    ) -> Result<HttpRequest, ApiError> {
        let request = HttpRequest::new(method, format!("{}{endpoint}", self.base_url))
            .with_timeout(config.timeout);
        match (method, body) {
            (HttpMethod::Post | HttpMethod::Put, Some(body)) => request.with_json_body(body),
            _ => Ok(request),
        }
    }

    /// Perform `method endpoint`, retrying per `config`, and validate the
    /// response body with `validator`.
    pub async fn execute<T, V>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        validator: &V,
        body: Option<&Value>,
        config: &RequestConfig,
    ) -> Result<T, ApiError>
    where
        V: Validator<T> + ?Sized,
    {
        let request = self.build_request(method, endpoint, body, config)?;
        let policy = RetryPolicy::from_config(config);
        let started = Instant::now();
        let mut state = policy.start();

        loop {
            debug!(%method, endpoint, ?state, "sending request");
            let outcome = match self.attempt(&request).await {
                Err(error) if !error.is_retryable() => return Err(error),
                outcome => outcome,
            };
            state = policy.next(state, outcome.is_ok());

            match (state, outcome) {
                (AttemptState::Succeeded { retry_count }, Ok(response)) => {
                    let status = response.status;
                    let value = self.complete(response, validator)?;
                    if config.track_metrics && !self.is_excluded(endpoint) {
                        self.metrics.record(RequestOutcome {
                            endpoint: endpoint.to_string(),
                            method,
                            duration_ms: elapsed_ms(started),
                            status,
                            retry_count,
                            timestamp: Utc::now(),
                        });
                    }
                    return Ok(value);
                }
                (AttemptState::Retrying { retry_count }, Err(error)) => {
                    warn!(%method, endpoint, retry_count, %error, "attempt failed, retrying");
                    tokio::time::sleep(policy.delay()).await;
                    state = policy.next(state, false);
                }
                (AttemptState::Exhausted { attempts }, Err(error)) => {
                    warn!(%method, endpoint, attempts, %error, "retries exhausted");
                    return Err(ApiError::ExhaustedRetries {
                        attempts,
                        last: Box::new(error),
                    });
                }
                (state, _) => unreachable!("retry policy left {state:?} after an attempt"),
            }
        }
    }

    async fn attempt(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let response = self.transport.send(request.clone()).await?;
        check_status(&response, &request.path)?;
        Ok(response)
    }

    fn complete<T, V>(&self, response: HttpResponse, validator: &V) -> Result<T, ApiError>
    where
        V: Validator<T> + ?Sized,
    {
        let raw = response.json()?;
        validator.validate(&raw).map_err(|error| {
            warn!(
                resource = validator.name(),
                fields = error.errors.len(),
                "response failed validation"
            );
            ApiError::Validation(error)
        })
    }

    fn is_excluded(&self, endpoint: &str) -> bool {
        self.metrics_exclusions
            .iter()
            .any(|fragment| endpoint.contains(fragment.as_str()))
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, url: &str) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound {
            url: url.to_string(),
        });
    }
    Err(ApiError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
