//! Error types for the placeholder API client.
//!
//! # Design
//! Transport failures and non-2xx statuses are retryable; they reach the
//! caller either directly or wrapped in `ExhaustedRetries`, which keeps the
//! last failure as its source. `Validation` is never retried and carries every
//! field-level mismatch so a failing test can be diagnosed from its message
//! alone.

use std::fmt;

use thiserror::Error;

/// Errors returned by the executor and the resource clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout...).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found: {url}")]
    NotFound { url: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The response body did not match the expected schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested HTTP verb is not one of GET, POST, PUT, DELETE.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The resource does not declare the requested filter field.
    #[error("{resource} cannot be filtered by `{field}`")]
    UnsupportedFilter { resource: &'static str, field: String },

    /// Every allowed attempt failed.
    #[error("request failed after {attempts} attempts: {last}")]
    ExhaustedRetries {
        attempts: u32,
        #[source]
        last: Box<ApiError>,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A 2xx response body was not valid JSON, or a validated payload could
    /// not be converted into its Rust type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Client settings could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Whether another attempt might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_) | ApiError::NotFound { .. } | ApiError::HttpStatus { .. }
        )
    }
}

/// One mismatch between a payload and its schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path to the field, e.g. `address.geo.lat` or `[3].email`.
    pub path: String,
    pub expected: &'static str,
    pub actual: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        write!(f, "{path}: expected {}, got {}", self.expected, self.actual)
    }
}

/// A payload failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub resource: &'static str,
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(resource: &'static str, errors: Vec<FieldError>) -> Self {
        Self { resource, errors }
    }

    /// Prepend `prefix` to every field path, used when validating list items.
    pub fn prefixed(mut self, prefix: &str) -> Self {
        for error in &mut self.errors {
            error.path = if error.path.is_empty() || error.path.starts_with('[') {
                format!("{prefix}{}", error.path)
            } else {
                format!("{prefix}.{}", error.path)
            };
        }
        self
    }

    /// Field paths that failed, in the order they were found.
    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation error: {} failed with {} field error(s)",
            self.resource,
            self.errors.len()
        )?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(path: &str) -> FieldError {
        FieldError {
            path: path.to_string(),
            expected: "string",
            actual: "number (123)".to_string(),
        }
    }

    #[test]
    fn validation_message_lists_every_field() {
        let err = ValidationError::new("post", vec![field("body"), field("userId")]);
        let msg = err.to_string();
        assert!(msg.contains("validation error: post failed with 2 field error(s)"));
        assert!(msg.contains("body: expected string, got number (123)"));
        assert!(msg.contains("userId: expected string"));
    }

    #[test]
    fn prefixed_joins_paths() {
        let err = ValidationError::new("post", vec![field("title"), field(""), field("[1]")])
            .prefixed("[2]");
        assert_eq!(err.paths(), vec!["[2].title", "[2]", "[2][1]"]);
    }

    #[test]
    fn root_path_is_named() {
        assert!(field("").to_string().starts_with("<root>:"));
    }

    #[test]
    fn exhausted_retries_keeps_last_failure() {
        let err = ApiError::ExhaustedRetries {
            attempts: 4,
            last: Box::new(ApiError::HttpStatus {
                status: 503,
                body: "busy".to_string(),
            }),
        };
        assert_eq!(err.to_string(), "request failed after 4 attempts: HTTP 503: busy");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "HTTP 503: busy");
    }

    #[test]
    fn only_transport_level_failures_retry() {
        assert!(ApiError::Transport("refused".into()).is_retryable());
        assert!(ApiError::HttpStatus { status: 500, body: String::new() }.is_retryable());
        assert!(!ApiError::Validation(ValidationError::new("post", vec![])).is_retryable());
        assert!(!ApiError::Deserialization("eof".into()).is_retryable());
    }
}
