//! Generic resource client: cache-first reads, uncached writes.
//!
//! # Design
//! `ResourceClient<R>` composes a `RequestExecutor` (which owns this
//! client's metrics) with a `ResponseCache` shared across clients. Only the
//! idempotent reads (`list_all`, `get_by_id`, `get_by_field`) consult or fill
//! the cache, and only after the response has validated. Writes never touch
//! the cache, so callers that need fresh reads after a mutation must call
//! `clear_cache`.
//!
//! Filtering is server-side: `get_by_field` sends `GET base?field=value` and
//! caches under that same key.

use std::fmt::{self, Display};
use std::future::Future;
use std::marker::PhantomData;

use futures::future::try_join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheKey, ResponseCache};
use crate::config::RequestConfig;
use crate::error::ApiError;
use crate::executor::RequestExecutor;
use crate::http::HttpMethod;
use crate::metrics::RequestOutcome;
use crate::schema::{AnyValidator, ListValidator, SchemaValidator};
use crate::types::Resource;

/// CRUD client for one resource type.
pub struct ResourceClient<R> {
    executor: RequestExecutor,
    cache: ResponseCache,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            cache: self.cache.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("resource", &R::PATH)
            .field("executor", &self.executor)
            .finish()
    }
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(executor: RequestExecutor, cache: ResponseCache) -> Self {
        Self {
            executor,
            cache,
            _resource: PhantomData,
        }
    }

    pub async fn list_all(&self, config: &RequestConfig) -> Result<Vec<R>, ApiError> {
        let validator = ListValidator(SchemaValidator::<R>::for_resource());
        self.cached(CacheKey::list(R::PATH), config, || {
            self.executor
                .execute(HttpMethod::Get, R::PATH, &validator, None, config)
        })
        .await
    }

    pub async fn get_by_id(&self, id: u64, config: &RequestConfig) -> Result<R, ApiError> {
        let validator = SchemaValidator::<R>::for_resource();
        let endpoint = format!("{}/{id}", R::PATH);
        self.cached(CacheKey::by_id(R::PATH, id), config, || {
            self.executor
                .execute(HttpMethod::Get, &endpoint, &validator, None, config)
        })
        .await
    }

    /// Records whose `field` equals `value`, filtered by the server.
    ///
    /// Uses the stricter filtered retry policy on top of `config`. Fails with
    /// `UnsupportedFilter` if `R` does not declare `field`.
    pub async fn get_by_field(
        &self,
        field: &str,
        value: impl Display,
        config: &RequestConfig,
    ) -> Result<Vec<R>, ApiError> {
        if !R::FILTER_FIELDS.contains(&field) {
            return Err(ApiError::UnsupportedFilter {
                resource: R::NAME,
                field: field.to_string(),
            });
        }

        let value: String =
            url::form_urlencoded::byte_serialize(value.to_string().as_bytes()).collect();
        let key = CacheKey::by_field(R::PATH, field, &value);
        let endpoint = key.to_string();
        let config = config.filtered();
        let validator = ListValidator(SchemaValidator::<R>::for_resource());
        self.cached(key, &config, || {
            self.executor
                .execute(HttpMethod::Get, &endpoint, &validator, None, &config)
        })
        .await
    }

    pub async fn create(
        &self,
        payload: &impl Serialize,
        config: &RequestConfig,
    ) -> Result<R, ApiError> {
        let body = to_body(payload)?;
        self.executor
            .execute(
                HttpMethod::Post,
                R::PATH,
                &SchemaValidator::<R>::for_resource(),
                Some(&body),
                config,
            )
            .await
    }

    pub async fn update(
        &self,
        id: u64,
        payload: &impl Serialize,
        config: &RequestConfig,
    ) -> Result<R, ApiError> {
        let body = to_body(payload)?;
        self.executor
            .execute(
                HttpMethod::Put,
                &format!("{}/{id}", R::PATH),
                &SchemaValidator::<R>::for_resource(),
                Some(&body),
                config,
            )
            .await
    }

    /// Delete one record. Cached reads that include it are left in place.
    pub async fn delete(&self, id: u64, config: &RequestConfig) -> Result<(), ApiError> {
        self.executor
            .execute(
                HttpMethod::Delete,
                &format!("{}/{id}", R::PATH),
                &AnyValidator,
                None,
                config,
            )
            .await
            .map(|_: Value| ())
    }

    /// Copy of this client's metrics log.
    pub fn metrics(&self) -> Vec<RequestOutcome> {
        self.executor.metrics().snapshot()
    }

    pub fn clear_metrics(&self) {
        self.executor.metrics().clear();
    }

    /// Clear the shared cache, for every client holding it.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub async fn batch<T, F, Fut>(
        &self,
        operations: impl IntoIterator<Item = F>,
    ) -> Result<Vec<T>, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        batch(operations).await
    }

    async fn cached<T, F, Fut>(
        &self,
        key: CacheKey,
        config: &RequestConfig,
        fetch: F,
    ) -> Result<T, ApiError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if config.use_cache {
            if let Some(hit) = self.cache.get::<T>(&key) {
                debug!(%key, "cache hit");
                return Ok(hit);
            }
        }

        let value = fetch().await?;
        if config.use_cache {
            self.cache.set(key, value.clone());
        }
        Ok(value)
    }
}

/// Run `operations` concurrently. Results keep submission order; the first
/// failure fails the whole batch.
pub async fn batch<T, F, Fut>(operations: impl IntoIterator<Item = F>) -> Result<Vec<T>, ApiError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    try_join_all(operations.into_iter().map(|operation| operation())).await
}

fn to_body(payload: &impl Serialize) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(|e| ApiError::Serialization(e.to_string()))
}
