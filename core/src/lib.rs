//! Request layer for testing the JSONPlaceholder REST API.
//!
//! # Overview
//! Six resource clients (posts, comments, albums, photos, todos, users) share
//! one request path: check the response cache, otherwise send through a
//! `Transport` with fixed-delay retries, validate the JSON body against the
//! resource schema, record a metrics entry, then fill the cache.
//!
//! # Design
//! - `Transport` is the only I/O seam. `ReqwestTransport` talks HTTP; tests
//!   script responses in memory or run against the `mock-server` crate.
//! - `RequestExecutor` owns retries (`retry::RetryPolicy`), validation and
//!   per-client metrics. It never caches.
//! - `ResourceClient<R>` is the one generic client; `resources` adds the
//!   fixed-name wrappers and the `ApiClients` bundle that shares one
//!   `ResponseCache` between all six.
//! - Entity types are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod metrics;
pub mod resources;
pub mod retry;
pub mod schema;
pub mod types;

#[cfg(test)]
mod testing;

pub use cache::{CacheKey, ResponseCache};
pub use client::{batch, ResourceClient};
pub use config::{ClientSettings, RequestConfig};
pub use error::{ApiError, FieldError, ValidationError};
pub use executor::RequestExecutor;
pub use http::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use metrics::{MetricsCollector, RequestOutcome};
pub use resources::{
    AlbumsClient, ApiClients, CommentsClient, PhotosClient, PostsClient, TodosClient, UsersClient,
};
pub use schema::{Schema, SchemaValidator, Validator};
pub use types::{
    Address, Album, AlbumPatch, Comment, CommentPatch, Company, Geo, Photo, PhotoPatch, Post,
    PostPatch, Resource, Todo, TodoPatch, User, UserPatch,
};
