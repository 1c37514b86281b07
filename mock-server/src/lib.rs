//! In-process stand-in for the public placeholder REST API.
//!
//! # Design
//! Every resource is stored as raw JSON keyed by numeric id, so one set of
//! handlers serves all six collections. Responses mirror the upstream shapes:
//! create answers 201 with an assigned id, update merges the submitted fields,
//! delete answers 200 with `{}`. Query parameters filter list responses on any
//! field.
//!
//! `MockState` doubles as a test hook: `fail_next` makes the next requests
//! answer 503 so retry behavior can be exercised over real HTTP.

pub mod seed;

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        atomic::{AtomicU32, AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Collections served by the mock, by path segment.
pub const RESOURCES: [&str; 6] = ["posts", "comments", "albums", "photos", "todos", "users"];

pub type Records = BTreeMap<u64, Map<String, Value>>;
pub type Db = Arc<RwLock<HashMap<String, Collection>>>;

/// One resource's records plus the highest id ever issued for it, so ids
/// are never reused after a delete.
#[derive(Debug, Default)]
pub struct Collection {
    pub records: Records,
    last_id: u64,
}

impl Collection {
    pub fn new(records: Records) -> Self {
        let last_id = records.keys().next_back().copied().unwrap_or(0);
        Self { records, last_id }
    }

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Shared server state: the record store plus fault-injection counters.
#[derive(Clone, Default)]
pub struct MockState {
    db: Db,
    pending_faults: Arc<AtomicU32>,
    requests: Arc<AtomicU64>,
}

impl MockState {
    /// State with every collection present but empty.
    pub fn empty() -> Self {
        let collections = RESOURCES
            .iter()
            .map(|name| (name.to_string(), Collection::default()))
            .collect();
        Self {
            db: Arc::new(RwLock::new(collections)),
            ..Self::default()
        }
    }

    /// State populated with the deterministic fixtures from [`seed`].
    pub fn seeded() -> Self {
        let mut collections = HashMap::new();
        for name in RESOURCES {
            let records = seed::records(name)
                .into_iter()
                .filter_map(|value| match value {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .filter_map(|map| Some((map.get("id")?.as_u64()?, map)))
                .collect();
            collections.insert(name.to_string(), Collection::new(records));
        }
        Self {
            db: Arc::new(RwLock::new(collections)),
            ..Self::default()
        }
    }

    /// Answer the next `count` requests with 503 Service Unavailable.
    pub fn fail_next(&self, count: u32) {
        self.pending_faults.store(count, Ordering::SeqCst);
    }

    /// Number of requests that reached the server, including failed ones.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }
}

pub fn app() -> Router {
    router(MockState::seeded())
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/{resource}", get(list_records).post(create_record))
        .route(
            "/{resource}/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .layer(middleware::from_fn_with_state(state.clone(), inject_faults))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, MockState::seeded()).await
}

pub async fn serve(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state)).await
}

async fn inject_faults(State(state): State<MockState>, request: Request, next: Next) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let injected = state
        .pending_faults
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if injected {
        tracing::debug!(uri = %request.uri(), "injecting 503");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    next.run(request).await
}

/// True when the record's field renders to the same text as the query value.
fn field_matches(record: &Map<String, Value>, field: &str, expected: &str) -> bool {
    match record.get(field) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == expected,
        None => false,
    }
}

async fn list_records(
    State(state): State<MockState>,
    Path(resource): Path<String>,
    Query(filters): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Map<String, Value>>>, StatusCode> {
    let db = state.db.read().await;
    let collection = db.get(&resource).ok_or(StatusCode::NOT_FOUND)?;
    let records = collection
        .records
        .values()
        .filter(|record| {
            filters
                .iter()
                .all(|(field, value)| field_matches(record, field, value))
        })
        .cloned()
        .collect();
    Ok(Json(records))
}

async fn create_record(
    State(state): State<MockState>,
    Path(resource): Path<String>,
    Json(input): Json<Value>,
) -> Result<(StatusCode, Json<Map<String, Value>>), StatusCode> {
    let Value::Object(mut record) = input else {
        return Err(StatusCode::BAD_REQUEST);
    };
    let mut db = state.db.write().await;
    let collection = db.get_mut(&resource).ok_or(StatusCode::NOT_FOUND)?;
    let id = collection.next_id();
    record.insert("id".to_string(), json!(id));
    collection.records.insert(id, record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(
    State(state): State<MockState>,
    Path((resource, id)): Path<(String, u64)>,
) -> Result<Json<Map<String, Value>>, StatusCode> {
    let db = state.db.read().await;
    db.get(&resource)
        .and_then(|collection| collection.records.get(&id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_record(
    State(state): State<MockState>,
    Path((resource, id)): Path<(String, u64)>,
    Json(input): Json<Value>,
) -> Result<Json<Map<String, Value>>, StatusCode> {
    let Value::Object(changes) = input else {
        return Err(StatusCode::BAD_REQUEST);
    };
    let mut db = state.db.write().await;
    let record = db
        .get_mut(&resource)
        .and_then(|collection| collection.records.get_mut(&id))
        .ok_or(StatusCode::NOT_FOUND)?;
    for (field, value) in changes {
        if field != "id" {
            record.insert(field, value);
        }
    }
    Ok(Json(record.clone()))
}

async fn delete_record(
    State(state): State<MockState>,
    Path((resource, id)): Path<(String, u64)>,
) -> Result<Json<Value>, StatusCode> {
    let mut db = state.db.write().await;
    db.get_mut(&resource)
        .and_then(|collection| collection.records.remove(&id))
        .map(|_| Json(json!({})))
        .ok_or(StatusCode::NOT_FOUND)
}
