//! Scripted in-memory transport for unit tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

type Handler = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync>;
type Latency = Box<dyn Fn(&HttpRequest) -> Duration + Send + Sync>;

/// Answers from a queue of scripted results, then from a fallback handler.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    handler: Option<Handler>,
    latency: Option<Latency>,
    requests: Mutex<Vec<HttpRequest>>,
}

pub fn json_response(status: u16, body: &Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: Vec::new(),
        body: body.to_string(),
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_json(self, status: u16, body: Value) -> Self {
        self.script.lock().push_back(Ok(json_response(status, &body)));
        self
    }

    pub fn then_status(self, status: u16) -> Self {
        self.script.lock().push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: String::new(),
        }));
        self
    }

    pub fn then_fail(self, message: &str) -> Self {
        self.script
            .lock()
            .push_back(Err(ApiError::Transport(message.to_string())));
        self
    }

    /// Answer every unscripted request with `handler`.
    pub fn otherwise(
        mut self,
        handler: impl Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
    ) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Answer every unscripted request with the same JSON body.
    pub fn always_json(self, status: u16, body: Value) -> Self {
        self.otherwise(move |_| Ok(json_response(status, &body)))
    }

    /// Sleep before answering; pairs with a paused clock.
    pub fn with_latency(
        mut self,
        latency: impl Fn(&HttpRequest) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.latency = Some(Box::new(latency));
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().push(request.clone());
        if let Some(latency) = &self.latency {
            tokio::time::sleep(latency(&request)).await;
        }
        let scripted = self.script.lock().pop_front();
        match (scripted, &self.handler) {
            (Some(result), _) => result,
            (None, Some(handler)) => handler(&request),
            (None, None) => Err(ApiError::Transport("script exhausted".to_string())),
        }
    }
}
