//! In-memory transport that answers from a per-route script.
//!
//! Routes are keyed by method and the URL path after `BASE_URL`, so tests do
//! not depend on the order in which concurrent calls reach the transport.
//! A gated transport parks every call until the test hands out a permit,
//! which is how tests observe the controller while an operation is in flight.
//! A delayed route answers only after its delay, which fixes the order in
//! which concurrent calls resolve.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use items_core::{ApiError, ClientConfig, HttpMethod, HttpRequest, HttpResponse, SyncController, Transport};
use tokio::sync::Semaphore;

pub const BASE_URL: &str = "http://items.test/api";

type Script = HashMap<(HttpMethod, String), VecDeque<Result<HttpResponse, ApiError>>>;

#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
    requests: Mutex<Vec<HttpRequest>>,
    delays: Mutex<HashMap<(HttpMethod, String), Duration>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Transport whose calls block until a permit is added to the returned
    /// semaphore (one permit per call).
    pub fn gated() -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let transport = Self {
            gate: Some(gate.clone()),
            ..Self::default()
        };
        (Arc::new(transport), gate)
    }

    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.push(method, path, Ok(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, method: HttpMethod, path: &str, error: ApiError) {
        self.push(method, path, Err(error));
    }

    /// Every call to this route sleeps for `delay` before answering.
    pub fn delay(&self, method: HttpMethod, path: &str, delay: Duration) {
        self.delays.lock().unwrap().insert((method, path.to_string()), delay);
    }

    fn push(&self, method: HttpMethod, path: &str, outcome: Result<HttpResponse, ApiError>) {
        self.script
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(outcome);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        let key = (
            request.method,
            request
                .url
                .strip_prefix(BASE_URL)
                .unwrap_or(&request.url)
                .to_string(),
        );
        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.script
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("no scripted response for {} {}", request.method, request.url))
    }
}

pub fn controller(transport: &Arc<ScriptedTransport>) -> SyncController<Arc<ScriptedTransport>> {
    SyncController::new(ClientConfig::new(BASE_URL), transport.clone())
}

pub fn item_json(id: i64, name: &str) -> String {
    format!(r#"{{"id":{id},"name":"{name}","created_at":"2024-01-01T00:00:{:02}Z"}}"#, id % 60)
}

pub fn list_json(items: &[(i64, &str)]) -> String {
    let body: Vec<String> = items.iter().map(|(id, name)| item_json(*id, name)).collect();
    format!("[{}]", body.join(","))
}
