//! In-memory stand-in for the items backend.
//!
//! Serves the same HTTP contract as the production API (`/api/health`,
//! `/api/items`, `/api/items/{id}`) so the sync controller can be exercised
//! end-to-end without a database. Failure responses carry an `{"error": ...}`
//! body, which is what the client surfaces to the user.

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// `name` is optional here so a missing field maps to our own 400 body
/// instead of axum's 422 rejection.
#[derive(Deserialize)]
pub struct CreateItem {
    #[serde(default)]
    pub name: Option<String>,
}

/// Rows keyed by id, plus the sequence and clock used to stamp new rows.
#[derive(Debug, Default)]
pub struct ItemTable {
    rows: BTreeMap<i64, Item>,
    last_id: i64,
    last_created: Option<DateTime<Utc>>,
}

impl ItemTable {
    fn insert(&mut self, name: String) -> Item {
        self.last_id += 1;
        let now = Utc::now();
        // Keep created_at strictly increasing even if the clock stalls.
        let created_at = match self.last_created {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_created = Some(created_at);
        let item = Item {
            id: self.last_id,
            name,
            created_at,
        };
        self.rows.insert(item.id, item.clone());
        item
    }

    /// Newest first, matching the production `ORDER BY created_at DESC`.
    fn newest_first(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self.rows.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        items
    }
}

pub type Db = Arc<RwLock<ItemTable>>;

/// Shared server state. Cloning shares the underlying table and health flag,
/// so tests can keep a handle and flip the server into an unhealthy state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Db,
    healthy: Arc<AtomicBool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            db: Arc::new(RwLock::new(ItemTable::default())),
            healthy: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl AppState {
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}

/// Error response rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub fn app() -> Router {
    app_with_state(AppState::default())
}

pub fn app_with_state(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", delete(delete_item));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, AppState::default()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn health_check(State(state): State<AppState>) -> Response {
    let timestamp = Utc::now().to_rfc3339();
    if state.is_healthy() {
        let body = json!({
            "status": "healthy",
            "database": "connected",
            "timestamp": timestamp,
        });
        (StatusCode::OK, Json(body)).into_response()
    } else {
        tracing::error!("health check failed: database unavailable");
        let body = json!({
            "status": "unhealthy",
            "database": "disconnected",
            "error": "database unavailable",
            "timestamp": timestamp,
        });
        (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
    }
}

async fn list_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    Json(state.db.read().await.newest_first())
}

async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<CreateItem>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), ApiFailure> {
    let name = match payload {
        Ok(Json(CreateItem { name: Some(name) })) => name,
        _ => return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Name is required")),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, "Name cannot be empty"));
    }

    let item = state.db.write().await.insert(name.to_string());
    tracing::info!(id = item.id, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    let mut table = state.db.write().await;
    match table.rows.remove(&id) {
        Some(_) => {
            tracing::info!(id, "item deleted");
            Ok(Json(json!({ "message": "Item deleted successfully" })))
        }
        None => Err(ApiFailure::new(StatusCode::NOT_FOUND, "Item not found")),
    }
}
