//! Client-side sync controller for the items API.
//!
//! # Overview
//! Keeps a local, ordered copy of the remote item collection in step with
//! the backend through four calls (health, list, create, delete) and exposes
//! busy/notification state for a presentation layer to render.
//!
//! # Design
//! - `ItemsClient` is stateless: `build_*` produces a request, `parse_*`
//!   consumes a response. It never touches the network.
//! - A `Transport` executes requests; `ReqwestTransport` is the real one.
//! - `RemoteClient` glues the two together, one round-trip per call.
//! - `SyncController` owns the `CollectionStore`, `OperationStatus` and
//!   `Notification` as a single `SyncView` and is the only thing that
//!   mutates them.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod remote;
pub mod state;
pub mod store;
pub mod transport;
pub mod types;

pub use client::ItemsClient;
pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use controller::{StartupReport, SyncController};
pub use error::{ApiError, Operation, SyncError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use remote::RemoteClient;
pub use state::{Notification, OperationStatus, SyncView};
pub use store::CollectionStore;
pub use transport::{ReqwestTransport, Transport};
pub use types::{CreateItem, HealthReport, Item, ItemId};
