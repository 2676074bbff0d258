//! Sync Controller: drives the Remote Client and owns the observable state.
//!
//! # Design
//! The collection, the operation status and the notification live together
//! in one `SyncView` behind a `watch` channel. Each transition is a single
//! `send_modify`, so a reader never sees a half-applied operation: an
//! operation is visible as `Busy`, then as its complete outcome with `Idle`.
//!
//! `refresh`, `create` and `remove` are mutually exclusive. One started while
//! another is in flight is rejected with `SyncError::Busy` and changes
//! nothing. The health check is outside that rule because it only ever
//! touches the notification.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, Operation, SyncError};
use crate::remote::RemoteClient;
use crate::state::{Notification, OperationStatus, SyncView};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{HealthReport, Item, ItemId};

pub const EMPTY_NAME_MESSAGE: &str = "Please enter a name";
pub const ITEMS_LOADED_MESSAGE: &str = "Items loaded";
pub const ITEM_CREATED_MESSAGE: &str = "Item created successfully";
pub const ITEM_DELETED_MESSAGE: &str = "Item deleted successfully";
pub const API_CONNECTED_MESSAGE: &str = "API Connected";
pub const API_CONNECTION_FAILED_MESSAGE: &str = "API Connection Failed";

/// Results of the two independent startup steps.
#[derive(Debug)]
pub struct StartupReport {
    pub refresh: Result<(), SyncError>,
    pub health: Result<HealthReport, SyncError>,
}

pub struct SyncController<T> {
    remote: RemoteClient<T>,
    config: ClientConfig,
    state: watch::Sender<SyncView>,
}

impl SyncController<ReqwestTransport> {
    /// Controller talking HTTP through `reqwest`.
    pub fn connect(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> SyncController<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        let remote = RemoteClient::new(&config.base_url, transport);
        let (state, _) = watch::channel(SyncView::default());
        Self { remote, config, state }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Initial load: fetch the collection and check the API. Both run
    /// concurrently and neither affects the other's outcome.
    ///
    /// Whatever order they resolve in, a failure is what startup leaves on
    /// display: the refresh failure if there is one, otherwise the
    /// connectivity failure.
    pub async fn start(&self) -> StartupReport {
        info!(base_url = %self.remote.base_url(), "starting sync controller");
        let (refresh, health) = tokio::join!(self.refresh(), self.check_health());
        let failure = match (&refresh, &health) {
            (Err(err @ SyncError::Transport { .. }), _) | (_, Err(err)) => Some(err.to_string()),
            _ => None,
        };
        if let Some(message) = failure {
            self.notify(Notification::Error(message));
        }
        StartupReport { refresh, health }
    }

    /// Replace the local collection with the server's.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        let in_flight = self.begin(Operation::Refresh)?;
        match self.remote.list_items().await {
            Ok(items) => {
                in_flight.finish(|view| {
                    view.items.replace_all(items);
                    view.notification = Some(Notification::info(ITEMS_LOADED_MESSAGE));
                });
                Ok(())
            }
            Err(source) => Err(in_flight.fail(source)),
        }
    }

    /// Create an item named `name` (trimmed). On success the record the
    /// server returned is appended and handed back, so the caller can reset
    /// its input.
    pub async fn create(&self, name: &str) -> Result<Item, SyncError> {
        let name = name.trim();
        if name.is_empty() {
            self.notify(Notification::error(EMPTY_NAME_MESSAGE));
            return Err(SyncError::Validation(EMPTY_NAME_MESSAGE.to_string()));
        }

        let in_flight = self.begin(Operation::Create)?;
        match self.remote.create_item(name).await {
            Ok(item) => {
                let created = item.clone();
                in_flight.finish(|view| {
                    if !view.items.append(item) {
                        warn!(id = %created.id, "server returned an id already in the collection");
                    }
                    view.notification = Some(Notification::info(ITEM_CREATED_MESSAGE));
                });
                Ok(created)
            }
            Err(source) => Err(in_flight.fail(source)),
        }
    }

    /// Delete `id`. Confirmation is the caller's business and must already
    /// have happened.
    pub async fn remove(&self, id: ItemId) -> Result<(), SyncError> {
        let in_flight = self.begin(Operation::Remove)?;
        match self.remote.delete_item(id).await {
            Ok(()) => {
                in_flight.finish(|view| {
                    if !view.items.remove_by_id(id) {
                        debug!(%id, "deleted item was not in the local collection");
                    }
                    view.notification = Some(Notification::info(ITEM_DELETED_MESSAGE));
                });
                Ok(())
            }
            Err(source) => Err(in_flight.fail(source)),
        }
    }

    /// Check that the API is reachable. Only the notification is updated; the failure detail
    /// stays in the returned error's source.
    pub async fn check_health(&self) -> Result<HealthReport, SyncError> {
        match self.remote.check_health().await {
            Ok(report) => {
                self.notify(Notification::info(API_CONNECTED_MESSAGE));
                Ok(report)
            }
            Err(source) => {
                warn!(error = %source, "health check failed");
                let err = SyncError::Connectivity(source);
                self.notify(Notification::Error(err.to_string()));
                Err(err)
            }
        }
    }

    pub fn view(&self) -> SyncView {
        self.state.borrow().clone()
    }

    pub fn snapshot(&self) -> Vec<Item> {
        self.state.borrow().snapshot().to_vec()
    }

    pub fn count(&self) -> usize {
        self.state.borrow().count()
    }

    pub fn status(&self) -> OperationStatus {
        self.state.borrow().status()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.state.borrow().notification().cloned()
    }

    /// Receiver that is woken on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SyncView> {
        self.state.subscribe()
    }

    fn notify(&self, notification: Notification) {
        self.state.send_modify(|view| view.notification = Some(notification));
    }

    /// Atomically check for and claim the busy slot.
    fn begin(&self, operation: Operation) -> Result<InFlight<'_>, SyncError> {
        let claimed = self.state.send_if_modified(|view| {
            if view.status.is_busy() {
                return false;
            }
            view.status = OperationStatus::Busy;
            true
        });
        if !claimed {
            warn!(?operation, "rejected: another operation is in progress");
            return Err(SyncError::Busy);
        }
        debug!(?operation, "operation started");
        Ok(InFlight {
            state: &self.state,
            operation,
            armed: true,
        })
    }
}

/// Holds the busy slot for one operation. Releasing it always goes through
/// a single state update; if the operation's future is dropped mid-flight the
/// slot is released without touching anything else.
struct InFlight<'a> {
    state: &'a watch::Sender<SyncView>,
    operation: Operation,
    armed: bool,
}

impl InFlight<'_> {
    fn finish(mut self, apply: impl FnOnce(&mut SyncView)) {
        self.armed = false;
        self.state.send_modify(|view| {
            apply(view);
            view.status = OperationStatus::Idle;
        });
        debug!(operation = ?self.operation, "operation finished");
    }

    fn fail(self, source: ApiError) -> SyncError {
        let err = SyncError::Transport {
            operation: self.operation,
            source,
        };
        warn!(operation = ?self.operation, error = %err, "operation failed");
        let message = err.to_string();
        self.finish(|view| view.notification = Some(Notification::Error(message)));
        err
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(operation = ?self.operation, "operation dropped before completion");
            self.state.send_modify(|view| view.status = OperationStatus::Idle);
        }
    }
}
