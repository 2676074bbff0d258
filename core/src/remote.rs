//! Remote Client: `ItemsClient` paired with a `Transport`.
//!
//! Every call is build → execute → parse. Nothing is cached; each method is
//! exactly one network round-trip.

use tracing::{debug, warn};

use crate::client::ItemsClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{CreateItem, HealthReport, Item, ItemId};

#[derive(Debug, Clone)]
pub struct RemoteClient<T> {
    client: ItemsClient,
    transport: T,
}

impl<T: Transport> RemoteClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            client: ItemsClient::new(base_url),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub async fn check_health(&self) -> Result<HealthReport, ApiError> {
        let response = self.transport.execute(self.client.build_health_check()).await?;
        self.client.parse_health_check(response)
    }

    pub async fn list_items(&self) -> Result<Vec<Item>, ApiError> {
        let response = self.transport.execute(self.client.build_list_items()).await?;
        let items = self.client.parse_list_items(response)?;
        debug!(count = items.len(), "listed items");
        Ok(items)
    }

    /// `name` must already be trimmed and non-empty.
    pub async fn create_item(&self, name: &str) -> Result<Item, ApiError> {
        let request = self.client.build_create_item(&CreateItem {
            name: name.to_string(),
        })?;
        let response = self.transport.execute(request).await?;
        let item = self.client.parse_create_item(response)?;
        debug!(id = %item.id, "created item");
        Ok(item)
    }

    pub async fn delete_item(&self, id: ItemId) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_item(id)).await?;
        self.client.parse_delete_item(response).inspect_err(|e| {
            if e.is_not_found() {
                warn!(%id, "delete of unknown item");
            }
        })
    }
}
