//! What a presentation layer can observe: the collection, whether an
//! operation is in flight, and the current notification.

use std::fmt;

use crate::store::CollectionStore;
use crate::types::Item;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OperationStatus {
    #[default]
    Idle,
    Busy,
}

impl OperationStatus {
    pub fn is_busy(self) -> bool {
        self == OperationStatus::Busy
    }
}

/// The single current message for the user. A new one replaces the old.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Info(String),
    Error(String),
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Notification::Info(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification::Error(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Notification::Info(m) | Notification::Error(m) => m,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error(_))
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Everything the controller exposes, updated as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncView {
    pub(crate) items: CollectionStore,
    pub(crate) status: OperationStatus,
    pub(crate) notification: Option<Notification>,
}

impl SyncView {
    pub fn snapshot(&self) -> &[Item] {
        self.items.snapshot()
    }

    pub fn count(&self) -> usize {
        self.items.count()
    }

    pub fn status(&self) -> OperationStatus {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status.is_busy()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }
}
