//! Error types for the remote client and the sync controller.
//!
//! # Design
//! `ApiError` classifies what went wrong on one HTTP exchange. `NotFound`
//! gets its own variant because a delete of an id that is already gone is
//! worth telling apart from a generic server failure. `SyncError` is what a
//! controller operation reports back; by the time a caller sees one, the
//! matching notification has already been recorded.

use thiserror::Error;

/// Failure of a single remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered 404.
    #[error("{message}")]
    NotFound { message: String },

    /// A non-2xx status whose body carried an `error` message.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Any other non-2xx status; the raw body is kept for debugging.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response (connection refused, DNS, ...).
    #[error("{0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// HTTP status for errors that got as far as a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Rejected { status, .. } | ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The controller operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Refresh,
    Create,
    Remove,
}

impl Operation {
    /// Prefix used for the failure notification.
    pub(crate) fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Refresh => "Failed to fetch items",
            Operation::Create => "Failed to create item",
            Operation::Remove => "Failed to delete item",
        }
    }
}

/// Outcome of a rejected or failed controller operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Input was rejected before any network call.
    #[error("{0}")]
    Validation(String),

    /// The remote call for `operation` failed.
    #[error("{}: {source}", .operation.failure_prefix())]
    Transport { operation: Operation, source: ApiError },

    /// The health check failed. Displays as the notification text; the
    /// cause is the error source.
    #[error("{}", crate::controller::API_CONNECTION_FAILED_MESSAGE)]
    Connectivity(#[source] ApiError),

    /// Another operation is already in flight.
    #[error("another operation is in progress")]
    Busy,
}
