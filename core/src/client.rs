//! Stateless HTTP request builder and response parser for the items API.
//!
//! # Design
//! `ItemsClient` holds only a `base_url`. Each remote call is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; whoever sits in between does the actual
//! round-trip. Any 2xx status counts as success. Failure bodies are mined for
//! an `{"error": ...}` message so the user sees what the server said.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateItem, HealthReport, Item, ItemId};

/// Synchronous, stateless client for the items API.
#[derive(Debug, Clone)]
pub struct ItemsClient {
    base_url: String,
}

impl ItemsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_health_check(&self) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Get, format!("{}/health", self.base_url))
    }

    pub fn build_list_items(&self) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Get, format!("{}/items", self.base_url))
    }

    /// The name is sent as given; trimming and emptiness checks are the
    /// caller's job.
    pub fn build_create_item(&self, input: &CreateItem) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::json(HttpMethod::Post, format!("{}/items", self.base_url), body))
    }

    pub fn build_delete_item(&self, id: ItemId) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Delete, format!("{}/items/{id}", self.base_url))
    }

    /// Any 2xx is healthy. The body is informational and parsed leniently.
    pub fn parse_health_check(&self, response: HttpResponse) -> Result<HealthReport, ApiError> {
        check_status(&response)?;
        Ok(serde_json::from_str(&response.body).unwrap_or_default())
    }

    pub fn parse_list_items(&self, response: HttpResponse) -> Result<Vec<Item>, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_create_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_delete_item(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Map a non-2xx response to the matching `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.trim().is_empty());

    Err(match (response.status, message) {
        (404, message) => ApiError::NotFound {
            message: message.unwrap_or_else(|| "resource not found".to_string()),
        },
        (status, Some(message)) => ApiError::Rejected { status, message },
        (status, None) => ApiError::HttpError {
            status,
            body: response.body.clone(),
        },
    })
}
