//! Stateless HTTP request builder and response parser for the cat API.
//!
//! # Design
//! `CatClient` holds only the base URL, the API key and the breed field
//! policy. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the HTTP round-trip in between, so the client itself
//! stays deterministic and free of I/O. Image identity lives in the
//! `ImageRegistry` passed to `parse_*`, not in the client.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::query::SearchFilters;
use crate::registry::ImageRegistry;
use crate::types::{FieldPolicy, Image};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Synchronous, stateless client for the cat API.
#[derive(Debug, Clone)]
pub struct CatClient {
    base_url: String,
    api_key: String,
    field_policy: FieldPolicy,
}

impl CatClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            field_policy: FieldPolicy::default(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url, &config.api_key).with_field_policy(config.field_policy)
    }

    pub fn with_field_policy(mut self, field_policy: FieldPolicy) -> Self {
        self.field_policy = field_policy;
        self
    }

    pub fn field_policy(&self) -> FieldPolicy {
        self.field_policy
    }

    /// Build `GET /images/search`. Fails with `InvalidArgument` when a filter
    /// is outside its enumerated set.
    pub fn build_search_images(&self, filters: &SearchFilters) -> Result<HttpRequest, ApiError> {
        let query = filters.to_query()?;
        debug!(?query, "building image search request");
        Ok(HttpRequest {
            url: format!("{}/images/search", self.base_url),
            query,
            headers: vec![(API_KEY_HEADER.to_string(), self.api_key.clone())],
        })
    }

    /// Parse a search response into images, resolving each one through
    /// `registry` so repeated ids share one instance.
    pub fn parse_search_images(
        &self,
        response: HttpResponse,
        registry: &ImageRegistry,
    ) -> Result<Vec<Arc<Image>>, ApiError> {
        check_status(&response, 200)?;
        let document: Value =
            serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        let items = document
            .as_array()
            .ok_or_else(|| ApiError::DeserializationError("expected a JSON array of images".to_string()))?;

        items
            .iter()
            .map(|item| registry.convert(item, self.field_policy))
            .collect()
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 401 {
        return Err(ApiError::Unauthorized);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
