//! Blocking facade that runs the build / execute / parse cycle.
//!
//! `CatApi` pairs a `CatClient` with a `Transport` and a shared
//! `ImageRegistry`. Hosts with their own async I/O skip this type and call
//! the client's `build_*` / `parse_*` methods around their own round-trip.

use std::sync::Arc;

use tracing::debug;

use crate::client::CatClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::Transport;
use crate::query::{MimeType, Order, SearchFilters};
use crate::registry::ImageRegistry;
use crate::types::Image;

pub struct CatApi<T> {
    client: CatClient,
    transport: T,
    registry: Arc<ImageRegistry>,
}

impl<T: Transport> CatApi<T> {
    /// Build a facade with its own empty registry.
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        Self::with_registry(config, transport, Arc::new(ImageRegistry::new()))
    }

    /// Build a facade that resolves images through an existing registry.
    pub fn with_registry(config: &ClientConfig, transport: T, registry: Arc<ImageRegistry>) -> Self {
        Self {
            client: CatClient::from_config(config),
            transport,
            registry,
        }
    }

    pub fn client(&self) -> &CatClient {
        &self.client
    }

    pub fn registry(&self) -> &Arc<ImageRegistry> {
        &self.registry
    }

    /// Search images. Filters are validated before the transport is called.
    pub fn search_images(&self, filters: &SearchFilters) -> Result<Vec<Arc<Image>>, ApiError> {
        let request = self.client.build_search_images(filters)?;
        let response = self.transport.execute(&request)?;
        debug!(status = response.status, "image search response");
        self.client.parse_search_images(response, &self.registry)
    }

    /// Page through images in a given order. `None` leaves the order to the
    /// API, which picks random.
    pub fn browse_images(
        &self,
        limit: Option<u32>,
        page: Option<u32>,
        order: Option<Order>,
    ) -> Result<Vec<Arc<Image>>, ApiError> {
        let filters = SearchFilters {
            limit,
            page,
            order: order.map(|o| o.name().to_string()),
            ..SearchFilters::default()
        };
        self.search_images(&filters)
    }

    pub fn images_by_breed(&self, name: &str) -> Result<Vec<Arc<Image>>, ApiError> {
        self.search_images(&SearchFilters::new().with_breed_name(name))
    }

    pub fn images_by_category(&self, category_ids: &[u32]) -> Result<Vec<Arc<Image>>, ApiError> {
        self.search_images(&SearchFilters::new().with_category_ids(category_ids.iter().copied()))
    }

    pub fn images_by_mime_type(&self, mime_type: MimeType) -> Result<Vec<Arc<Image>>, ApiError> {
        self.search_images(&SearchFilters::new().with_mime_type(mime_type))
    }
}
