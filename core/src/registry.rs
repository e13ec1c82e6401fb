//! Identity cache that keeps one shared `Image` per image id.
//!
//! # Design
//! The registry is an explicit object handed to the converter, not ambient
//! global state. Lookup, construction and insertion of an image happen inside
//! one critical section, so concurrent conversions of the same id always
//! agree on a single `Arc<Image>`. The first payload seen for an id wins:
//! later payloads for that id are not read at all. There is no eviction;
//! `clear` is the only way to drop entries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, trace};

use crate::convert::image_id;
use crate::error::ApiError;
use crate::types::{FieldPolicy, Image};

/// Maps image ids to the canonical shared instance for that id.
#[derive(Debug, Default)]
pub struct ImageRegistry {
    images: Mutex<HashMap<String, Arc<Image>>>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert one search result into the registry's instance for its id.
    ///
    /// On a hit the cached image is returned without reading any field other
    /// than `id`. On a miss the image is built, inserted and returned. A
    /// failed conversion leaves the registry untouched.
    pub fn convert(&self, value: &Value, policy: FieldPolicy) -> Result<Arc<Image>, ApiError> {
        let id = image_id(value)?;

        let mut images = self.lock();
        if let Some(image) = images.get(&id) {
            trace!(%id, "image registry hit");
            return Ok(Arc::clone(image));
        }

        let image = Arc::new(Image::from_json_with_id(id.clone(), value, policy)?);
        debug!(%id, breeds = image.breeds.len(), "image registry insert");
        images.insert(id, Arc::clone(&image));
        Ok(image)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Image>> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every cached image. Images already handed out stay valid.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave a half-inserted entry, so
    // a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Image>>> {
        self.images.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
