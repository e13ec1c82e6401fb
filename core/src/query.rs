//! Search filters and their validation into query parameters.
//!
//! # Design
//! Filters keep `order` and `mime_type` as caller-supplied strings so values
//! coming from configuration files or user input can be checked in one
//! place. [`SearchFilters::to_query`] rejects anything outside the
//! enumerated sets with `ApiError::InvalidArgument` before a request exists.
//! Typed callers use [`Order`] and [`MimeType`] through the `with_*` setters,
//! which store the same names the parser accepts. The API's own spellings
//! (`rand`, `desc`, `jpg`, ...) appear only in the rendered query.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApiError;

/// Sort order of search results. Pagination only has meaning for the
/// non-random orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Random,
    Descending,
    Ascending,
}

impl Order {
    /// Name accepted by [`FromStr`] and stored by [`SearchFilters::with_order`].
    pub fn name(self) -> &'static str {
        match self {
            Order::Random => "random",
            Order::Descending => "descending",
            Order::Ascending => "ascending",
        }
    }

    /// Value sent in the `order` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Order::Random => "rand",
            Order::Descending => "desc",
            Order::Ascending => "asc",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Order {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Order::Random),
            "descending" => Ok(Order::Descending),
            "ascending" => Ok(Order::Ascending),
            _ => Err(ApiError::InvalidArgument {
                name: "order",
                value: s.to_string(),
            }),
        }
    }
}

/// Image file type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeType {
    Jpeg,
    Png,
    Gif,
}

impl MimeType {
    /// Name accepted by [`FromStr`] and stored by [`SearchFilters::with_mime_type`].
    pub fn name(self) -> &'static str {
        match self {
            MimeType::Jpeg => "jpeg",
            MimeType::Png => "png",
            MimeType::Gif => "gif",
        }
    }

    /// Value sent in the `mime_types` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            MimeType::Jpeg => "jpg",
            MimeType::Png => "png",
            MimeType::Gif => "gif",
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MimeType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jpeg" => Ok(MimeType::Jpeg),
            "png" => Ok(MimeType::Png),
            "gif" => Ok(MimeType::Gif),
            _ => Err(ApiError::InvalidArgument {
                name: "mime_type",
                value: s.to_string(),
            }),
        }
    }
}

/// Filters for `GET /images/search`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    /// One of `random`, `descending`, `ascending`.
    pub order: Option<String>,
    pub breed_name: Option<String>,
    pub category_ids: Vec<u32>,
    /// One of `jpeg`, `png`, `gif`. `""` or `"any"` means unset.
    pub mime_type: Option<String>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order.name().to_string());
        self
    }

    pub fn with_breed_name(mut self, name: impl Into<String>) -> Self {
        self.breed_name = Some(name.into());
        self
    }

    pub fn with_category_ids(mut self, ids: impl IntoIterator<Item = u32>) -> Self {
        self.category_ids = ids.into_iter().collect();
        self
    }

    pub fn with_mime_type(mut self, mime_type: MimeType) -> Self {
        self.mime_type = Some(mime_type.name().to_string());
        self
    }

    /// Validated sort order, `None` when unset.
    pub fn parsed_order(&self) -> Result<Option<Order>, ApiError> {
        self.order.as_deref().map(str::parse::<Order>).transpose()
    }

    /// Validated mime type, `None` when unset.
    pub fn parsed_mime_type(&self) -> Result<Option<MimeType>, ApiError> {
        match self.mime_type.as_deref() {
            None | Some("") | Some("any") => Ok(None),
            Some(s) => s.parse().map(Some),
        }
    }

    /// Validate the filters and render them as query pairs in a fixed order.
    pub fn to_query(&self) -> Result<Vec<(String, String)>, ApiError> {
        let order = self.parsed_order()?;
        let mime_type = self.parsed_mime_type()?;

        if self.page.is_some() && matches!(order, None | Some(Order::Random)) {
            warn!(page = ?self.page, "page is ignored by the API unless order is ascending or descending");
        }

        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(order) = order {
            query.push(("order".to_string(), order.as_str().to_string()));
        }
        if let Some(name) = &self.breed_name {
            query.push(("breeds".to_string(), name.clone()));
        }
        if !self.category_ids.is_empty() {
            let ids: Vec<String> = self.category_ids.iter().map(u32::to_string).collect();
            query.push(("category_ids".to_string(), ids.join(",")));
        }
        if let Some(mime_type) = mime_type {
            query.push(("mime_types".to_string(), mime_type.as_str().to_string()));
        }
        Ok(query)
    }
}
