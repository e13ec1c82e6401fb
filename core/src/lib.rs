//! Synchronous client core for the cat image API.
//!
//! # Overview
//! Builds `HttpRequest` values for `GET /images/search` and parses the
//! returned JSON into typed `Image`, `Breed` and `Category` records
//! (host-does-IO pattern). A `Transport` implementation, or the host itself,
//! performs the actual round-trip.
//!
//! # Design
//! - `CatClient` is stateless apart from its configuration.
//! - `ImageRegistry` is the one piece of shared mutable state: it hands out a
//!   single `Arc<Image>` per image id, first payload wins.
//! - Filters are validated before any request exists, so a bad `order` or
//!   `mime_type` never reaches the network.
//! - `CatApi` wires client, transport and registry together for blocking
//!   hosts.

pub mod api;
pub mod client;
pub mod config;
mod convert;
pub mod error;
pub mod http;
pub mod parse;
pub mod query;
pub mod registry;
pub mod types;

pub use api::CatApi;
pub use client::CatClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse, Transport};
pub use parse::{parse_interval, parse_list, Interval};
pub use query::{MimeType, Order, SearchFilters};
pub use registry::ImageRegistry;
pub use types::{Breed, Category, FieldPolicy, Image};
