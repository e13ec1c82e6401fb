//! Error types for the cat API client.
//!
//! # Design
//! Argument errors are raised while building a request, before anything
//! reaches a `Transport`. Conversion errors (`MissingField`, `InvalidField`,
//! `Format`) describe an upstream document that broke the API contract and
//! fail only the conversion that hit them. Everything else comes from the
//! HTTP round-trip and is surfaced unchanged.

use thiserror::Error;

/// Errors returned by the client, the converters and `Transport`
/// implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A caller-supplied filter value is outside its enumerated set.
    #[error("invalid value {value:?} for argument `{name}`")]
    InvalidArgument { name: &'static str, value: String },

    /// A required key is absent from an upstream JSON object.
    #[error("{entity} is missing required field `{field}`")]
    MissingField { entity: &'static str, field: String },

    /// A key is present but holds the wrong kind of JSON value.
    #[error("{entity} field `{field}` is not {expected}")]
    InvalidField {
        entity: &'static str,
        field: String,
        expected: &'static str,
    },

    /// A compound string field does not match its grammar.
    #[error("{value:?} is not {expected}")]
    Format { value: String, expected: &'static str },

    /// The server rejected the API key.
    #[error("unauthorized: missing or invalid API key")]
    Unauthorized,

    /// The server returned a non-success status other than 401.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be read as the expected JSON shape.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// Client configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub(crate) fn missing(entity: &'static str, field: impl Into<String>) -> Self {
        ApiError::MissingField {
            entity,
            field: field.into(),
        }
    }

    pub(crate) fn invalid(entity: &'static str, field: impl Into<String>, expected: &'static str) -> Self {
        ApiError::InvalidField {
            entity,
            field: field.into(),
            expected,
        }
    }
}
