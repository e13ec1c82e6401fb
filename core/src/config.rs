//! Client configuration.
//!
//! Built in code with the `with_*` setters, deserialized from a config file,
//! or read from the environment with [`ClientConfig::from_env`].

use serde::Deserialize;

use crate::error::ApiError;
use crate::types::FieldPolicy;

/// Public endpoint of the cat API.
pub const DEFAULT_BASE_URL: &str = "https://api.thecatapi.com/v1";

pub const ENV_API_KEY: &str = "CAT_API_KEY";
pub const ENV_BASE_URL: &str = "CAT_API_BASE_URL";
pub const ENV_FIELD_POLICY: &str = "CAT_API_FIELD_POLICY";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_key: String,
    #[serde(default)]
    pub field_policy: FieldPolicy,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            api_key: api_key.into(),
            field_policy: FieldPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_field_policy(mut self, field_policy: FieldPolicy) -> Self {
        self.field_policy = field_policy;
        self
    }

    /// Read `CAT_API_KEY` (required), `CAT_API_BASE_URL` and
    /// `CAT_API_FIELD_POLICY` from the process environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let api_key = lookup(ENV_API_KEY).ok_or_else(|| ApiError::Config(format!("{ENV_API_KEY} is not set")))?;
        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(policy) = lookup(ENV_FIELD_POLICY) {
            config.field_policy = policy
                .parse()
                .map_err(|_| ApiError::Config(format!("{ENV_FIELD_POLICY}={policy:?} is not strict or lenient")))?;
        }
        Ok(config)
    }
}
