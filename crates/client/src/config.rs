//! Client configuration (environment-driven).

use gestion_core::{EntityId, Iri};

/// Environment variable overriding the API path prefix.
pub const API_PREFIX_ENV: &str = "GESTION_API_PREFIX";

const DEFAULT_API_PREFIX: &str = "/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Path prefix of reference-strings, normalized to `/segment` (or empty).
    api_prefix: String,
}

impl ClientConfig {
    pub fn new(api_prefix: impl AsRef<str>) -> Self {
        let trimmed = api_prefix.as_ref().trim().trim_matches('/');
        let api_prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        Self { api_prefix }
    }

    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        match std::env::var(API_PREFIX_ENV) {
            Ok(prefix) => {
                tracing::info!(api_prefix = %prefix, "using API prefix from environment");
                Self::new(prefix)
            }
            Err(_) => Self::default(),
        }
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// Reference-string for an entity of `collection`, e.g. `/api/stock_items/42`.
    pub fn iri_for(&self, collection: &str, id: &EntityId) -> Iri {
        Iri::for_entity(&self.api_prefix, collection, id)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_PREFIX)
    }
}
