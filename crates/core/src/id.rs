//! Identifiers and reference-strings used across the domain.

use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

/// Identity of a remote entity.
///
/// Identities are compared as strings: the API may hand out numeric ids, but a
/// `42` and a `"42"` denote the same entity in the read model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id carries no usable identity (empty or whitespace only).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for EntityId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("EntityId: empty"));
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Signed(n) => Self(n.to_string()),
        })
    }
}

/// Path-style reference to an entity, e.g. `/api/stock_items/42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Build `/<prefix>/<collection>/<id>`; an empty prefix yields `/<collection>/<id>`.
    pub fn for_entity(prefix: &str, collection: &str, id: &EntityId) -> Self {
        let prefix = prefix.trim_matches('/');
        if prefix.is_empty() {
            Self(format!("/{collection}/{id}"))
        } else {
            Self(format!("/{prefix}/{collection}/{id}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment, or `None` when it is empty (`/api/stock_items/`).
    pub fn last_segment(&self) -> Option<&str> {
        self.0
            .rsplit('/')
            .next()
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
    }

    pub fn entity_id(&self) -> Option<EntityId> {
        self.last_segment().map(EntityId::from)
    }
}

impl core::fmt::Display for Iri {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
