//! Polymorphic entity references.
//!
//! Depending on fetch depth the API either embeds a related entity or only
//! sends its reference-string. Both shapes deserialize into [`Reference`], and
//! turning either into a usable id is a single match in [`Reference::resolve_id`].

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::{EntityId, Iri};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    /// Unresolved: only the reference-string is known.
    Iri(Iri),
    /// Resolved: the related entity was embedded in the payload.
    Embedded(T),
}

impl<T> Reference<T>
where
    T: Entity<Id = EntityId>,
{
    /// Resolve the referenced entity's id.
    ///
    /// Embedded entities contribute their `id`; reference-strings contribute
    /// their final path segment. `None` when neither yields a non-empty id.
    pub fn resolve_id(&self) -> Option<EntityId> {
        match self {
            Reference::Embedded(entity) => {
                Some(entity.id().clone()).filter(|id| !id.is_empty())
            }
            Reference::Iri(iri) => iri.entity_id(),
        }
    }

    /// Whether this reference resolves to `id` (string identity).
    pub fn points_to(&self, id: &EntityId) -> bool {
        self.resolve_id().is_some_and(|resolved| &resolved == id)
    }

    pub fn embedded(&self) -> Option<&T> {
        match self {
            Reference::Embedded(entity) => Some(entity),
            Reference::Iri(_) => None,
        }
    }
}

impl<T> From<Iri> for Reference<T> {
    fn from(value: Iri) -> Self {
        Reference::Iri(value)
    }
}
