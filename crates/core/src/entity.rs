//! Entity trait: identity + continuity across state changes.

use serde::Serialize;

use crate::id::EntityId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// A remotely managed entity exposed through a uniform CRUD collection.
///
/// `Draft` is the create payload (the server assigns the id) and `Patch` is a
/// partial update where absent fields are left untouched.
pub trait Resource: Entity<Id = EntityId> + Clone + Send + Sync + 'static {
    type Draft: Serialize + Clone + Send + Sync + 'static;
    type Patch: Serialize + Clone + Send + Sync + 'static;

    /// Collection segment used in reference-strings and log fields (e.g. `stock_items`).
    const COLLECTION: &'static str;

    /// Materialize an entity from a create payload and a freshly assigned id.
    fn from_draft(id: EntityId, draft: Self::Draft) -> Self;

    /// Merge the fields present in `patch` into `self`.
    fn apply_patch(&mut self, patch: Self::Patch);
}
