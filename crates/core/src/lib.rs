//! `gestion-core`: shared building blocks for the business-management client.
//!
//! This crate contains **pure** primitives (no IO): identifiers, entity
//! references, the entity/resource traits and the domain error model.

pub mod date;
pub mod entity;
pub mod error;
pub mod id;
pub mod reference;

pub use date::parse_calendar_date;
pub use entity::{Entity, Resource};
pub use error::{DomainError, DomainResult};
pub use id::{EntityId, Iri};
pub use reference::Reference;
