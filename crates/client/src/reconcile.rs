//! Stock consistency reconciliation policy.
//!
//! Remaining stock is computed by the server from all movements of an item,
//! so after a movement edit the client refetches instead of doing arithmetic.
//! This module only decides *what* to refresh; [`crate::AppStore`] executes
//! the plan. Two strategies exist:
//!
//! - **targeted refetch** of the one affected entity (movement update/delete,
//!   and the supplier behind a transaction edit);
//! - **full resync** of stock items and movements (movement creation), which
//!   is coarser and more expensive but also picks up items created in the
//!   same user action.

use gestion_core::{Entity, EntityId, Reference};
use gestion_inventory::{MovementPatch, StockMovement};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcilePlan {
    /// Nothing to refresh.
    Skip(SkipReason),
    /// Refetch one entity by id and replace it locally.
    Refetch(EntityId),
    /// Reload the stock-item and stock-movement collections.
    FullResync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The edit only touched metadata (date, notes).
    MetadataOnly,
    /// The deleted entity was not in the local read model.
    NotCached,
    /// The reference did not yield a usable id.
    Unresolvable,
}

/// Plan a targeted refetch of whatever `reference` points to.
pub fn refetch<T: Entity<Id = EntityId>>(reference: &Reference<T>) -> ReconcilePlan {
    reference
        .resolve_id()
        .map_or(ReconcilePlan::Skip(SkipReason::Unresolvable), ReconcilePlan::Refetch)
}

pub fn after_create() -> ReconcilePlan {
    ReconcilePlan::FullResync
}

/// The target item is taken from the server's post-update movement, not from
/// the caller's patch.
pub fn after_update(patch: &MovementPatch, updated: &StockMovement) -> ReconcilePlan {
    if !patch.affects_stock() {
        return ReconcilePlan::Skip(SkipReason::MetadataOnly);
    }
    refetch(&updated.stock_item)
}

/// `captured` is the parent reference read from the read model before the
/// delete call, since it cannot be fetched afterwards.
pub fn after_delete<T: Entity<Id = EntityId>>(captured: Option<&Reference<T>>) -> ReconcilePlan {
    match captured {
        Some(reference) => refetch(reference),
        None => ReconcilePlan::Skip(SkipReason::NotCached),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gestion_core::Iri;
    use gestion_inventory::{MovementKind, StockItemSummary};

    fn movement(stock_item: Reference<StockItemSummary>) -> StockMovement {
        StockMovement {
            id: EntityId::from("1"),
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            stock_item,
            kind: MovementKind::Entree,
            quantity: 3,
            notes: None,
        }
    }

    #[test]
    fn update_uses_the_server_returned_item() {
        let patch = MovementPatch {
            stock_item: Some(Reference::Iri(Iri::from("/api/stock_items/1"))),
            ..MovementPatch::default()
        };
        let updated = movement(Reference::Iri(Iri::from("/api/stock_items/42")));

        assert_eq!(
            after_update(&patch, &updated),
            ReconcilePlan::Refetch(EntityId::from("42"))
        );
    }

    #[test]
    fn notes_only_update_is_skipped() {
        let patch = MovementPatch {
            notes: Some("recompté".to_string()),
            ..MovementPatch::default()
        };
        let updated = movement(Reference::Embedded(StockItemSummary::with_id("42")));

        assert_eq!(
            after_update(&patch, &updated),
            ReconcilePlan::Skip(SkipReason::MetadataOnly)
        );
    }

    #[test]
    fn delete_resolves_the_captured_reference() {
        let captured = Reference::Embedded(StockItemSummary::with_id("7"));
        assert_eq!(
            after_delete(Some(&captured)),
            ReconcilePlan::Refetch(EntityId::from("7"))
        );
        assert_eq!(
            after_delete::<StockItemSummary>(None),
            ReconcilePlan::Skip(SkipReason::NotCached)
        );
    }

    #[test]
    fn unresolvable_references_are_skipped() {
        let trailing: Reference<StockItemSummary> =
            Reference::Iri(Iri::from("/api/stock_items/"));
        let blank = Reference::Embedded(StockItemSummary::with_id(""));

        assert_eq!(
            refetch(&trailing),
            ReconcilePlan::Skip(SkipReason::Unresolvable)
        );
        assert_eq!(
            after_delete(Some(&blank)),
            ReconcilePlan::Skip(SkipReason::Unresolvable)
        );
    }

    #[test]
    fn creation_always_resyncs() {
        assert_eq!(after_create(), ReconcilePlan::FullResync);
    }
}
