use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use gestion_core::date::calendar_date;
use gestion_core::{DomainError, DomainResult, Entity, EntityId, Reference, Resource};

use crate::item::StockItemSummary;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Entrée: increases stock.
    Entree,
    /// Sortie: decreases stock.
    Sortie,
}

/// Stock movement read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: EntityId,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    pub stock_item: Reference<StockItemSummary>,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl StockMovement {
    pub fn stock_item_id(&self) -> Option<EntityId> {
        self.stock_item.resolve_id()
    }
}

impl Entity for StockMovement {
    type Id = EntityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn ensure_positive_quantity(quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation("quantity must be greater than zero"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStockMovement {
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    pub stock_item: Reference<StockItemSummary>,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewStockMovement {
    pub fn new(
        stock_item: impl Into<Reference<StockItemSummary>>,
        kind: MovementKind,
        quantity: i64,
        date: NaiveDate,
    ) -> Self {
        Self {
            date,
            stock_item: stock_item.into(),
            kind,
            quantity,
            notes: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        ensure_positive_quantity(self.quantity)?;
        if self.stock_item.resolve_id().is_none() {
            return Err(DomainError::validation("movement must reference a stock item"));
        }
        Ok(())
    }
}

/// Partial update for a stock movement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementPatch {
    #[serde(
        default,
        with = "calendar_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_item: Option<Reference<StockItemSummary>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MovementKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MovementPatch {
    /// Whether this edit can change a stock item's remaining quantity.
    ///
    /// Only the target item, the quantity and the direction count; dates and
    /// notes are metadata.
    pub fn affects_stock(&self) -> bool {
        self.stock_item.is_some() || self.quantity.is_some() || self.kind.is_some()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if let Some(quantity) = self.quantity {
            ensure_positive_quantity(quantity)?;
        }
        Ok(())
    }
}

impl Resource for StockMovement {
    type Draft = NewStockMovement;
    type Patch = MovementPatch;

    const COLLECTION: &'static str = "stock_movements";

    fn from_draft(id: EntityId, draft: Self::Draft) -> Self {
        Self {
            id,
            date: draft.date,
            stock_item: draft.stock_item,
            kind: draft.kind,
            quantity: draft.quantity,
            notes: draft.notes,
        }
    }

    fn apply_patch(&mut self, patch: Self::Patch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(stock_item) = patch.stock_item {
            self.stock_item = stock_item;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
    }
}
