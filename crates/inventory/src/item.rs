use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use gestion_core::date::calendar_date;
use gestion_core::{DomainError, DomainResult, Entity, EntityId, Reference, Resource};

use crate::item_type::ItemType;

/// Storage site of a stock item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Cotona,
    Maison,
    Avishay,
    Avenir,
}

/// Counting unit of a stock item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Piece,
    Unite,
}

/// Stock item read model.
///
/// `stock_restant` and the entry/exit counters are maintained by the server
/// from the item's movements. They are refetched, never computed locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub id: EntityId,
    pub reference: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<Reference<ItemType>>,
    pub location: Location,
    pub unit: Unit,
    pub stock_initial: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_restant: Option<i64>,
    #[serde(default)]
    pub nb_entrees: u32,
    #[serde(default)]
    pub nb_sorties: u32,
    #[serde(
        default,
        with = "calendar_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_inventory_date: Option<NaiveDate>,
}

impl StockItem {
    /// Current quantity: the server's remaining stock, or the initial stock
    /// when the server has not reported one yet.
    pub fn remaining(&self) -> i64 {
        self.stock_restant.unwrap_or(self.stock_initial)
    }

    /// Id of the item type, whether embedded or referenced.
    pub fn type_id(&self) -> Option<EntityId> {
        self.item_type.as_ref().and_then(Reference::resolve_id)
    }
}

impl Entity for StockItem {
    type Id = EntityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Shallow stock item shape found embedded in movement payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItemSummary {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_restant: Option<i64>,
}

impl StockItemSummary {
    pub fn with_id(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            reference: None,
            name: None,
            stock_restant: None,
        }
    }
}

impl Entity for StockItemSummary {
    type Id = EntityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStockItem {
    pub reference: String,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<Reference<ItemType>>,
    pub location: Location,
    pub unit: Unit,
    pub stock_initial: i64,
    #[serde(
        default,
        with = "calendar_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_inventory_date: Option<NaiveDate>,
}

impl NewStockItem {
    pub fn validate(&self) -> DomainResult<()> {
        if self.reference.trim().is_empty() {
            return Err(DomainError::validation("stock item reference cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("stock item name cannot be empty"));
        }
        if self.stock_initial < 0 {
            return Err(DomainError::validation("initial stock cannot be negative"));
        }
        Ok(())
    }
}

/// Partial update for a stock item. The initial stock is fixed at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<Reference<ItemType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    #[serde(
        default,
        with = "calendar_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_inventory_date: Option<NaiveDate>,
}

impl Resource for StockItem {
    type Draft = NewStockItem;
    type Patch = StockItemPatch;

    const COLLECTION: &'static str = "stock_items";

    fn from_draft(id: EntityId, draft: Self::Draft) -> Self {
        Self {
            id,
            reference: draft.reference,
            name: draft.name,
            item_type: draft.item_type,
            location: draft.location,
            unit: draft.unit,
            stock_initial: draft.stock_initial,
            stock_restant: None,
            nb_entrees: 0,
            nb_sorties: 0,
            last_inventory_date: draft.last_inventory_date,
        }
    }

    fn apply_patch(&mut self, patch: Self::Patch) {
        if let Some(reference) = patch.reference {
            self.reference = reference;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if patch.item_type.is_some() {
            self.item_type = patch.item_type;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if patch.last_inventory_date.is_some() {
            self.last_inventory_date = patch.last_inventory_date;
        }
    }
}
