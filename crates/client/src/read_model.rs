//! The local read model mirrored from the API.

use std::sync::Arc;

use gestion_core::{Entity, EntityId, Resource};
use gestion_inventory::{ItemType, StockItem, StockMovement};
use gestion_suppliers::{
    BalanceLine, EmbeddedTransaction, Supplier, SupplierStats, Transaction, compute_supplier_stats,
    running_balance,
};

use crate::repository::{Repositories, Repository};

/// The five collections held by the store. Pages derive views from a
/// snapshot; they never keep their own copies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadModel {
    pub suppliers: Vec<Supplier>,
    pub transactions: Vec<Transaction>,
    pub item_types: Vec<ItemType>,
    pub stock_items: Vec<StockItem>,
    pub stock_movements: Vec<StockMovement>,
}

impl ReadModel {
    pub fn supplier(&self, id: &EntityId) -> Option<&Supplier> {
        find(&self.suppliers, id)
    }

    pub fn stock_item(&self, id: &EntityId) -> Option<&StockItem> {
        find(&self.stock_items, id)
    }

    pub fn stock_movement(&self, id: &EntityId) -> Option<&StockMovement> {
        find(&self.stock_movements, id)
    }

    /// Balance of a supplier, recomputed from its embedded transactions.
    pub fn supplier_stats(&self, id: &EntityId) -> Option<SupplierStats> {
        self.supplier(id).map(Supplier::stats)
    }

    pub fn supplier_statement(&self, id: &EntityId) -> Option<Vec<BalanceLine>> {
        self.supplier(id).map(|s| running_balance(&s.transactions))
    }

    /// Standalone transactions whose supplier resolves to `id`.
    pub fn transactions_for_supplier(&self, id: &EntityId) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|tx| tx.belongs_to(id))
            .collect()
    }

    /// Balance of a supplier computed from the standalone transaction
    /// collection instead of the supplier's embedded lines.
    pub fn transaction_stats(&self, id: &EntityId) -> SupplierStats {
        let lines: Vec<EmbeddedTransaction> = self
            .transactions_for_supplier(id)
            .into_iter()
            .map(Transaction::to_embedded)
            .collect();
        compute_supplier_stats(&lines)
    }

    /// Movements recorded against a stock item.
    pub fn movements_for_item(&self, id: &EntityId) -> Vec<&StockMovement> {
        self.stock_movements
            .iter()
            .filter(|m| m.stock_item.points_to(id))
            .collect()
    }

    /// Display name of an item's type: the embedded name when present,
    /// otherwise looked up in the item-type collection.
    pub fn item_type_name<'a>(&'a self, item: &'a StockItem) -> Option<&'a str> {
        if let Some(embedded) = item.item_type.as_ref().and_then(|t| t.embedded()) {
            if !embedded.name.is_empty() {
                return Some(embedded.name.as_str());
            }
        }
        let type_id = item.type_id()?;
        find(&self.item_types, &type_id).map(|t| t.name.as_str())
    }
}

fn find<'a, T: Entity<Id = EntityId>>(items: &'a [T], id: &EntityId) -> Option<&'a T> {
    items.iter().find(|e| e.id() == id)
}

/// Replace the entity with the same id, or append it.
pub(crate) fn upsert<T: Entity<Id = EntityId>>(items: &mut Vec<T>, entity: T) {
    match items.iter_mut().find(|e| e.id() == entity.id()) {
        Some(slot) => *slot = entity,
        None => items.push(entity),
    }
}

pub(crate) fn remove<T: Entity<Id = EntityId>>(items: &mut Vec<T>, id: &EntityId) -> Option<T> {
    let index = items.iter().position(|e| e.id() == id)?;
    Some(items.remove(index))
}

/// A resource the store mirrors: where it lives in the read model and which
/// repository serves it.
pub trait Cached: Resource {
    fn collection(model: &ReadModel) -> &Vec<Self>;
    fn collection_mut(model: &mut ReadModel) -> &mut Vec<Self>;
    fn repository(repos: &Repositories) -> &Arc<dyn Repository<Self>>;
}

macro_rules! impl_cached {
    ($t:ty, $field:ident) => {
        impl Cached for $t {
            fn collection(model: &ReadModel) -> &Vec<Self> {
                &model.$field
            }

            fn collection_mut(model: &mut ReadModel) -> &mut Vec<Self> {
                &mut model.$field
            }

            fn repository(repos: &Repositories) -> &Arc<dyn Repository<Self>> {
                &repos.$field
            }
        }
    };
}

impl_cached!(Supplier, suppliers);
impl_cached!(Transaction, transactions);
impl_cached!(ItemType, item_types);
impl_cached!(StockItem, stock_items);
impl_cached!(StockMovement, stock_movements);
