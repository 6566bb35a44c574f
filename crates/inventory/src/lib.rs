//! Stock items, their type taxonomy and stock movements (entries/exits).
//!
//! Remaining quantities are computed by the server from the movements; this
//! crate only models them and classifies which edits can change them.

pub mod item;
pub mod item_type;
pub mod movement;

pub use item::{Location, NewStockItem, StockItem, StockItemPatch, StockItemSummary, Unit};
pub use item_type::{ItemType, ItemTypePatch, NewItemType};
pub use movement::{MovementKind, MovementPatch, NewStockMovement, StockMovement};
