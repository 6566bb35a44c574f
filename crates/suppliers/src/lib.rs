//! Suppliers ("fournisseurs") and their purchase/payment transactions.
//!
//! Plain data models plus the balance aggregation used whenever a supplier's
//! account is displayed (no IO, no caching).

pub mod stats;
pub mod supplier;
pub mod transaction;

pub use stats::{BalanceLine, SupplierStats, chronological, compute_supplier_stats, running_balance};
pub use supplier::{
    EmbeddedTransaction, NewSupplier, Supplier, SupplierPatch, SupplierSummary, ensure_unique_code,
};
pub use transaction::{NewTransaction, Transaction, TransactionPatch};
