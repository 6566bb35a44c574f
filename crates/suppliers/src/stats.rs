//! Supplier balance aggregation.
//!
//! Totals are always recomputed from the raw purchase/payment amounts; the
//! per-line `reste` stored by the server is never summed since it may be stale.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::supplier::EmbeddedTransaction;

/// Aggregate balance of a supplier account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierStats {
    pub total_purchases: Decimal,
    pub total_payments: Decimal,
    /// `total_purchases - total_payments`.
    pub total_remainder: Decimal,
}

/// One row of a chronological account statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLine {
    pub date: NaiveDate,
    pub purchase: Decimal,
    pub payment: Decimal,
    /// Cumulative balance after this line.
    pub balance: Decimal,
}

/// Transactions ordered by date, ascending.
///
/// The sort is stable: same-day lines keep their original relative order.
/// The input slice is left untouched.
pub fn chronological(transactions: &[EmbeddedTransaction]) -> Vec<&EmbeddedTransaction> {
    let mut ordered: Vec<&EmbeddedTransaction> = transactions.iter().collect();
    ordered.sort_by_key(|tx| tx.date);
    ordered
}

/// Total purchases, total payments and outstanding balance.
///
/// An empty slice yields all zeros.
pub fn compute_supplier_stats(transactions: &[EmbeddedTransaction]) -> SupplierStats {
    let (total_purchases, total_payments) = chronological(transactions).into_iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(purchases, payments), tx| (purchases + tx.purchase, payments + tx.payment),
    );

    SupplierStats {
        total_purchases,
        total_payments,
        total_remainder: total_purchases - total_payments,
    }
}

/// Running balance in chronological order.
pub fn running_balance(transactions: &[EmbeddedTransaction]) -> Vec<BalanceLine> {
    let mut balance = Decimal::ZERO;
    chronological(transactions)
        .into_iter()
        .map(|tx| {
            balance += tx.purchase - tx.payment;
            BalanceLine {
                date: tx.date,
                purchase: tx.purchase,
                payment: tx.payment,
                balance,
            }
        })
        .collect()
}
