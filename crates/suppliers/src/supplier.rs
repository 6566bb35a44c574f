use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gestion_core::date::calendar_date;
use gestion_core::{DomainError, DomainResult, Entity, EntityId, Resource};

use crate::stats::{SupplierStats, compute_supplier_stats};

/// A purchase/payment line stored on the supplier record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedTransaction {
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(rename = "achat", default)]
    pub purchase: Decimal,
    #[serde(rename = "virement", default)]
    pub payment: Decimal,
    /// Remainder as stored by the server at write time. May be stale; balances
    /// are always recomputed from `purchase` and `payment`.
    #[serde(rename = "reste", default)]
    pub remainder: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EmbeddedTransaction {
    pub fn new(date: NaiveDate, purchase: Decimal, payment: Decimal) -> Self {
        Self {
            date,
            purchase,
            payment,
            remainder: purchase - payment,
            description: None,
        }
    }
}

/// Supplier ("fournisseur") read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: EntityId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub transactions: Vec<EmbeddedTransaction>,
}

impl Supplier {
    /// Balance figures for this supplier, recomputed on every call.
    pub fn stats(&self) -> SupplierStats {
        compute_supplier_stats(&self.transactions)
    }
}

impl Entity for Supplier {
    type Id = EntityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Shallow supplier shape found embedded in transaction payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierSummary {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Entity for SupplierSummary {
    type Id = EntityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Create payload for a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub transactions: Vec<EmbeddedTransaction>,
}

impl NewSupplier {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            transactions: Vec::new(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.code.trim().is_empty() {
            return Err(DomainError::validation("supplier code cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        Ok(())
    }
}

/// Partial update for a supplier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<EmbeddedTransaction>>,
}

impl Resource for Supplier {
    type Draft = NewSupplier;
    type Patch = SupplierPatch;

    const COLLECTION: &'static str = "fournisseurs";

    fn from_draft(id: EntityId, draft: Self::Draft) -> Self {
        Self {
            id,
            code: draft.code,
            name: draft.name,
            transactions: draft.transactions,
        }
    }

    fn apply_patch(&mut self, patch: Self::Patch) {
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(transactions) = patch.transactions {
            self.transactions = transactions;
        }
    }
}

/// Reject `code` if an existing supplier already uses it.
///
/// Surrounding whitespace is ignored; the comparison is otherwise exact.
pub fn ensure_unique_code(existing: &[Supplier], code: &str) -> DomainResult<()> {
    let code = code.trim();
    if existing.iter().any(|s| s.code.trim() == code) {
        return Err(DomainError::conflict(format!(
            "supplier code {code} already exists"
        )));
    }
    Ok(())
}
