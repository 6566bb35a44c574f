use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gestion_core::date::calendar_date;
use gestion_core::{DomainError, DomainResult, Entity, EntityId, Reference, Resource};

use crate::supplier::{EmbeddedTransaction, SupplierSummary};

/// Standalone transaction record linked to a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: EntityId,
    #[serde(rename = "fournisseur")]
    pub supplier: Reference<SupplierSummary>,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(rename = "achat", default)]
    pub purchase: Decimal,
    #[serde(rename = "virement", default)]
    pub payment: Decimal,
    #[serde(rename = "reste", default)]
    pub remainder: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Transaction {
    /// Whether this transaction belongs to `supplier_id` (string identity).
    pub fn belongs_to(&self, supplier_id: &EntityId) -> bool {
        self.supplier.points_to(supplier_id)
    }

    /// View as an embedded line so it can go through the same aggregation.
    pub fn to_embedded(&self) -> EmbeddedTransaction {
        EmbeddedTransaction {
            date: self.date,
            purchase: self.purchase,
            payment: self.payment,
            remainder: self.remainder,
            description: self.description.clone(),
        }
    }
}

impl Entity for Transaction {
    type Id = EntityId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Create payload for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(rename = "fournisseur")]
    pub supplier: Reference<SupplierSummary>,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(rename = "achat", default)]
    pub purchase: Decimal,
    #[serde(rename = "virement", default)]
    pub payment: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> DomainResult<()> {
        if self.supplier.resolve_id().is_none() {
            return Err(DomainError::validation("transaction must reference a supplier"));
        }
        if self.purchase < Decimal::ZERO || self.payment < Decimal::ZERO {
            return Err(DomainError::validation("amounts cannot be negative"));
        }
        Ok(())
    }
}

/// Partial update for a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPatch {
    #[serde(rename = "fournisseur", default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Reference<SupplierSummary>>,
    #[serde(
        default,
        with = "calendar_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(rename = "achat", default, skip_serializing_if = "Option::is_none")]
    pub purchase: Option<Decimal>,
    #[serde(rename = "virement", default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for Transaction {
    type Draft = NewTransaction;
    type Patch = TransactionPatch;

    const COLLECTION: &'static str = "transactions";

    fn from_draft(id: EntityId, draft: Self::Draft) -> Self {
        Self {
            id,
            supplier: draft.supplier,
            date: draft.date,
            purchase: draft.purchase,
            payment: draft.payment,
            remainder: draft.purchase - draft.payment,
            description: draft.description,
        }
    }

    fn apply_patch(&mut self, patch: Self::Patch) {
        if let Some(supplier) = patch.supplier {
            self.supplier = supplier;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(purchase) = patch.purchase {
            self.purchase = purchase;
        }
        if let Some(payment) = patch.payment {
            self.payment = payment;
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        self.remainder = self.purchase - self.payment;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestion_core::Iri;

    #[test]
    fn belongs_to_matches_iri_and_embedded_supplier() {
        let by_iri: Transaction = serde_json::from_str(
            r#"{"id":1,"fournisseur":"/api/fournisseurs/12","date":"2024-02-01","achat":10,"virement":0}"#,
        )
        .unwrap();
        let embedded: Transaction = serde_json::from_str(
            r#"{"id":2,"fournisseur":{"id":12,"code":"F012"},"date":"2024-02-02","achat":0,"virement":5}"#,
        )
        .unwrap();

        let supplier_id = EntityId::from("12");
        assert!(by_iri.belongs_to(&supplier_id));
        assert!(embedded.belongs_to(&supplier_id));
        assert!(!embedded.belongs_to(&EntityId::from("1")));
    }

    #[test]
    fn draft_without_supplier_is_invalid() {
        let draft = NewTransaction {
            supplier: Reference::Iri(Iri::from("/api/fournisseurs/")),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            purchase: Decimal::from(10),
            payment: Decimal::ZERO,
            description: None,
        };
        assert!(matches!(draft.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn patch_recomputes_stored_remainder() {
        let mut tx = Transaction::from_draft(
            EntityId::from("1"),
            NewTransaction {
                supplier: Reference::Iri(Iri::from("/api/fournisseurs/1")),
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                purchase: Decimal::from(100),
                payment: Decimal::from(30),
                description: None,
            },
        );
        assert_eq!(tx.remainder, Decimal::from(70));

        tx.apply_patch(TransactionPatch {
            payment: Some(Decimal::from(100)),
            ..TransactionPatch::default()
        });
        assert_eq!(tx.remainder, Decimal::ZERO);
    }
}
