//! Store error taxonomy and the user-facing messages attached to it.

use thiserror::Error;

use gestion_core::DomainError;

use crate::repository::RepositoryError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Every operation the store exposes; used for logs and user messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LoadAll,
    RefreshStock,
    CreateSupplier,
    UpdateSupplier,
    DeleteSupplier,
    CreateTransaction,
    UpdateTransaction,
    DeleteTransaction,
    CreateItemType,
    UpdateItemType,
    DeleteItemType,
    CreateStockItem,
    UpdateStockItem,
    DeleteStockItem,
    CreateStockMovement,
    UpdateStockMovement,
    DeleteStockMovement,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::LoadAll => "load_all",
            Operation::RefreshStock => "refresh_stock",
            Operation::CreateSupplier => "create_supplier",
            Operation::UpdateSupplier => "update_supplier",
            Operation::DeleteSupplier => "delete_supplier",
            Operation::CreateTransaction => "create_transaction",
            Operation::UpdateTransaction => "update_transaction",
            Operation::DeleteTransaction => "delete_transaction",
            Operation::CreateItemType => "create_item_type",
            Operation::UpdateItemType => "update_item_type",
            Operation::DeleteItemType => "delete_item_type",
            Operation::CreateStockItem => "create_stock_item",
            Operation::UpdateStockItem => "update_stock_item",
            Operation::DeleteStockItem => "delete_stock_item",
            Operation::CreateStockMovement => "create_stock_movement",
            Operation::UpdateStockMovement => "update_stock_movement",
            Operation::DeleteStockMovement => "delete_stock_movement",
        }
    }

    /// Message shown when the remote call of this operation fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::LoadAll => "Erreur lors du chargement des données",
            Operation::RefreshStock => "Erreur lors de l'actualisation du stock",
            Operation::CreateSupplier => "Erreur lors de l'ajout du fournisseur",
            Operation::UpdateSupplier => "Erreur lors de la modification du fournisseur",
            Operation::DeleteSupplier => "Erreur lors de la suppression du fournisseur",
            Operation::CreateTransaction => "Erreur lors de l'ajout de la transaction",
            Operation::UpdateTransaction => "Erreur lors de la modification de la transaction",
            Operation::DeleteTransaction => "Erreur lors de la suppression de la transaction",
            Operation::CreateItemType => "Erreur lors de l'ajout du type d'article",
            Operation::UpdateItemType => "Erreur lors de la modification du type d'article",
            Operation::DeleteItemType => "Erreur lors de la suppression du type d'article",
            Operation::CreateStockItem => "Erreur lors de l'ajout de l'article",
            Operation::UpdateStockItem => "Erreur lors de la modification de l'article",
            Operation::DeleteStockItem => "Erreur lors de la suppression de l'article",
            Operation::CreateStockMovement => "Erreur lors de l'ajout du mouvement de stock",
            Operation::UpdateStockMovement => "Erreur lors de la modification du mouvement de stock",
            Operation::DeleteStockMovement => "Erreur lors de la suppression du mouvement de stock",
        }
    }

    /// Message shown when the operation itself succeeded but the follow-up
    /// refresh of dependent data did not.
    pub fn reconciliation_message(&self) -> &'static str {
        match self {
            Operation::CreateTransaction
            | Operation::UpdateTransaction
            | Operation::DeleteTransaction => {
                "Opération enregistrée, mais le solde du fournisseur n'a pas pu être actualisé"
            }
            _ => "Opération enregistrée, mais le stock n'a pas pu être actualisé",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DUPLICATE_CODE_MESSAGE: &str = "Ce code fournisseur existe déjà";
pub const INVALID_INPUT_MESSAGE: &str = "Données invalides";

#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote call failed; the read model is unchanged.
    #[error("{operation} failed: {source}")]
    Remote {
        operation: Operation,
        source: RepositoryError,
    },

    /// Rejected locally before any remote call.
    #[error("{operation} rejected: {source}")]
    Invalid {
        operation: Operation,
        source: DomainError,
    },

    /// The primary mutation succeeded (and is reflected locally) but the
    /// follow-up refetch failed, so dependent data may be stale.
    #[error("{operation} applied but reconciliation failed: {source}")]
    Reconciliation {
        operation: Operation,
        source: RepositoryError,
    },
}

impl StoreError {
    pub(crate) fn remote(operation: Operation) -> impl FnOnce(RepositoryError) -> Self {
        move |source| Self::Remote { operation, source }
    }

    pub(crate) fn invalid(operation: Operation) -> impl FnOnce(DomainError) -> Self {
        move |source| Self::Invalid { operation, source }
    }

    pub(crate) fn reconciliation(operation: Operation) -> impl FnOnce(RepositoryError) -> Self {
        move |source| Self::Reconciliation { operation, source }
    }

    pub fn operation(&self) -> Operation {
        match self {
            StoreError::Remote { operation, .. }
            | StoreError::Invalid { operation, .. }
            | StoreError::Reconciliation { operation, .. } => *operation,
        }
    }

    /// Whether the primary mutation went through despite this error.
    pub fn primary_succeeded(&self) -> bool {
        matches!(self, StoreError::Reconciliation { .. })
    }

    /// Localized message for the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::Remote { operation, .. } => operation.failure_message(),
            StoreError::Invalid {
                source: DomainError::Conflict(_),
                ..
            } => DUPLICATE_CODE_MESSAGE,
            StoreError::Invalid { .. } => INVALID_INPUT_MESSAGE,
            StoreError::Reconciliation { operation, .. } => operation.reconciliation_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestion_core::EntityId;

    #[test]
    fn remote_failures_use_the_operation_message() {
        let err = StoreError::remote(Operation::DeleteSupplier)(RepositoryError::Transport(
            "connection reset".to_string(),
        ));
        assert_eq!(
            err.user_message(),
            "Erreur lors de la suppression du fournisseur"
        );
        assert!(!err.primary_succeeded());
        assert!(err.to_string().contains("delete_supplier"));
    }

    #[test]
    fn duplicate_code_has_its_own_message() {
        let err = StoreError::invalid(Operation::CreateSupplier)(DomainError::conflict(
            "supplier code F001 already exists",
        ));
        assert_eq!(err.user_message(), DUPLICATE_CODE_MESSAGE);

        let err = StoreError::invalid(Operation::CreateStockMovement)(DomainError::validation(
            "quantity must be greater than zero",
        ));
        assert_eq!(err.user_message(), INVALID_INPUT_MESSAGE);
    }

    #[test]
    fn reconciliation_failures_are_distinct() {
        let err = StoreError::reconciliation(Operation::DeleteStockMovement)(
            RepositoryError::NotFound {
                collection: "stock_items",
                id: EntityId::from("7"),
            },
        );
        assert!(err.primary_succeeded());
        assert_eq!(err.operation(), Operation::DeleteStockMovement);
        assert!(err.user_message().contains("stock"));

        let err = StoreError::reconciliation(Operation::CreateTransaction)(
            RepositoryError::Transport("timeout".to_string()),
        );
        assert!(err.user_message().contains("fournisseur"));
    }
}
