//! The shared state container.
//!
//! `AppStore` proxies every mutation to the matching [`Repository`], applies
//! the server's answer to the [`ReadModel`], and runs the reconciliation plan
//! that keeps server-derived values (remaining stock, supplier balances)
//! current. Every public operation is tracked by the [`StatusTracker`].

use std::future::Future;

use tokio::sync::{RwLock, watch};
use tracing::{debug, error, info};

use gestion_core::{Entity, EntityId, Iri, Resource};
use gestion_inventory::{
    ItemType, ItemTypePatch, MovementPatch, NewItemType, NewStockItem, NewStockMovement, StockItem,
    StockItemPatch, StockMovement,
};
use gestion_suppliers::{
    BalanceLine, NewSupplier, NewTransaction, Supplier, SupplierPatch, SupplierStats, Transaction,
    TransactionPatch, ensure_unique_code,
};

use crate::config::ClientConfig;
use crate::error::{Operation, StoreError, StoreResult};
use crate::read_model::{Cached, ReadModel, remove, upsert};
use crate::reconcile::{self, ReconcilePlan};
use crate::repository::{Repositories, RepositoryResult};
use crate::status::{StatusTracker, StoreStatus};

pub struct AppStore {
    repos: Repositories,
    config: ClientConfig,
    model: RwLock<ReadModel>,
    status: StatusTracker,
}

impl AppStore {
    pub fn new(repos: Repositories, config: ClientConfig) -> Self {
        Self {
            repos,
            config,
            model: RwLock::new(ReadModel::default()),
            status: StatusTracker::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn status(&self) -> StoreStatus {
        self.status.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreStatus> {
        self.status.subscribe()
    }

    pub fn clear_error(&self) {
        self.status.clear_error();
    }

    /// Reference string for an entity of `R`, for use in drafts and patches.
    pub fn iri_for<R: Resource>(&self, id: &EntityId) -> Iri {
        self.config.iri_for(R::COLLECTION, id)
    }

    // ---- reads ----

    pub async fn snapshot(&self) -> ReadModel {
        self.model.read().await.clone()
    }

    pub async fn suppliers(&self) -> Vec<Supplier> {
        self.model.read().await.suppliers.clone()
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.model.read().await.transactions.clone()
    }

    pub async fn item_types(&self) -> Vec<ItemType> {
        self.model.read().await.item_types.clone()
    }

    pub async fn stock_items(&self) -> Vec<StockItem> {
        self.model.read().await.stock_items.clone()
    }

    pub async fn stock_movements(&self) -> Vec<StockMovement> {
        self.model.read().await.stock_movements.clone()
    }

    pub async fn stock_item(&self, id: &EntityId) -> Option<StockItem> {
        self.model.read().await.stock_item(id).cloned()
    }

    /// Computed from the cached supplier on every call.
    pub async fn supplier_stats(&self, id: &EntityId) -> Option<SupplierStats> {
        self.model.read().await.supplier_stats(id)
    }

    pub async fn supplier_statement(&self, id: &EntityId) -> Option<Vec<BalanceLine>> {
        self.model.read().await.supplier_statement(id)
    }

    /// Balance of a supplier aggregated from the cached standalone transactions.
    pub async fn transaction_stats(&self, id: &EntityId) -> SupplierStats {
        self.model.read().await.transaction_stats(id)
    }

    pub async fn transactions_for_supplier(&self, id: &EntityId) -> Vec<Transaction> {
        self.model
            .read()
            .await
            .transactions_for_supplier(id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn item_type_name(&self, item: &StockItem) -> Option<String> {
        self.model
            .read()
            .await
            .item_type_name(item)
            .map(str::to_owned)
    }

    // ---- bulk ----

    /// Replace the whole read model with the server's collections.
    pub async fn load_all(&self) -> StoreResult<()> {
        let op = Operation::LoadAll;
        self.track(op, async {
            let suppliers = self
                .fetch_all::<Supplier>()
                .await
                .map_err(StoreError::remote(op))?;
            let transactions = self
                .fetch_all::<Transaction>()
                .await
                .map_err(StoreError::remote(op))?;
            let item_types = self
                .fetch_all::<ItemType>()
                .await
                .map_err(StoreError::remote(op))?;
            let stock_items = self
                .fetch_all::<StockItem>()
                .await
                .map_err(StoreError::remote(op))?;
            let stock_movements = self
                .fetch_all::<StockMovement>()
                .await
                .map_err(StoreError::remote(op))?;

            info!(
                suppliers = suppliers.len(),
                transactions = transactions.len(),
                item_types = item_types.len(),
                stock_items = stock_items.len(),
                stock_movements = stock_movements.len(),
                "read model loaded"
            );

            *self.model.write().await = ReadModel {
                suppliers,
                transactions,
                item_types,
                stock_items,
                stock_movements,
            };
            Ok(())
        })
        .await
    }

    /// Full resync of stock items and stock movements.
    ///
    /// Reloads both collections entirely; prefer the targeted refetch done by
    /// movement updates and deletes when a single item is affected.
    pub async fn refresh_stock_data(&self) -> StoreResult<()> {
        let op = Operation::RefreshStock;
        self.track(op, async {
            self.resync_stock().await.map_err(StoreError::remote(op))
        })
        .await
    }

    // ---- suppliers ----

    /// Fails with a conflict, without calling the API, when the code is
    /// already used by a cached supplier.
    pub async fn create_supplier(&self, draft: NewSupplier) -> StoreResult<Supplier> {
        let op = Operation::CreateSupplier;
        self.track(op, async {
            draft.validate().map_err(StoreError::invalid(op))?;
            {
                let model = self.model.read().await;
                ensure_unique_code(&model.suppliers, &draft.code)
                    .map_err(StoreError::invalid(op))?;
            }
            self.create_entity::<Supplier>(op, draft).await
        })
        .await
    }

    pub async fn update_supplier(
        &self,
        id: &EntityId,
        patch: SupplierPatch,
    ) -> StoreResult<Supplier> {
        let op = Operation::UpdateSupplier;
        self.track(op, self.update_entity::<Supplier>(op, id, patch))
            .await
    }

    pub async fn delete_supplier(&self, id: &EntityId) -> StoreResult<()> {
        let op = Operation::DeleteSupplier;
        self.track(op, self.delete_entity::<Supplier>(op, id)).await
    }

    // ---- transactions ----

    /// Creates a transaction, then refetches its supplier so the embedded
    /// transactions and balance follow the server.
    pub async fn create_transaction(&self, draft: NewTransaction) -> StoreResult<Transaction> {
        let op = Operation::CreateTransaction;
        self.track(op, async {
            draft.validate().map_err(StoreError::invalid(op))?;
            let created = self.create_entity::<Transaction>(op, draft).await?;
            let plan = reconcile::refetch(&created.supplier);
            self.reconcile::<Supplier>(op, plan).await?;
            Ok(created)
        })
        .await
    }

    pub async fn update_transaction(
        &self,
        id: &EntityId,
        patch: TransactionPatch,
    ) -> StoreResult<Transaction> {
        let op = Operation::UpdateTransaction;
        self.track(op, async {
            let updated = self.update_entity::<Transaction>(op, id, patch).await?;
            let plan = reconcile::refetch(&updated.supplier);
            self.reconcile::<Supplier>(op, plan).await?;
            Ok(updated)
        })
        .await
    }

    pub async fn delete_transaction(&self, id: &EntityId) -> StoreResult<()> {
        let op = Operation::DeleteTransaction;
        self.track(op, async {
            let captured = {
                let model = self.model.read().await;
                Transaction::collection(&model)
                    .iter()
                    .find(|tx| &tx.id == id)
                    .map(|tx| tx.supplier.clone())
            };
            self.delete_entity::<Transaction>(op, id).await?;
            let plan = reconcile::after_delete(captured.as_ref());
            self.reconcile::<Supplier>(op, plan).await
        })
        .await
    }

    // ---- item types ----

    pub async fn create_item_type(&self, draft: NewItemType) -> StoreResult<ItemType> {
        let op = Operation::CreateItemType;
        self.track(op, async {
            draft.validate().map_err(StoreError::invalid(op))?;
            self.create_entity::<ItemType>(op, draft).await
        })
        .await
    }

    pub async fn update_item_type(
        &self,
        id: &EntityId,
        patch: ItemTypePatch,
    ) -> StoreResult<ItemType> {
        let op = Operation::UpdateItemType;
        self.track(op, self.update_entity::<ItemType>(op, id, patch))
            .await
    }

    pub async fn delete_item_type(&self, id: &EntityId) -> StoreResult<()> {
        let op = Operation::DeleteItemType;
        self.track(op, self.delete_entity::<ItemType>(op, id)).await
    }

    // ---- stock items ----

    pub async fn create_stock_item(&self, draft: NewStockItem) -> StoreResult<StockItem> {
        let op = Operation::CreateStockItem;
        self.track(op, async {
            draft.validate().map_err(StoreError::invalid(op))?;
            self.create_entity::<StockItem>(op, draft).await
        })
        .await
    }

    pub async fn update_stock_item(
        &self,
        id: &EntityId,
        patch: StockItemPatch,
    ) -> StoreResult<StockItem> {
        let op = Operation::UpdateStockItem;
        self.track(op, self.update_entity::<StockItem>(op, id, patch))
            .await
    }

    pub async fn delete_stock_item(&self, id: &EntityId) -> StoreResult<()> {
        let op = Operation::DeleteStockItem;
        self.track(op, self.delete_entity::<StockItem>(op, id)).await
    }

    // ---- stock movements ----

    /// Creates a movement, then runs a full stock resync.
    pub async fn create_stock_movement(
        &self,
        draft: NewStockMovement,
    ) -> StoreResult<StockMovement> {
        let op = Operation::CreateStockMovement;
        self.track(op, async {
            draft.validate().map_err(StoreError::invalid(op))?;
            let created = self.create_entity::<StockMovement>(op, draft).await?;
            self.reconcile::<StockItem>(op, reconcile::after_create())
                .await?;
            Ok(created)
        })
        .await
    }

    /// Updates a movement; refetches the affected stock item only when the
    /// patch touches the item, the quantity or the direction.
    pub async fn update_stock_movement(
        &self,
        id: &EntityId,
        patch: MovementPatch,
    ) -> StoreResult<StockMovement> {
        let op = Operation::UpdateStockMovement;
        self.track(op, async {
            patch.validate().map_err(StoreError::invalid(op))?;
            let updated = self
                .update_entity::<StockMovement>(op, id, patch.clone())
                .await?;
            let plan = reconcile::after_update(&patch, &updated);
            self.reconcile::<StockItem>(op, plan).await?;
            Ok(updated)
        })
        .await
    }

    /// Deletes a movement, then refetches the stock item it pointed to.
    /// Nothing is refetched when the movement was not cached.
    pub async fn delete_stock_movement(&self, id: &EntityId) -> StoreResult<()> {
        let op = Operation::DeleteStockMovement;
        self.track(op, async {
            let captured = {
                let model = self.model.read().await;
                model.stock_movement(id).map(|m| m.stock_item.clone())
            };
            self.delete_entity::<StockMovement>(op, id).await?;
            let plan = reconcile::after_delete(captured.as_ref());
            self.reconcile::<StockItem>(op, plan).await
        })
        .await
    }

    // ---- internals ----

    /// Runs `fut` as one tracked operation. The busy guard outlives every
    /// read-model write made by `fut`.
    async fn track<T, F>(&self, operation: Operation, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        let _busy = self.status.begin();
        match fut.await {
            Ok(value) => {
                debug!(operation = %operation, "operation completed");
                Ok(value)
            }
            Err(err) => {
                error!(operation = %operation, error = %err, "operation failed");
                self.status.record_error(err.user_message());
                Err(err)
            }
        }
    }

    async fn fetch_all<R: Cached>(&self) -> RepositoryResult<Vec<R>> {
        R::repository(&self.repos).get_all().await
    }

    async fn create_entity<R: Cached>(&self, op: Operation, draft: R::Draft) -> StoreResult<R> {
        let created = R::repository(&self.repos)
            .create(draft)
            .await
            .map_err(StoreError::remote(op))?;
        debug!(collection = R::COLLECTION, id = %created.id(), "entity created");
        let mut model = self.model.write().await;
        upsert(R::collection_mut(&mut model), created.clone());
        Ok(created)
    }

    async fn update_entity<R: Cached>(
        &self,
        op: Operation,
        id: &EntityId,
        patch: R::Patch,
    ) -> StoreResult<R> {
        let updated = R::repository(&self.repos)
            .update(id, patch)
            .await
            .map_err(StoreError::remote(op))?;
        debug!(collection = R::COLLECTION, id = %id, "entity updated");
        let mut model = self.model.write().await;
        upsert(R::collection_mut(&mut model), updated.clone());
        Ok(updated)
    }

    async fn delete_entity<R: Cached>(&self, op: Operation, id: &EntityId) -> StoreResult<()> {
        R::repository(&self.repos)
            .delete(id)
            .await
            .map_err(StoreError::remote(op))?;
        debug!(collection = R::COLLECTION, id = %id, "entity deleted");
        let mut model = self.model.write().await;
        remove(R::collection_mut(&mut model), id);
        Ok(())
    }

    /// Targeted refetch: replace one cached entity with the server's copy.
    async fn refetch_entity<R: Cached>(&self, id: &EntityId) -> RepositoryResult<()> {
        let fresh = R::repository(&self.repos).get_by_id(id).await?;
        debug!(collection = R::COLLECTION, id = %id, "entity refetched");
        let mut model = self.model.write().await;
        upsert(R::collection_mut(&mut model), fresh);
        Ok(())
    }

    /// Full resync of the stock collections. Both are written under one lock
    /// so readers never see items and movements from different fetches.
    async fn resync_stock(&self) -> RepositoryResult<()> {
        let stock_items = self.fetch_all::<StockItem>().await?;
        let stock_movements = self.fetch_all::<StockMovement>().await?;
        info!(
            stock_items = stock_items.len(),
            stock_movements = stock_movements.len(),
            "stock data resynced"
        );
        let mut model = self.model.write().await;
        model.stock_items = stock_items;
        model.stock_movements = stock_movements;
        Ok(())
    }

    /// Executes a reconciliation plan. `R` is the entity a targeted refetch
    /// applies to.
    async fn reconcile<R: Cached>(&self, op: Operation, plan: ReconcilePlan) -> StoreResult<()> {
        match plan {
            ReconcilePlan::Skip(reason) => {
                debug!(operation = %op, ?reason, "reconciliation skipped");
                Ok(())
            }
            ReconcilePlan::Refetch(id) => self
                .refetch_entity::<R>(&id)
                .await
                .map_err(StoreError::reconciliation(op)),
            ReconcilePlan::FullResync => self
                .resync_stock()
                .await
                .map_err(StoreError::reconciliation(op)),
        }
    }
}
