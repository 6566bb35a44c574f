//! Uniform CRUD data-access seam, one instance per remote collection.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use gestion_core::{EntityId, Resource};
use gestion_inventory::{ItemType, StockItem, StockMovement};
use gestion_suppliers::{Supplier, Transaction};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Network/transport failure (unreachable, timeout, broken payload).
    #[error("transport error: {0}")]
    Transport(String),

    /// The targeted entity does not exist remotely.
    #[error("{collection} {id} not found")]
    NotFound {
        collection: &'static str,
        id: EntityId,
    },

    /// The server refused the payload.
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl RepositoryError {
    pub fn not_found<R: Resource>(id: &EntityId) -> Self {
        Self::NotFound {
            collection: R::COLLECTION,
            id: id.clone(),
        }
    }
}

/// CRUD capability over one remote collection.
///
/// `create` and `update` return the canonical entity as stored by the server.
#[async_trait]
pub trait Repository<R: Resource>: Send + Sync {
    async fn get_all(&self) -> RepositoryResult<Vec<R>>;

    async fn get_by_id(&self, id: &EntityId) -> RepositoryResult<R>;

    async fn create(&self, draft: R::Draft) -> RepositoryResult<R>;

    async fn update(&self, id: &EntityId, patch: R::Patch) -> RepositoryResult<R>;

    async fn delete(&self, id: &EntityId) -> RepositoryResult<()>;
}

/// The five collections the store works against.
#[derive(Clone)]
pub struct Repositories {
    pub suppliers: Arc<dyn Repository<Supplier>>,
    pub transactions: Arc<dyn Repository<Transaction>>,
    pub item_types: Arc<dyn Repository<ItemType>>,
    pub stock_items: Arc<dyn Repository<StockItem>>,
    pub stock_movements: Arc<dyn Repository<StockMovement>>,
}
