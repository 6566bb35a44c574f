//! In-memory repository: offline backend and test double.
//!
//! Behaves like the API for plain CRUD (sequential ids, canonical results) but
//! has no server-side business rules; seed with [`InMemoryRepository::insert`]
//! to simulate values the server would recompute.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use gestion_core::{Entity, EntityId, Resource};

use crate::repository::{Repository, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    GetAll,
    GetById,
    Create,
    Update,
    Delete,
}

/// Calls received so far, with the targeted ids where relevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLog {
    pub get_all: usize,
    pub get_by_id: Vec<EntityId>,
    pub create: usize,
    pub update: Vec<EntityId>,
    pub delete: Vec<EntityId>,
}

impl CallLog {
    pub fn total(&self) -> usize {
        self.get_all + self.get_by_id.len() + self.create + self.update.len() + self.delete.len()
    }
}

#[derive(Debug)]
pub struct InMemoryRepository<R> {
    entries: RwLock<Vec<R>>,
    next_id: AtomicU64,
    calls: Mutex<CallLog>,
    failures: Mutex<HashSet<CallKind>>,
}

fn poisoned() -> RepositoryError {
    RepositoryError::Transport("in-memory repository lock poisoned".to_string())
}

fn numeric_id(id: &EntityId) -> Option<u64> {
    id.as_str().parse().ok()
}

impl<R: Resource> InMemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            calls: Mutex::new(CallLog::default()),
            failures: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_entries(entries: impl IntoIterator<Item = R>) -> Self {
        let repo = Self::new();
        for entry in entries {
            repo.insert(entry);
        }
        repo
    }

    /// Insert or replace an entity directly, without recording a call.
    pub fn insert(&self, entity: R) {
        if let Some(n) = numeric_id(entity.id()) {
            self.next_id.fetch_max(n + 1, Ordering::SeqCst);
        }
        if let Ok(mut entries) = self.entries.write() {
            match entries.iter_mut().find(|e| e.id() == entity.id()) {
                Some(slot) => *slot = entity,
                None => entries.push(entity),
            }
        }
    }

    pub fn entries(&self) -> Vec<R> {
        self.entries.read().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> CallLog {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn reset_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            *calls = CallLog::default();
        }
    }

    /// Make every subsequent call of `kind` fail with a transport error.
    pub fn fail_on(&self, kind: CallKind) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(kind);
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.clear();
        }
    }

    fn record(&self, kind: CallKind, id: Option<&EntityId>) -> RepositoryResult<()> {
        {
            let mut calls = self.calls.lock().map_err(|_| poisoned())?;
            let id = id.cloned().unwrap_or_default();
            match kind {
                CallKind::GetAll => calls.get_all += 1,
                CallKind::GetById => calls.get_by_id.push(id),
                CallKind::Create => calls.create += 1,
                CallKind::Update => calls.update.push(id),
                CallKind::Delete => calls.delete.push(id),
            }
        }

        let failures = self.failures.lock().map_err(|_| poisoned())?;
        if failures.contains(&kind) {
            return Err(RepositoryError::Transport(format!(
                "simulated {kind:?} failure on {}",
                R::COLLECTION
            )));
        }
        Ok(())
    }
}

impl<R: Resource> Default for InMemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Resource> Repository<R> for InMemoryRepository<R> {
    async fn get_all(&self) -> RepositoryResult<Vec<R>> {
        self.record(CallKind::GetAll, None)?;
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.clone())
    }

    async fn get_by_id(&self, id: &EntityId) -> RepositoryResult<R> {
        self.record(CallKind::GetById, Some(id))?;
        let entries = self.entries.read().map_err(|_| poisoned())?;
        entries
            .iter()
            .find(|e| e.id() == id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found::<R>(id))
    }

    async fn create(&self, draft: R::Draft) -> RepositoryResult<R> {
        self.record(CallKind::Create, None)?;
        let id = EntityId::from(self.next_id.fetch_add(1, Ordering::SeqCst));
        let entity = R::from_draft(id, draft);
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: &EntityId, patch: R::Patch) -> RepositoryResult<R> {
        self.record(CallKind::Update, Some(id))?;
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let entity = entries
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| RepositoryError::not_found::<R>(id))?;
        entity.apply_patch(patch);
        Ok(entity.clone())
    }

    async fn delete(&self, id: &EntityId) -> RepositoryResult<()> {
        self.record(CallKind::Delete, Some(id))?;
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let before = entries.len();
        entries.retain(|e| e.id() != id);
        if entries.len() == before {
            return Err(RepositoryError::not_found::<R>(id));
        }
        Ok(())
    }
}
