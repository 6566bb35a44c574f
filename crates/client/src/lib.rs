//! `gestion-client`
//!
//! **Responsibility:** the shared client-side state container.
//!
//! This crate provides:
//! - A uniform CRUD data-access seam per entity ([`Repository`])
//! - The local read model mirrored from the API ([`ReadModel`])
//! - Mutations that keep the read model consistent, including stock
//!   reconciliation after movement edits ([`AppStore`])
//! - An observable busy/error status ([`StoreStatus`])
//!
//! The API stays the authority: the read model only changes after a remote
//! call succeeded, and server-computed quantities are refetched.

pub mod config;
pub mod error;
pub mod memory;
pub mod read_model;
pub mod reconcile;
pub mod repository;
pub mod status;
pub mod store;

pub use config::ClientConfig;
pub use error::{Operation, StoreError, StoreResult};
pub use memory::{CallKind, CallLog, InMemoryRepository};
pub use read_model::ReadModel;
pub use reconcile::{ReconcilePlan, SkipReason};
pub use repository::{Repositories, Repository, RepositoryError, RepositoryResult};
pub use status::{StatusTracker, StoreStatus};
pub use store::AppStore;
