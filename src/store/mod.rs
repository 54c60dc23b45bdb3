//! Persistence of links.
//!
//! A [`LinkStore`] is the single point of truth for link state. Both
//! uniqueness of codes and click accounting are guaranteed by the backend in
//! one call each, so callers never need to coordinate with each other.

mod memory;
mod postgres;

pub use memory::MemoryLinkStore;
pub use postgres::PgLinkStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::Link;

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Creates a link with zero clicks. Fails with [`StoreError::Conflict`]
    /// when the code exists; the check and the insert are one operation.
    async fn insert(&self, code: &str, url: &str) -> Result<Link, StoreError>;

    /// Increments `clicks` and stamps `last_clicked` in one atomic update,
    /// returning the link as it is after the update.
    async fn resolve_and_count(&self, code: &str) -> Result<Link, StoreError>;

    /// Reads a link without touching its counters.
    async fn get(&self, code: &str) -> Result<Link, StoreError>;

    /// All links, newest first.
    async fn list(&self) -> Result<Vec<Link>, StoreError>;

    /// Removes a link. Returns `false` when there was nothing to remove.
    async fn delete(&self, code: &str) -> Result<bool, StoreError>;
}
