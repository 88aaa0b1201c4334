//! Log store abstraction
//!
//! The log store is an append-only collection of [`SearchEvent`]s. The
//! recorder appends to it; the aggregator reads full snapshots from it.
//! Concurrent appends are serialized by the store implementation.

use crate::error::Result;
use crate::types::SearchEvent;
use async_trait::async_trait;

pub mod memory;

pub use memory::InMemoryLogStore;

/// Append-only store of search events
///
/// Implementations report connectivity problems as
/// [`CinelogError::StoreUnavailable`](crate::CinelogError::StoreUnavailable)
/// and store-side refusals of an append as
/// [`CinelogError::WriteRejected`](crate::CinelogError::WriteRejected).
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Append one event
    async fn append(&self, event: &SearchEvent) -> Result<()>;

    /// Read every stored event in insertion order
    async fn snapshot(&self) -> Result<Vec<SearchEvent>>;

    /// Short backend name used in logs
    fn backend(&self) -> &'static str;
}
