//! In-process log store
//!
//! Keeps events in a vector behind a lock. Used when no external log store
//! is configured, and by tests.

use super::LogStore;
use crate::error::Result;
use crate::types::SearchEvent;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Log store held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryLogStore {
    events: Arc<RwLock<Vec<SearchEvent>>>,
}

impl InMemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with events, in the given order
    pub fn with_events(events: Vec<SearchEvent>) -> Self {
        Self {
            events: Arc::new(RwLock::new(events)),
        }
    }

    /// Number of stored events
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

#[async_trait]
impl LogStore for InMemoryLogStore {
    async fn append(&self, event: &SearchEvent) -> Result<()> {
        let mut events = self.events.write();
        events.push(event.clone());
        debug!("Appended event {} ({} stored)", event.id, events.len());
        Ok(())
    }

    async fn snapshot(&self) -> Result<Vec<SearchEvent>> {
        Ok(self.events.read().clone())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
