//! Common test helpers for analytics integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use cinelog_core::analytics::normalize_parameters;
use cinelog_core::store::LogStore;
use cinelog_core::types::{ParamValue, SearchEvent};
use cinelog_core::{CinelogError, Result};

/// Log store that cannot be reached at all
pub struct UnreachableStore;

#[async_trait]
impl LogStore for UnreachableStore {
    async fn append(&self, _event: &SearchEvent) -> Result<()> {
        Err(CinelogError::store_unavailable("log", "connection refused"))
    }

    async fn snapshot(&self) -> Result<Vec<SearchEvent>> {
        Err(CinelogError::store_unavailable("log", "connection refused"))
    }

    fn backend(&self) -> &'static str {
        "unreachable"
    }
}

/// Log store that is reachable but refuses every append
pub struct RejectingStore;

#[async_trait]
impl LogStore for RejectingStore {
    async fn append(&self, _event: &SearchEvent) -> Result<()> {
        Err(CinelogError::write_rejected("document failed schema validation"))
    }

    async fn snapshot(&self) -> Result<Vec<SearchEvent>> {
        Ok(Vec::new())
    }

    fn backend(&self) -> &'static str {
        "rejecting"
    }
}

/// Fixed reference instant for building timestamps
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Build a normalized event `secs` seconds after [`base_time`]
pub fn event_at(
    search_type: &str,
    params: Vec<(&str, ParamValue)>,
    result_count: u64,
    secs: i64,
) -> SearchEvent {
    SearchEvent::new(
        search_type,
        normalize_parameters(params).unwrap(),
        result_count,
        base_time() + Duration::seconds(secs),
    )
}
