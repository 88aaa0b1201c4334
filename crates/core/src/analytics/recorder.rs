//! Search event recorder
//!
//! Normalizes a (type, parameters, result count) triple and appends it to
//! the log store as a [`SearchEvent`]. Recording is best-effort telemetry:
//! a store that is unreachable or rejects the append is reported and
//! swallowed so the search that triggered it can still complete. Malformed
//! parameters are a caller bug and are returned as errors.

use super::normalize::{normalize_parameters, normalize_search_type, params_from_json};
use crate::error::Result;
use crate::store::LogStore;
use crate::types::{ParamValue, SearchEvent, SearchParams};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// What happened to a recorded event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The event was appended to the log store
    Stored(Uuid),
    /// The store failed; the event was reported and dropped
    Dropped { reason: String },
}

impl RecordOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored(_))
    }
}

/// Recorder configuration
#[derive(Debug, Clone, Default)]
pub struct RecorderConfig {
    /// Enable debug logging of every normalized event
    pub debug: bool,
}

/// Records catalog searches into a log store
#[derive(Clone)]
pub struct SearchRecorder {
    store: Arc<dyn LogStore>,
    state: Arc<Mutex<RecorderState>>,
    config: RecorderConfig,
}

/// Internal recorder state
#[derive(Debug, Default)]
struct RecorderState {
    /// Last timestamp handed out, keeps timestamps non-decreasing
    last_timestamp: Option<DateTime<Utc>>,
    /// Events appended successfully
    recorded: usize,
    /// Events dropped after a store failure
    dropped: usize,
}

impl std::fmt::Debug for SearchRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchRecorder")
            .field("backend", &self.store.backend())
            .field("config", &self.config)
            .finish()
    }
}

impl SearchRecorder {
    /// Creates a recorder writing to the given log store
    ///
    /// # Examples
    ///
    /// ```
    /// use cinelog_core::analytics::SearchRecorder;
    /// use cinelog_core::store::InMemoryLogStore;
    /// use std::sync::Arc;
    ///
    /// let recorder = SearchRecorder::new(Arc::new(InMemoryLogStore::new()));
    /// ```
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self::with_config(store, RecorderConfig::default())
    }

    pub fn with_config(store: Arc<dyn LogStore>, config: RecorderConfig) -> Self {
        Self {
            store,
            state: Arc::new(Mutex::new(RecorderState::default())),
            config,
        }
    }

    /// Records one search
    ///
    /// Returns `Err` only for parameters that cannot be normalized. A store
    /// failure yields `Ok(RecordOutcome::Dropped { .. })`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cinelog_core::analytics::SearchRecorder;
    /// use cinelog_core::store::InMemoryLogStore;
    /// use cinelog_core::types::ParamValue;
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> cinelog_core::Result<()> {
    /// let recorder = SearchRecorder::new(Arc::new(InMemoryLogStore::new()));
    /// let outcome = recorder
    ///     .record("by title", [("title", ParamValue::from("Casablanca"))], 1)
    ///     .await?;
    /// assert!(outcome.is_stored());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn record<I, K>(
        &self,
        search_type: &str,
        parameters: I,
        result_count: u64,
    ) -> Result<RecordOutcome>
    where
        I: IntoIterator<Item = (K, ParamValue)>,
        K: Into<String>,
    {
        let search_type = normalize_search_type(search_type);
        let parameters = normalize_parameters(parameters)?;
        Ok(self.append(search_type, parameters, result_count).await)
    }

    /// Records one search whose parameters arrive as a JSON object
    ///
    /// Non-scalar parameter values are rejected as malformed.
    pub async fn record_json(
        &self,
        search_type: &str,
        parameters: &serde_json::Value,
        result_count: u64,
    ) -> Result<RecordOutcome> {
        let raw = params_from_json(parameters)?;
        self.record(search_type, raw, result_count).await
    }

    async fn append(
        &self,
        search_type: String,
        parameters: SearchParams,
        result_count: u64,
    ) -> RecordOutcome {
        let event = SearchEvent::new(search_type, parameters, result_count, self.next_timestamp());

        if self.config.debug {
            debug!("Recording search event: {:?}", event);
        }

        match self.store.append(&event).await {
            Ok(()) => {
                self.state.lock().recorded += 1;
                debug!(
                    "Recorded '{}' search with {} results",
                    event.search_type, event.result_count
                );
                RecordOutcome::Stored(event.id)
            }
            Err(e) => {
                self.state.lock().dropped += 1;
                if e.is_write_failure() {
                    warn!(
                        "Dropped '{}' search event, {} log store failed: {}",
                        event.search_type,
                        self.store.backend(),
                        e
                    );
                } else {
                    error!(
                        "Dropped '{}' search event after unexpected {} error: {}",
                        event.search_type,
                        e.category(),
                        e
                    );
                }
                RecordOutcome::Dropped {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Current wall-clock time, never earlier than the previous call
    fn next_timestamp(&self) -> DateTime<Utc> {
        let mut state = self.state.lock();
        let now = Utc::now();
        let ts = match state.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        state.last_timestamp = Some(ts);
        ts
    }

    /// Returns recorder statistics
    pub fn stats(&self) -> RecorderStats {
        let state = self.state.lock();
        RecorderStats {
            recorded: state.recorded,
            dropped: state.dropped,
        }
    }
}

/// Recorder statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderStats {
    /// Events appended to the store
    pub recorded: usize,
    /// Events dropped after a store failure
    pub dropped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CinelogError;
    use crate::store::InMemoryLogStore;
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    struct RejectingStore;

    #[async_trait]
    impl LogStore for RejectingStore {
        async fn append(&self, _event: &SearchEvent) -> Result<()> {
            Err(CinelogError::write_rejected("document failed validation"))
        }

        async fn snapshot(&self) -> Result<Vec<SearchEvent>> {
            Ok(Vec::new())
        }

        fn backend(&self) -> &'static str {
            "rejecting"
        }
    }

    #[tokio::test]
    async fn test_record_normalizes_before_append() {
        let store = InMemoryLogStore::new();
        let recorder = SearchRecorder::new(Arc::new(store.clone()));

        recorder
            .record(
                "  By Genre And Years ",
                vec![
                    ("to", ParamValue::from(2020)),
                    ("genre", ParamValue::from("Drama")),
                    ("from", ParamValue::from(2000)),
                ],
                12,
            )
            .await
            .unwrap();

        let events = store.snapshot().await.unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.search_type, "by genre and years");
        assert_eq!(
            event.parameters.keys().collect::<Vec<_>>(),
            vec!["from", "genre", "to"]
        );
        assert_eq!(event.parameters.get("genre"), Some(&ParamValue::from("drama")));
        assert_eq!(event.result_count, 12);
    }

    #[tokio::test]
    async fn test_unknown_search_type_stored_as_given() {
        let store = InMemoryLogStore::new();
        let recorder = SearchRecorder::new(Arc::new(store.clone()));

        recorder
            .record("by mood", [("mood", ParamValue::from("Gloomy"))], 0)
            .await
            .unwrap();

        let events = store.snapshot().await.unwrap();
        assert_eq!(events[0].search_type, "by mood");
    }

    #[tokio::test]
    async fn test_rejected_write_does_not_raise() {
        let recorder = SearchRecorder::new(Arc::new(RejectingStore));

        let outcome = recorder
            .record("by title", [("title", ParamValue::from("alien"))], 3)
            .await
            .unwrap();

        assert_matches!(outcome, RecordOutcome::Dropped { .. });
        assert_eq!(recorder.stats().dropped, 1);
        assert_eq!(recorder.stats().recorded, 0);
    }

    #[tokio::test]
    async fn test_malformed_parameters_raise() {
        let store = InMemoryLogStore::new();
        let recorder = SearchRecorder::new(Arc::new(store.clone()));

        let result = recorder
            .record_json("by title", &serde_json::json!({"title": ["a", "b"]}), 0)
            .await;

        assert_matches!(result, Err(CinelogError::MalformedEvent { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_record_json() {
        let store = InMemoryLogStore::new();
        let recorder = SearchRecorder::new(Arc::new(store.clone()));

        recorder
            .record_json("by actor", &serde_json::json!({"actor": " Tom Hanks"}), 7)
            .await
            .unwrap();

        let events = store.snapshot().await.unwrap();
        assert_eq!(
            events[0].parameters.get("actor"),
            Some(&ParamValue::from("tom hanks"))
        );
    }

    #[tokio::test]
    async fn test_timestamps_non_decreasing() {
        let store = InMemoryLogStore::new();
        let recorder = SearchRecorder::new(Arc::new(store.clone()));

        for i in 0..20 {
            recorder
                .record("by title", [("title", ParamValue::from(format!("t{}", i)))], 0)
                .await
                .unwrap();
        }

        let events = store.snapshot().await.unwrap();
        assert!(events
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));
        assert_eq!(recorder.stats().recorded, 20);
    }
}
