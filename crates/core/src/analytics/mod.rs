//! Search analytics
//!
//! Records every catalog search as a normalized [`SearchEvent`] and derives
//! ranked statistics from the accumulated log.
//!
//! # Architecture
//!
//! - `normalize`: canonical form of search types and parameters
//! - `recorder`: best-effort appends to the log store
//! - `aggregator`: on-demand ranked views over a log snapshot
//! - `types`: aggregate rows and the combined report
//!
//! # Usage
//!
//! ```rust
//! use cinelog_core::analytics::{AnalyticsAggregator, SearchRecorder};
//! use cinelog_core::store::InMemoryLogStore;
//! use cinelog_core::types::ParamValue;
//! use std::sync::Arc;
//!
//! # async fn example() -> cinelog_core::Result<()> {
//! let store = Arc::new(InMemoryLogStore::new());
//! let recorder = SearchRecorder::new(store.clone());
//! let aggregator = AnalyticsAggregator::default_config(store);
//!
//! recorder
//!     .record("by actor", [("actor", ParamValue::from("Tom Hanks"))], 4)
//!     .await?;
//!
//! let actors = aggregator.top_actor_queries(5).await?;
//! assert_eq!(actors[0].actor_name, "tom hanks");
//! # Ok(())
//! # }
//! ```
//!
//! [`SearchEvent`]: crate::types::SearchEvent

pub mod aggregator;
pub mod normalize;
pub mod recorder;
pub mod types;

pub use aggregator::{
    count_actor_queries, count_genre_year_queries, count_search_types, count_title_queries,
    latest_distinct, AggregatorConfig, AnalyticsAggregator,
};
pub use normalize::{normalize_parameters, normalize_search_type, params_from_json};
pub use recorder::{RecordOutcome, RecorderConfig, RecorderStats, SearchRecorder};
pub use types::{
    ActorCount, AnalyticsReport, GenreYearCount, LatestSearch, SearchTypeCount, TitleCount,
};
