//! Aggregate rows produced by the search analytics views
//!
//! These are derived on demand from the log and never persisted.

use crate::types::ParamValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of searches per search type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchTypeCount {
    /// Normalized search type
    pub search_type: String,
    /// Number of events with this type
    pub count: usize,
}

/// Number of searches per exact (genre, from, to) combination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreYearCount {
    pub genre: ParamValue,
    pub from: ParamValue,
    pub to: ParamValue,
    pub count: usize,
}

/// Number of searches per title, grouped case-insensitively
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TitleCount {
    /// Title as written by the first event of the group
    pub title: String,
    pub count: usize,
}

/// Number of searches per actor name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActorCount {
    pub actor_name: String,
    pub count: usize,
}

/// One distinct recent search signature
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LatestSearch {
    pub search_type: String,
    /// Parameter values in ascending key order, joined with `", "`
    pub params: String,
    /// Result count of the most recent occurrence
    pub count: u64,
}

/// All five views computed from a single log snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsReport {
    /// Number of events in the snapshot
    pub total_events: usize,
    pub top_search_types: Vec<SearchTypeCount>,
    pub top_genre_year_queries: Vec<GenreYearCount>,
    pub top_title_queries: Vec<TitleCount>,
    pub top_actor_queries: Vec<ActorCount>,
    pub latest_distinct_searches: Vec<LatestSearch>,
    /// Report generation timestamp
    pub generated_at: DateTime<Utc>,
}
