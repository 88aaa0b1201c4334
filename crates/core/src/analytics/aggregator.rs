//! Search analytics aggregator
//!
//! Computes ranked views over the full search log. Every call reads a fresh
//! snapshot from the log store and recomputes from scratch; nothing is
//! cached between calls.
//!
//! The grouping and ranking logic lives in free functions over a slice of
//! events so a single snapshot can feed several views.

use super::types::{
    ActorCount, AnalyticsReport, GenreYearCount, LatestSearch, SearchTypeCount, TitleCount,
};
use crate::error::Result;
use crate::store::LogStore;
use crate::types::{ParamValue, SearchEvent, SearchKind, SearchParams};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, info};

/// Aggregator configuration
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Row limit used when the caller does not pass one
    pub default_limit: usize,
    /// Enable debug logging
    pub debug: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            default_limit: 5,
            debug: false,
        }
    }
}

/// Analytics aggregator reading from a log store
#[derive(Clone)]
pub struct AnalyticsAggregator {
    store: Arc<dyn LogStore>,
    config: AggregatorConfig,
}

impl std::fmt::Debug for AnalyticsAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsAggregator")
            .field("backend", &self.store.backend())
            .field("config", &self.config)
            .finish()
    }
}

impl AnalyticsAggregator {
    /// Creates a new analytics aggregator
    ///
    /// # Examples
    ///
    /// ```
    /// use cinelog_core::analytics::{AggregatorConfig, AnalyticsAggregator};
    /// use cinelog_core::store::InMemoryLogStore;
    /// use std::sync::Arc;
    ///
    /// let aggregator = AnalyticsAggregator::new(
    ///     Arc::new(InMemoryLogStore::new()),
    ///     AggregatorConfig::default(),
    /// );
    /// ```
    pub fn new(store: Arc<dyn LogStore>, config: AggregatorConfig) -> Self {
        Self { store, config }
    }

    /// Creates an aggregator with default configuration
    pub fn default_config(store: Arc<dyn LogStore>) -> Self {
        Self::new(store, AggregatorConfig::default())
    }

    /// Row limit applied when none is given
    pub fn default_limit(&self) -> usize {
        self.config.default_limit
    }

    async fn snapshot(&self) -> Result<Vec<SearchEvent>> {
        let events = self.store.snapshot().await?;
        if self.config.debug {
            debug!(
                "Read {} events from {} log store",
                events.len(),
                self.store.backend()
            );
        }
        Ok(events)
    }

    /// Most frequent search types
    pub async fn top_search_types(&self, limit: usize) -> Result<Vec<SearchTypeCount>> {
        let events = self.snapshot().await?;
        Ok(count_search_types(&events, limit))
    }

    /// Most frequent genre and year-range combinations
    pub async fn top_genre_year_queries(&self, limit: usize) -> Result<Vec<GenreYearCount>> {
        let events = self.snapshot().await?;
        Ok(count_genre_year_queries(&events, limit))
    }

    /// Most searched titles, grouped case-insensitively
    pub async fn top_title_queries(&self, limit: usize) -> Result<Vec<TitleCount>> {
        let events = self.snapshot().await?;
        Ok(count_title_queries(&events, limit))
    }

    /// Most searched actors
    pub async fn top_actor_queries(&self, limit: usize) -> Result<Vec<ActorCount>> {
        let events = self.snapshot().await?;
        Ok(count_actor_queries(&events, limit))
    }

    /// Most recent distinct search signatures
    pub async fn latest_distinct_searches(&self, limit: usize) -> Result<Vec<LatestSearch>> {
        let events = self.snapshot().await?;
        Ok(latest_distinct(&events, limit))
    }

    /// Computes all five views from one snapshot
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the log store cannot be read.
    pub async fn report(&self, limit: usize) -> Result<AnalyticsReport> {
        let events = self.snapshot().await?;
        let report = AnalyticsReport {
            total_events: events.len(),
            top_search_types: count_search_types(&events, limit),
            top_genre_year_queries: count_genre_year_queries(&events, limit),
            top_title_queries: count_title_queries(&events, limit),
            top_actor_queries: count_actor_queries(&events, limit),
            latest_distinct_searches: latest_distinct(&events, limit),
            generated_at: Utc::now(),
        };

        info!(
            "Generated analytics report over {} events (limit {})",
            report.total_events, limit
        );
        Ok(report)
    }
}

/// Sorts groups by descending count and keeps the first `limit`
///
/// The sort is stable, so equal counts stay in first-seen order.
fn rank<K, R>(groups: IndexMap<K, (R, usize)>, limit: usize) -> Vec<(R, usize)>
where
    K: Hash + Eq,
{
    let mut ranked: Vec<(R, usize)> = groups.into_values().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

fn of_kind<'a>(
    events: &'a [SearchEvent],
    kind: SearchKind,
) -> impl Iterator<Item = &'a SearchEvent> + 'a {
    events
        .iter()
        .filter(move |e| e.search_type == kind.as_str())
}

/// Groups events by search type and ranks by count
pub fn count_search_types(events: &[SearchEvent], limit: usize) -> Vec<SearchTypeCount> {
    let mut groups: IndexMap<&str, (String, usize)> = IndexMap::new();
    for event in events {
        groups
            .entry(event.search_type.as_str())
            .or_insert_with(|| (event.search_type.clone(), 0))
            .1 += 1;
    }

    debug!("Counted {} distinct search types", groups.len());
    rank(groups, limit)
        .into_iter()
        .map(|(search_type, count)| SearchTypeCount { search_type, count })
        .collect()
}

/// Groups genre and year-range searches by their exact `(genre, from, to)`
///
/// Events missing any of the three parameters are skipped.
pub fn count_genre_year_queries(events: &[SearchEvent], limit: usize) -> Vec<GenreYearCount> {
    let mut groups: IndexMap<(&ParamValue, &ParamValue, &ParamValue), (GenreYearCount, usize)> =
        IndexMap::new();

    for event in of_kind(events, SearchKind::GenreAndYears) {
        let params = &event.parameters;
        let (Some(genre), Some(from), Some(to)) =
            (params.get("genre"), params.get("from"), params.get("to"))
        else {
            continue;
        };

        groups
            .entry((genre, from, to))
            .or_insert_with(|| {
                (
                    GenreYearCount {
                        genre: genre.clone(),
                        from: from.clone(),
                        to: to.clone(),
                        count: 0,
                    },
                    0,
                )
            })
            .1 += 1;
    }

    debug!("Counted {} distinct genre/year queries", groups.len());
    rank(groups, limit)
        .into_iter()
        .map(|(row, count)| GenreYearCount { count, ..row })
        .collect()
}

/// Groups title searches by lowercased title
///
/// The emitted title is the one carried by the first event of each group.
pub fn count_title_queries(events: &[SearchEvent], limit: usize) -> Vec<TitleCount> {
    let mut groups: IndexMap<String, (String, usize)> = IndexMap::new();

    for event in of_kind(events, SearchKind::Title) {
        let Some(title) = event.parameters.get("title") else {
            continue;
        };
        let title = title.to_string();
        groups
            .entry(title.to_lowercase())
            .or_insert_with(|| (title, 0))
            .1 += 1;
    }

    debug!("Counted {} distinct titles", groups.len());
    rank(groups, limit)
        .into_iter()
        .map(|(title, count)| TitleCount { title, count })
        .collect()
}

/// Groups actor searches by the stored actor value
pub fn count_actor_queries(events: &[SearchEvent], limit: usize) -> Vec<ActorCount> {
    let mut groups: IndexMap<&ParamValue, (String, usize)> = IndexMap::new();

    for event in of_kind(events, SearchKind::Actor) {
        let Some(actor) = event.parameters.get("actor") else {
            continue;
        };
        groups
            .entry(actor)
            .or_insert_with(|| (actor.to_string(), 0))
            .1 += 1;
    }

    debug!("Counted {} distinct actors", groups.len());
    rank(groups, limit)
        .into_iter()
        .map(|(actor_name, count)| ActorCount { actor_name, count })
        .collect()
}

/// The most recent occurrence of one search signature
struct Latest<'a> {
    search_type: &'a str,
    parameters: &'a SearchParams,
    result_count: u64,
    timestamp: DateTime<Utc>,
    position: usize,
}

/// Most recent distinct `(search_type, parameters)` signatures
///
/// Events are ordered newest first, collapsed to one row per signature
/// keeping the newest occurrence, re-ordered by that occurrence and cut to
/// `limit`. On equal timestamps the later-inserted event counts as newer.
/// Parameter values are rendered in ascending key order without keys.
pub fn latest_distinct(events: &[SearchEvent], limit: usize) -> Vec<LatestSearch> {
    let mut ordered: Vec<(usize, &SearchEvent)> = events.iter().enumerate().collect();
    ordered.sort_by(|(ia, a), (ib, b)| b.timestamp.cmp(&a.timestamp).then(ib.cmp(ia)));

    let mut groups: IndexMap<(&str, &SearchParams), Latest<'_>> = IndexMap::new();
    for (position, event) in ordered {
        groups
            .entry((event.search_type.as_str(), &event.parameters))
            .or_insert_with(|| Latest {
                search_type: &event.search_type,
                parameters: &event.parameters,
                result_count: event.result_count,
                timestamp: event.timestamp,
                position,
            });
    }

    let mut latest: Vec<Latest<'_>> = groups.into_values().collect();
    latest.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then(b.position.cmp(&a.position))
    });
    latest.truncate(limit);

    debug!("Selected {} latest distinct searches", latest.len());
    latest
        .into_iter()
        .map(|l| LatestSearch {
            search_type: l.search_type.to_string(),
            params: l.parameters.display_values(),
            count: l.result_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::normalize::normalize_parameters;
    use chrono::Duration;

    fn event_at(
        search_type: &str,
        params: Vec<(&str, ParamValue)>,
        result_count: u64,
        offset_secs: i64,
    ) -> SearchEvent {
        let base = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        SearchEvent::new(
            search_type,
            normalize_parameters(params).unwrap(),
            result_count,
            base + Duration::seconds(offset_secs),
        )
    }

    /// Title event carrying the given case as stored
    fn raw_title_event(title: &str, offset_secs: i64) -> SearchEvent {
        let mut event = event_at("by title", vec![], 1, offset_secs);
        event.parameters =
            serde_json::from_value(serde_json::json!({ "title": title })).unwrap();
        event
    }

    #[test]
    fn test_count_search_types() {
        let events = vec![
            event_at("by title", vec![("title", "a".into())], 1, 0),
            event_at("by actor", vec![("actor", "b".into())], 1, 1),
            event_at("by title", vec![("title", "c".into())], 1, 2),
            event_at("by title", vec![("title", "d".into())], 1, 3),
        ];

        let rows = count_search_types(&events, 5);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].search_type, "by title");
        assert_eq!(rows[0].count, 3);
        assert_eq!(rows[1].count, 1);
    }

    #[test]
    fn test_limit_bounds_rows() {
        let events: Vec<SearchEvent> = (0..10)
            .map(|i| event_at(&format!("type {}", i), vec![], 0, i))
            .collect();

        assert_eq!(count_search_types(&events, 3).len(), 3);
        assert!(count_search_types(&events, 0).is_empty());
        assert_eq!(latest_distinct(&events, 4).len(), 4);
    }

    #[test]
    fn test_genre_year_groups_exact_triple() {
        let gy = |genre: &str, from: i64, to: i64, at: i64| {
            event_at(
                "by genre and years",
                vec![
                    ("genre", genre.into()),
                    ("from", from.into()),
                    ("to", to.into()),
                ],
                2,
                at,
            )
        };
        let events = vec![
            gy("drama", 2000, 2010, 0),
            gy("comedy", 1990, 1995, 1),
            gy("drama", 2000, 2010, 2),
            gy("drama", 2000, 2011, 3),
            event_at("by genre and years", vec![("genre", "drama".into())], 0, 4),
        ];

        let rows = count_genre_year_queries(&events, 5);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].genre, ParamValue::from("drama"));
        assert_eq!(rows[0].from, ParamValue::from(2000));
        assert_eq!(rows[0].to, ParamValue::from(2010));
        assert_eq!(rows[0].count, 2);
        assert!(rows[1..].iter().all(|r| r.count == 1));
    }

    #[test]
    fn test_integer_and_float_years_group_apart() {
        let events = vec![
            event_at(
                "by genre and years",
                vec![
                    ("genre", "drama".into()),
                    ("from", 2000.into()),
                    ("to", 2010.into()),
                ],
                0,
                0,
            ),
            event_at(
                "by genre and years",
                vec![
                    ("genre", "drama".into()),
                    ("from", 2000.0.into()),
                    ("to", 2010.into()),
                ],
                0,
                1,
            ),
        ];
        assert_eq!(count_genre_year_queries(&events, 5).len(), 2);
    }

    #[test]
    fn test_titles_group_case_insensitively() {
        let events = vec![
            raw_title_event("Casablanca", 0),
            raw_title_event("casablanca", 1),
            raw_title_event("CASABLANCA", 2),
            raw_title_event("Alien", 3),
        ];

        let rows = count_title_queries(&events, 5);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Casablanca");
        assert_eq!(rows[0].count, 3);
        assert_eq!(rows[1].title, "Alien");
    }

    #[test]
    fn test_events_without_grouping_parameter_skipped() {
        let events = vec![
            event_at("by title", vec![("page", 1.into())], 0, 0),
            event_at("by actor", vec![("name", "x".into())], 0, 1),
        ];
        assert!(count_title_queries(&events, 5).is_empty());
        assert!(count_actor_queries(&events, 5).is_empty());
    }

    #[test]
    fn test_actor_counts() {
        let events = vec![
            event_at("by actor", vec![("actor", "tom hanks".into())], 3, 0),
            event_at("by actor", vec![("actor", "meg ryan".into())], 3, 1),
            event_at("by actor", vec![("actor", "tom hanks".into())], 3, 2),
            event_at("by title", vec![("title", "tom hanks".into())], 0, 3),
        ];

        let rows = count_actor_queries(&events, 5);
        assert_eq!(
            rows,
            vec![
                ActorCount {
                    actor_name: "tom hanks".to_string(),
                    count: 2
                },
                ActorCount {
                    actor_name: "meg ryan".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_latest_distinct_collapses_repeats() {
        let same = || vec![("title", ParamValue::from("alien"))];
        let events = vec![
            event_at("by title", same(), 1, 1),
            event_at("by title", same(), 2, 2),
            event_at("by title", same(), 3, 3),
            event_at("by actor", vec![("actor", "sigourney weaver".into())], 9, 4),
        ];

        let rows = latest_distinct(&events, 2);
        assert_eq!(
            rows,
            vec![
                LatestSearch {
                    search_type: "by actor".to_string(),
                    params: "sigourney weaver".to_string(),
                    count: 9,
                },
                LatestSearch {
                    search_type: "by title".to_string(),
                    params: "alien".to_string(),
                    count: 3,
                },
            ]
        );
    }

    #[test]
    fn test_latest_distinct_uses_full_parameter_mapping() {
        let events = vec![
            event_at(
                "by genre and years",
                vec![
                    ("genre", "drama".into()),
                    ("from", 2000.into()),
                    ("to", 2010.into()),
                ],
                4,
                0,
            ),
            event_at(
                "by genre and years",
                vec![
                    ("genre", "drama".into()),
                    ("from", 2000.into()),
                    ("to", 2012.into()),
                ],
                5,
                1,
            ),
        ];

        let rows = latest_distinct(&events, 5);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].params, "2000, drama, 2012");
        assert_eq!(rows[1].params, "2000, drama, 2010");
    }

    #[test]
    fn test_latest_distinct_equal_timestamps_prefers_later_insert() {
        let events = vec![
            event_at("by title", vec![("title", "a".into())], 1, 0),
            event_at("by title", vec![("title", "b".into())], 1, 0),
            event_at("by title", vec![("title", "a".into())], 7, 0),
        ];

        let rows = latest_distinct(&events, 5);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].params, "a");
        assert_eq!(rows[0].count, 7);
        assert_eq!(rows[1].params, "b");
    }

    #[test]
    fn test_empty_log_yields_empty_views() {
        let events: Vec<SearchEvent> = Vec::new();
        assert!(count_search_types(&events, 5).is_empty());
        assert!(count_genre_year_queries(&events, 5).is_empty());
        assert!(count_title_queries(&events, 5).is_empty());
        assert!(count_actor_queries(&events, 5).is_empty());
        assert!(latest_distinct(&events, 5).is_empty());
    }
}
