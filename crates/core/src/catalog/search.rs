//! Catalog search service
//!
//! Runs a catalog query and then records it. The record call happens after
//! the rows are in hand; a log store failure is absorbed by the recorder and
//! never fails the search.

use super::{ActorRow, CatalogStore, FilmRow, GenreYearRow, TitleRow};
use crate::analytics::SearchRecorder;
use crate::error::{CinelogError, Result};
use crate::types::{ParamValue, SearchKind};
use std::sync::Arc;
use tracing::{debug, info};

/// Default page size for title searches
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default row cap for the unpaginated searches
pub const DEFAULT_RESULT_LIMIT: usize = 1000;

/// Searches the catalog and records every search
#[derive(Clone)]
pub struct CatalogSearch {
    catalog: Arc<dyn CatalogStore>,
    recorder: SearchRecorder,
    page_size: usize,
    result_limit: usize,
}

impl std::fmt::Debug for CatalogSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSearch")
            .field("catalog", &self.catalog.backend())
            .field("recorder", &self.recorder)
            .field("page_size", &self.page_size)
            .field("result_limit", &self.result_limit)
            .finish()
    }
}

/// Row count as stored in a search event
fn result_count(rows: usize) -> u64 {
    u64::try_from(rows).unwrap_or(u64::MAX)
}

fn check_year_range(from: i32, to: i32) -> Result<()> {
    if from > to {
        return Err(CinelogError::validation(format!(
            "year range start {} is after end {}",
            from, to
        )));
    }
    Ok(())
}

impl CatalogSearch {
    pub fn new(catalog: Arc<dyn CatalogStore>, recorder: SearchRecorder) -> Self {
        Self {
            catalog,
            recorder,
            page_size: DEFAULT_PAGE_SIZE,
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }

    /// Set the title search page size (zero is treated as one)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the row cap for genre, year and actor searches
    pub fn with_result_limit(mut self, result_limit: usize) -> Self {
        self.result_limit = result_limit;
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn recorder(&self) -> &SearchRecorder {
        &self.recorder
    }

    /// One page of films whose title contains `pattern`
    ///
    /// Pages are zero-based. Only the first page is recorded; later pages
    /// continue a search that is already in the log.
    pub async fn by_title(&self, pattern: &str, page: usize) -> Result<Vec<TitleRow>> {
        let offset = page.saturating_mul(self.page_size);
        let rows = self
            .catalog
            .search_by_title(pattern, offset, self.page_size)
            .await?;

        if page == 0 {
            self.recorder
                .record(
                    SearchKind::Title.as_str(),
                    [("title", ParamValue::from(pattern))],
                    result_count(rows.len()),
                )
                .await?;
        } else {
            debug!("Title search '{}' page {} not recorded", pattern, page);
        }
        Ok(rows)
    }

    /// Films in a genre released within an inclusive year range
    ///
    /// `genre` is resolved with [`CatalogSearch::resolve_genre`] first.
    pub async fn by_genre_and_years(
        &self,
        genre: &str,
        from: i32,
        to: i32,
    ) -> Result<Vec<GenreYearRow>> {
        check_year_range(from, to)?;
        let genre = self.resolve_genre(genre).await?;
        let rows = self
            .catalog
            .search_by_genre_and_years(&genre, from, to, self.result_limit)
            .await?;

        self.recorder
            .record(
                SearchKind::GenreAndYears.as_str(),
                [
                    ("genre", ParamValue::from(genre)),
                    ("from", ParamValue::from(from)),
                    ("to", ParamValue::from(to)),
                ],
                result_count(rows.len()),
            )
            .await?;
        Ok(rows)
    }

    /// Films featuring an actor whose name contains `name`
    pub async fn by_actor(&self, name: &str) -> Result<Vec<ActorRow>> {
        let rows = self
            .catalog
            .search_by_actor(name, self.result_limit)
            .await?;

        self.recorder
            .record(
                SearchKind::Actor.as_str(),
                [("actor", ParamValue::from(name))],
                result_count(rows.len()),
            )
            .await?;
        Ok(rows)
    }

    /// Films in a genre, resolved like [`CatalogSearch::by_genre_and_years`]
    pub async fn by_genre(&self, genre: &str) -> Result<Vec<FilmRow>> {
        let genre = self.resolve_genre(genre).await?;
        let rows = self
            .catalog
            .search_by_genre(&genre, self.result_limit)
            .await?;

        self.recorder
            .record(
                SearchKind::Genre.as_str(),
                [("genre", ParamValue::from(genre))],
                result_count(rows.len()),
            )
            .await?;
        Ok(rows)
    }

    /// Films released within an inclusive year range
    pub async fn by_years(&self, from: i32, to: i32) -> Result<Vec<FilmRow>> {
        check_year_range(from, to)?;
        let rows = self
            .catalog
            .search_by_year_range(from, to, self.result_limit)
            .await?;

        self.recorder
            .record(
                SearchKind::Years.as_str(),
                [("from", ParamValue::from(from)), ("to", ParamValue::from(to))],
                result_count(rows.len()),
            )
            .await?;
        Ok(rows)
    }

    /// Every genre in the catalog, in catalog order
    pub async fn genres(&self) -> Result<Vec<String>> {
        self.catalog.list_genres().await
    }

    /// Resolve user genre input against the catalog's genre list
    ///
    /// Input made of digits is a 1-based position in [`CatalogSearch::genres`];
    /// anything else must equal a genre name ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an out-of-range position and `NotFound` for an
    /// unknown name.
    pub async fn resolve_genre(&self, input: &str) -> Result<String> {
        let input = input.trim();
        let genres = self.genres().await?;

        if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
            let position: usize = input.parse().map_err(|_| {
                CinelogError::validation(format!("genre number '{}' is too large", input))
            })?;
            return position
                .checked_sub(1)
                .and_then(|index| genres.get(index))
                .cloned()
                .ok_or_else(|| {
                    CinelogError::validation(format!(
                        "genre number {} is out of range 1..={}",
                        position,
                        genres.len()
                    ))
                });
        }

        let wanted = input.to_lowercase();
        let genre = genres
            .into_iter()
            .find(|g| g.to_lowercase() == wanted)
            .ok_or_else(|| CinelogError::not_found(format!("genre '{}'", input)))?;

        info!("Resolved genre input '{}' to '{}'", input, genre);
        Ok(genre)
    }
}
