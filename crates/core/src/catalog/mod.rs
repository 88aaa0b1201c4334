//! Catalog store abstraction
//!
//! The catalog is the searchable film collection. It owns its own query
//! language; this crate only calls it. Text filters match case-insensitive
//! substrings and year filters are inclusive on both ends. Pagination by
//! offset and limit is deterministic while the underlying data is unchanged.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod fixture;
pub mod search;

pub use fixture::{FixtureCatalog, FixtureFilm};
pub use search::CatalogSearch;

/// Row returned by a title search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRow {
    pub title: String,
}

/// Film with its release year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmRow {
    pub title: String,
    pub release_year: i32,
}

/// Row returned by a genre and year-range search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreYearRow {
    pub title: String,
    pub release_year: i32,
    pub genre: String,
}

/// Row returned by an actor search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRow {
    pub title: String,
    pub release_year: i32,
    pub actor_name: String,
}

/// Read-only film catalog
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Films whose title contains `pattern`
    async fn search_by_title(
        &self,
        pattern: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<TitleRow>>;

    /// Films in a genre matching `genre`, released between `from` and `to`
    async fn search_by_genre_and_years(
        &self,
        genre: &str,
        from: i32,
        to: i32,
        limit: usize,
    ) -> Result<Vec<GenreYearRow>>;

    /// Films featuring an actor whose full name contains `name`
    async fn search_by_actor(&self, name: &str, limit: usize) -> Result<Vec<ActorRow>>;

    /// Films in a genre matching `genre`
    async fn search_by_genre(&self, genre: &str, limit: usize) -> Result<Vec<FilmRow>>;

    /// Films released between `from` and `to`
    async fn search_by_year_range(&self, from: i32, to: i32, limit: usize)
        -> Result<Vec<FilmRow>>;

    /// Every genre name in the catalog
    async fn list_genres(&self) -> Result<Vec<String>>;

    /// Short backend name used in logs
    fn backend(&self) -> &'static str;
}
