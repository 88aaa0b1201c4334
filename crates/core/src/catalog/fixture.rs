//! In-memory catalog loaded from a YAML or JSON fixture
//!
//! ```yaml
//! films:
//!   - title: Casablanca
//!     release_year: 1942
//!     genres: [Drama, Romance]
//!     actors: [Humphrey Bogart, Ingrid Bergman]
//! ```

use super::{ActorRow, CatalogStore, FilmRow, GenreYearRow, TitleRow};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

/// One film in a fixture catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureFilm {
    pub title: String,
    pub release_year: i32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub actors: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    films: Vec<FixtureFilm>,
}

/// Catalog held entirely in memory
///
/// Results come back in fixture order.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalog {
    films: Vec<FixtureFilm>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn in_range(year: i32, from: i32, to: i32) -> bool {
    (from..=to).contains(&year)
}

impl FixtureCatalog {
    pub fn new(films: Vec<FixtureFilm>) -> Self {
        Self { films }
    }

    /// Load a fixture file, trying YAML first and then JSON
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let fixture: FixtureFile = match serde_yaml::from_str(&content) {
            Ok(fixture) => fixture,
            Err(_) => serde_json::from_str(&content)?,
        };

        info!(
            "Loaded {} films from fixture {}",
            fixture.films.len(),
            path.display()
        );
        Ok(Self::new(fixture.films))
    }

    /// Write the catalog back out as YAML
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(&FixtureFile {
            films: self.films.clone(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn films(&self) -> &[FixtureFilm] {
        &self.films
    }

    /// A small built-in catalog
    pub fn sample() -> Self {
        let film = |title: &str, year: i32, genres: &[&str], actors: &[&str]| FixtureFilm {
            title: title.to_string(),
            release_year: year,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            actors: actors.iter().map(|a| a.to_string()).collect(),
        };

        Self::new(vec![
            film(
                "Casablanca",
                1942,
                &["Drama", "Romance"],
                &["Humphrey Bogart", "Ingrid Bergman"],
            ),
            film(
                "Alien",
                1979,
                &["Horror", "Sci-Fi"],
                &["Sigourney Weaver", "Tom Skerritt"],
            ),
            film(
                "Aliens",
                1986,
                &["Action", "Sci-Fi"],
                &["Sigourney Weaver", "Michael Biehn"],
            ),
            film(
                "Sleepless in Seattle",
                1993,
                &["Comedy", "Romance"],
                &["Tom Hanks", "Meg Ryan"],
            ),
            film(
                "Forrest Gump",
                1994,
                &["Drama", "Romance"],
                &["Tom Hanks", "Robin Wright"],
            ),
            film(
                "You've Got Mail",
                1998,
                &["Comedy", "Romance"],
                &["Tom Hanks", "Meg Ryan"],
            ),
            film(
                "Cast Away",
                2000,
                &["Adventure", "Drama"],
                &["Tom Hanks", "Helen Hunt"],
            ),
        ])
    }
}

#[async_trait]
impl CatalogStore for FixtureCatalog {
    async fn search_by_title(
        &self,
        pattern: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<TitleRow>> {
        let rows: Vec<TitleRow> = self
            .films
            .iter()
            .filter(|f| contains_ci(&f.title, pattern))
            .skip(offset)
            .take(limit)
            .map(|f| TitleRow {
                title: f.title.clone(),
            })
            .collect();

        debug!(
            "Fixture title search '{}' (offset {}) matched {} rows",
            pattern,
            offset,
            rows.len()
        );
        Ok(rows)
    }

    async fn search_by_genre_and_years(
        &self,
        genre: &str,
        from: i32,
        to: i32,
        limit: usize,
    ) -> Result<Vec<GenreYearRow>> {
        Ok(self
            .films
            .iter()
            .filter(|f| in_range(f.release_year, from, to))
            .flat_map(|f| {
                f.genres
                    .iter()
                    .filter(|g| contains_ci(g, genre))
                    .map(move |g| GenreYearRow {
                        title: f.title.clone(),
                        release_year: f.release_year,
                        genre: g.clone(),
                    })
            })
            .take(limit)
            .collect())
    }

    async fn search_by_actor(&self, name: &str, limit: usize) -> Result<Vec<ActorRow>> {
        Ok(self
            .films
            .iter()
            .flat_map(|f| {
                f.actors
                    .iter()
                    .filter(|a| contains_ci(a, name))
                    .map(move |a| ActorRow {
                        title: f.title.clone(),
                        release_year: f.release_year,
                        actor_name: a.clone(),
                    })
            })
            .take(limit)
            .collect())
    }

    async fn search_by_genre(&self, genre: &str, limit: usize) -> Result<Vec<FilmRow>> {
        Ok(self
            .films
            .iter()
            .filter(|f| f.genres.iter().any(|g| contains_ci(g, genre)))
            .take(limit)
            .map(|f| FilmRow {
                title: f.title.clone(),
                release_year: f.release_year,
            })
            .collect())
    }

    async fn search_by_year_range(
        &self,
        from: i32,
        to: i32,
        limit: usize,
    ) -> Result<Vec<FilmRow>> {
        Ok(self
            .films
            .iter()
            .filter(|f| in_range(f.release_year, from, to))
            .take(limit)
            .map(|f| FilmRow {
                title: f.title.clone(),
                release_year: f.release_year,
            })
            .collect())
    }

    async fn list_genres(&self) -> Result<Vec<String>> {
        let genres: BTreeSet<&str> = self
            .films
            .iter()
            .flat_map(|f| f.genres.iter().map(String::as_str))
            .collect();
        Ok(genres.into_iter().map(str::to_string).collect())
    }

    fn backend(&self) -> &'static str {
        "fixture"
    }
}
