//! MySQL catalog over the sakila sample schema
//!
//! Films join categories through `film_category` and actors through
//! `film_actor`. Text filters are lowercased `LIKE` substring matches and
//! year filters use `BETWEEN`. Every query orders by `film_id` so paging
//! is stable.

use crate::sql_error::{like_pattern, map_sqlx_error, Operation};
use async_trait::async_trait;
use cinelog_core::catalog::{ActorRow, CatalogStore, FilmRow, GenreYearRow, TitleRow};
use cinelog_core::{CinelogError, Result};
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};
use std::time::Duration;
use tracing::{debug, info};

const STORE: &str = "catalog";

/// Catalog backed by a MySQL sakila database
#[derive(Clone)]
pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl std::fmt::Debug for MySqlCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlCatalog").finish_non_exhaustive()
    }
}

fn read_err(context: &str) -> impl Fn(sqlx::Error) -> CinelogError + '_ {
    move |e| map_sqlx_error(STORE, Operation::Read, context, e)
}

fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn get_string(row: &MySqlRow, column: &str) -> Result<String> {
    row.try_get(column)
        .map_err(|e| map_sqlx_error(STORE, Operation::Read, &format!("Failed to get {}", column), e))
}

fn get_year(row: &MySqlRow) -> Result<i32> {
    let year: i64 = row
        .try_get("release_year")
        .map_err(read_err("Failed to get release_year"))?;
    i32::try_from(year)
        .map_err(|_| CinelogError::query_failed(format!("release year {} out of range", year)))
}

fn film_row(row: &MySqlRow) -> Result<FilmRow> {
    Ok(FilmRow {
        title: get_string(row, "title")?,
        release_year: get_year(row)?,
    })
}

impl MySqlCatalog {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Connect a new pool
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .map_err(read_err("Failed to connect"))?;

        info!("Connected to MySQL catalog");
        Ok(Self::new(pool))
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(read_err("Ping failed"))?;
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MySqlCatalog {
    async fn search_by_title(
        &self,
        pattern: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<TitleRow>> {
        let query = r#"
            SELECT title
            FROM film
            WHERE LOWER(title) LIKE ?
            ORDER BY film_id
            LIMIT ? OFFSET ?
        "#;

        let rows = sqlx::query(query)
            .bind(like_pattern(pattern))
            .bind(limit_param(limit))
            .bind(limit_param(offset))
            .fetch_all(&self.pool)
            .await
            .map_err(read_err("Failed to search by title"))?;

        debug!("Title search '{}' returned {} rows", pattern, rows.len());
        rows.iter()
            .map(|row| {
                Ok(TitleRow {
                    title: get_string(row, "title")?,
                })
            })
            .collect()
    }

    async fn search_by_genre_and_years(
        &self,
        genre: &str,
        from: i32,
        to: i32,
        limit: usize,
    ) -> Result<Vec<GenreYearRow>> {
        let query = r#"
            SELECT f.title, CAST(f.release_year AS SIGNED) AS release_year, c.name AS genre
            FROM film f
            JOIN film_category fc ON f.film_id = fc.film_id
            JOIN category c ON fc.category_id = c.category_id
            WHERE LOWER(c.name) LIKE ? AND f.release_year BETWEEN ? AND ?
            ORDER BY f.film_id
            LIMIT ?
        "#;

        let rows = sqlx::query(query)
            .bind(like_pattern(genre))
            .bind(from)
            .bind(to)
            .bind(limit_param(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(read_err("Failed to search by genre and years"))?;

        rows.iter()
            .map(|row| {
                Ok(GenreYearRow {
                    title: get_string(row, "title")?,
                    release_year: get_year(row)?,
                    genre: get_string(row, "genre")?,
                })
            })
            .collect()
    }

    async fn search_by_actor(&self, name: &str, limit: usize) -> Result<Vec<ActorRow>> {
        let query = r#"
            SELECT f.title, CAST(f.release_year AS SIGNED) AS release_year,
                   CONCAT(a.first_name, ' ', a.last_name) AS actor_name
            FROM film f
            JOIN film_actor fa ON f.film_id = fa.film_id
            JOIN actor a ON fa.actor_id = a.actor_id
            WHERE LOWER(CONCAT(a.first_name, ' ', a.last_name)) LIKE ?
            ORDER BY f.film_id, a.actor_id
            LIMIT ?
        "#;

        let rows = sqlx::query(query)
            .bind(like_pattern(name))
            .bind(limit_param(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(read_err("Failed to search by actor"))?;

        rows.iter()
            .map(|row| {
                Ok(ActorRow {
                    title: get_string(row, "title")?,
                    release_year: get_year(row)?,
                    actor_name: get_string(row, "actor_name")?,
                })
            })
            .collect()
    }

    async fn search_by_genre(&self, genre: &str, limit: usize) -> Result<Vec<FilmRow>> {
        let query = r#"
            SELECT DISTINCT f.film_id, f.title, CAST(f.release_year AS SIGNED) AS release_year
            FROM film f
            JOIN film_category fc ON f.film_id = fc.film_id
            JOIN category c ON fc.category_id = c.category_id
            WHERE LOWER(c.name) LIKE ?
            ORDER BY f.film_id
            LIMIT ?
        "#;

        let rows = sqlx::query(query)
            .bind(like_pattern(genre))
            .bind(limit_param(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(read_err("Failed to search by genre"))?;

        rows.iter().map(film_row).collect()
    }

    async fn search_by_year_range(
        &self,
        from: i32,
        to: i32,
        limit: usize,
    ) -> Result<Vec<FilmRow>> {
        let query = r#"
            SELECT title, CAST(release_year AS SIGNED) AS release_year
            FROM film
            WHERE release_year BETWEEN ? AND ?
            ORDER BY film_id
            LIMIT ?
        "#;

        let rows = sqlx::query(query)
            .bind(from)
            .bind(to)
            .bind(limit_param(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(read_err("Failed to search by year range"))?;

        rows.iter().map(film_row).collect()
    }

    async fn list_genres(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT DISTINCT name FROM category ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(read_err("Failed to list genres"))?;

        let genres: Vec<String> = rows
            .iter()
            .map(|row| get_string(row, "name"))
            .collect::<Result<_>>()?;

        debug!("Catalog lists {} genres", genres.len());
        Ok(genres)
    }

    fn backend(&self) -> &'static str {
        "mysql"
    }
}
