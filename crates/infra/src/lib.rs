//! Cinelog Infrastructure Library
//!
//! Concrete adapters for the stores Cinelog talks to: a PostgreSQL log
//! store, a MySQL catalog, and factories that pick a backend from
//! configuration. Also hosts the shared logger setup.

use cinelog_core::catalog::{CatalogStore, FixtureCatalog};
use cinelog_core::config::{
    CatalogBackend, CatalogConfig, CinelogConfig, LogStoreBackend, LogStoreConfig,
};
use cinelog_core::store::{InMemoryLogStore, LogStore};
use cinelog_core::{CinelogError, Result};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub mod logger;
pub mod mysql_catalog;
pub mod postgres_log;
pub mod sql_error;

pub use logger::*;
pub use mysql_catalog::MySqlCatalog;
pub use postgres_log::PgLogStore;

/// Infrastructure version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn required_url<'a>(url: &'a Option<String>, section: &str) -> Result<&'a str> {
    url.as_deref()
        .ok_or_else(|| CinelogError::validation(format!("{}.url is not set", section)))
}

/// Open the configured log store
///
/// A PostgreSQL store gets its table created on first use.
pub async fn connect_log_store(config: &LogStoreConfig) -> Result<Arc<dyn LogStore>> {
    match config.backend {
        LogStoreBackend::Memory => {
            info!("Using in-memory log store; events are not kept after exit");
            Ok(Arc::new(InMemoryLogStore::new()))
        }
        LogStoreBackend::Postgres => {
            let url = required_url(&config.url, "log_store")?;
            let store = PgLogStore::connect(url, &config.table, config.max_connections).await?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
    }
}

fn open_fixture(config: &CatalogConfig) -> Result<FixtureCatalog> {
    match &config.fixture_path {
        Some(path) => FixtureCatalog::from_file(path),
        None => {
            info!("No fixture path configured, using the built-in sample catalog");
            Ok(FixtureCatalog::sample())
        }
    }
}

/// Open the configured catalog
pub async fn connect_catalog(config: &CatalogConfig) -> Result<Arc<dyn CatalogStore>> {
    match config.backend {
        CatalogBackend::Fixture => Ok(Arc::new(open_fixture(config)?)),
        CatalogBackend::Mysql => {
            let url = required_url(&config.url, "catalog")?;
            Ok(Arc::new(
                MySqlCatalog::connect(url, config.max_connections).await?,
            ))
        }
    }
}

/// Reachability of one external component
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub backend: String,
    pub accessible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    fn from_result(backend: &str, result: Result<()>) -> Self {
        match result {
            Ok(()) => Self {
                backend: backend.to_string(),
                accessible: true,
                error: None,
            },
            Err(e) => {
                warn!("{} health check failed: {}", backend, e);
                Self {
                    backend: backend.to_string(),
                    accessible: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Health status for infrastructure components
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub log_store: ComponentHealth,
    pub catalog: ComponentHealth,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.log_store.accessible && self.catalog.accessible
    }
}

async fn ping_postgres(config: &LogStoreConfig) -> Result<()> {
    let url = required_url(&config.url, "log_store")?;
    PgLogStore::connect(url, &config.table, 1).await?.ping().await
}

async fn ping_mysql(config: &CatalogConfig) -> Result<()> {
    let url = required_url(&config.url, "catalog")?;
    MySqlCatalog::connect(url, 1).await?.ping().await
}

/// Health check for infrastructure components
///
/// Never fails; each component's problem is captured in its entry.
pub async fn health_check(config: &CinelogConfig) -> HealthStatus {
    let log_store = match config.log_store.backend {
        LogStoreBackend::Memory => ComponentHealth::from_result("memory", Ok(())),
        LogStoreBackend::Postgres => {
            ComponentHealth::from_result("postgres", ping_postgres(&config.log_store).await)
        }
    };

    let catalog = match config.catalog.backend {
        CatalogBackend::Fixture => {
            ComponentHealth::from_result("fixture", open_fixture(&config.catalog).map(|_| ()))
        }
        CatalogBackend::Mysql => {
            ComponentHealth::from_result("mysql", ping_mysql(&config.catalog).await)
        }
    };

    HealthStatus { log_store, catalog }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_default_backends_connect() {
        let config = CinelogConfig::default();
        let store = connect_log_store(&config.log_store).await.unwrap();
        let catalog = connect_catalog(&config.catalog).await.unwrap();

        assert_eq!(store.backend(), "memory");
        assert_eq!(catalog.backend(), "fixture");
        assert!(!catalog.list_genres().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_postgres_without_url_rejected() {
        let config = LogStoreConfig {
            backend: LogStoreBackend::Postgres,
            ..Default::default()
        };
        let err = connect_log_store(&config).await.err().unwrap();
        assert_matches!(err, CinelogError::Validation { .. });
    }

    #[tokio::test]
    async fn test_fixture_catalog_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("films.yaml");
        FixtureCatalog::sample().to_file(&path).unwrap();

        let config = CatalogConfig {
            fixture_path: Some(path),
            ..Default::default()
        };
        let catalog = connect_catalog(&config).await.unwrap();
        assert_eq!(
            catalog.search_by_title("casablanca", 0, 10).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_health_check_defaults() {
        let status = health_check(&CinelogConfig::default()).await;
        assert!(status.is_healthy());
        assert_eq!(status.log_store.backend, "memory");
    }

    #[tokio::test]
    async fn test_health_check_reports_missing_fixture() {
        let mut config = CinelogConfig::default();
        config.catalog.fixture_path = Some("/nonexistent/films.yaml".into());

        let status = health_check(&config).await;
        assert!(!status.is_healthy());
        assert!(status.catalog.error.is_some());
    }
}
