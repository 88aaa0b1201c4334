//! Wiring of stores, recorder, search service and aggregator

use cinelog_core::analytics::{AggregatorConfig, AnalyticsAggregator, RecorderConfig, SearchRecorder};
use cinelog_core::catalog::{CatalogSearch, CatalogStore};
use cinelog_core::config::CinelogConfig;
use cinelog_core::store::LogStore;
use cinelog_core::Result;
use std::sync::Arc;
use tracing::info;

/// Everything a command needs to run
#[derive(Debug, Clone)]
pub struct AppContext {
    pub search: CatalogSearch,
    pub aggregator: AnalyticsAggregator,
}

impl AppContext {
    /// Build from already opened stores
    ///
    /// The recorder and the aggregator share `log_store`, so searches made
    /// through this context show up in its statistics.
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        log_store: Arc<dyn LogStore>,
        config: &CinelogConfig,
    ) -> Self {
        let recorder = SearchRecorder::with_config(
            Arc::clone(&log_store),
            RecorderConfig {
                debug: config.analytics.debug,
            },
        );
        let search = CatalogSearch::new(catalog, recorder)
            .with_page_size(config.catalog.page_size)
            .with_result_limit(config.catalog.result_limit);
        let aggregator = AnalyticsAggregator::new(
            log_store,
            AggregatorConfig {
                default_limit: config.analytics.default_limit,
                debug: config.analytics.debug,
            },
        );

        Self { search, aggregator }
    }

    /// Open the configured backends
    pub async fn connect(config: &CinelogConfig) -> Result<Self> {
        let log_store = cinelog_infra::connect_log_store(&config.log_store).await?;
        let catalog = cinelog_infra::connect_catalog(&config.catalog).await?;
        info!(
            "Using {} catalog with {} log store",
            catalog.backend(),
            log_store.backend()
        );
        Ok(Self::new(catalog, log_store, config))
    }
}
