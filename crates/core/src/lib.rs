//! Cinelog Core Library
//!
//! Core functionality for Cinelog: searching a film catalog, recording every
//! search as a normalized event, and ranking the accumulated searches.
//!
//! Recording is best-effort and never fails a search. Statistics read the
//! whole log on every call and surface log store failures to the caller.

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use analytics::{
    AggregatorConfig, AnalyticsAggregator, AnalyticsReport, RecordOutcome, RecorderStats,
    SearchRecorder,
};
pub use catalog::{CatalogSearch, CatalogStore, FixtureCatalog};
pub use config::{CinelogConfig, LogFormat};
pub use error::{CinelogError, Result};
pub use store::{InMemoryLogStore, LogStore};
pub use types::{ParamValue, SearchEvent, SearchKind, SearchParams};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version info as a formatted string
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _: Result<()> = Ok(());
        let _kind = SearchKind::Title;
        let _params = SearchParams::new();
    }

    #[test]
    fn test_version_info() {
        let info = version_info();
        assert!(info.contains("cinelog-core"));
        assert!(info.contains("v"));
    }
}
