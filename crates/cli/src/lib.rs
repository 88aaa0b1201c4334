//! Cinelog CLI Library
//!
//! Command-line interface components for searching the film catalog and
//! reading search analytics.

use cinelog_core::CinelogError;

pub mod commands;
pub mod config;
pub mod context;
pub mod output;

pub use commands::*;
pub use config::*;
pub use context::AppContext;
pub use output::*;

/// CLI version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the CLI environment
pub fn init() -> cinelog_core::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("Cinelog CLI encountered an error: {}", info);
    }));

    Ok(())
}

/// Check if running in CI environment
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Get the appropriate exit code for an error
pub fn exit_code_for_error(error: &CinelogError) -> i32 {
    match error {
        CinelogError::Validation { .. } | CinelogError::MalformedEvent { .. } => 2,
        CinelogError::NotFound { .. } => 3,
        CinelogError::StoreUnavailable { .. } => 5,
        _ => 1,
    }
}
