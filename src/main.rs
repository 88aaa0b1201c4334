//! Cinelog - film catalog search with search analytics
//!
//! Searches a film catalog by title, genre, actor or release years and
//! records every search, then reports what people search for most.

use anyhow::Context;
use cinelog_cli::{
    execute_command, exit_code_for_error, AppContext, CliArgs, ConfigManager, GenresArgs,
    OutputFormatter, SearchArgs, StatsArgs,
};
use cinelog_core::CinelogError;
use cinelog_infra::{init_logger, LoggerConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "cinelog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Film catalog search with search analytics")]
#[command(long_about = r#"
Cinelog searches a film catalog and records every search it makes in a
search log. The stats command reads that log back: the most frequent search
types, the most searched titles, actors and genre/year ranges, and the most
recent distinct searches.

Backends are chosen in the configuration file: an in-memory or PostgreSQL
search log, and a built-in sample, fixture file or MySQL (sakila) catalog.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (json, yaml, pretty, compact, table)
    #[arg(short, long, global = true)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search(SearchArgs),

    /// List catalog genres
    Genres(GenresArgs),

    /// Show search analytics
    Stats(StatsArgs),

    /// Show version information
    Version,

    /// Check that the configured stores are reachable
    Health,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        error!("{:#}", err);
        eprintln!("Error: {:#}", err);
        let code = err
            .downcast_ref::<CinelogError>()
            .map(exit_code_for_error)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    cinelog_cli::init()?;

    let mut manager = ConfigManager::new();
    manager
        .load_default_cli_config()
        .context("Failed to read CLI configuration")?;
    manager.merge_with_args(&CliArgs {
        output_format: cli.output.clone(),
        use_colors: cinelog_cli::is_ci().then_some(false),
        config_file: cli.config.clone(),
    })?;

    let config = manager
        .load_cinelog_config(None)
        .context("Failed to load configuration")?
        .clone();

    let mut logger = LoggerConfig::from_logging(&config.logging).with_env_overrides()?;
    if cli.verbose {
        logger.level = "debug".to_string();
    }
    init_logger(logger)?;

    info!("Starting Cinelog v{}", env!("CARGO_PKG_VERSION"));
    let mut out = OutputFormatter::new(manager.cli_config());

    match cli.command {
        Commands::Version => {
            out.message(&cinelog_core::version_info())?;
        }
        Commands::Health => {
            let status = cinelog_cli::report_health(&config, &mut out).await?;
            if !status.is_healthy() {
                return Err(CinelogError::store_unavailable(
                    "configured",
                    "one or more stores are unreachable",
                )
                .into());
            }
        }
        Commands::Search(ref args) => {
            let ctx = connect(&config).await?;
            execute_command(args, &ctx, &mut out).await?;
        }
        Commands::Genres(ref args) => {
            let ctx = connect(&config).await?;
            execute_command(args, &ctx, &mut out).await?;
        }
        Commands::Stats(ref args) => {
            let ctx = connect(&config).await?;
            execute_command(args, &ctx, &mut out).await?;
        }
    }

    info!("Cinelog completed successfully");
    Ok(())
}

async fn connect(config: &cinelog_core::CinelogConfig) -> anyhow::Result<AppContext> {
    Ok(AppContext::connect(config).await?)
}
