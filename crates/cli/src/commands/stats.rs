//! Stats command for the search analytics views

use crate::commands::CliCommand;
use crate::config::OutputFormat;
use crate::context::AppContext;
use crate::output::OutputFormatter;
use clap::{Args, Subcommand};
use cinelog_core::analytics::{
    ActorCount, AnalyticsReport, GenreYearCount, LatestSearch, SearchTypeCount, TitleCount,
};
use cinelog_core::{CinelogError, Result};

/// Show what people search for
///
/// # Examples
///
/// ```bash
/// cinelog stats types
/// cinelog stats latest --limit 10
/// cinelog --output yaml stats all
/// ```
#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub view: StatsView,

    /// Rows per view (defaults to `analytics.default_limit`)
    #[arg(short, long, global = true)]
    pub limit: Option<usize>,
}

/// Which analytics view to show
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsView {
    /// Most frequent search types
    Types,
    /// Most frequent genre and year-range combinations
    Genres,
    /// Most searched titles
    Titles,
    /// Most searched actors
    Actors,
    /// Most recent distinct searches
    Latest,
    /// Every view from one read of the log
    All,
}

impl CliCommand for StatsArgs {
    async fn execute(&self, ctx: &AppContext, out: &mut OutputFormatter<'_>) -> Result<()> {
        let aggregator = &ctx.aggregator;
        let limit = self.limit.unwrap_or_else(|| aggregator.default_limit());

        match self.view {
            StatsView::Types => {
                let rows = aggregator.top_search_types(limit).await?;
                show_types(out, &rows)
            }
            StatsView::Genres => {
                let rows = aggregator.top_genre_year_queries(limit).await?;
                show_genre_years(out, &rows)
            }
            StatsView::Titles => {
                let rows = aggregator.top_title_queries(limit).await?;
                show_titles(out, &rows)
            }
            StatsView::Actors => {
                let rows = aggregator.top_actor_queries(limit).await?;
                show_actors(out, &rows)
            }
            StatsView::Latest => {
                let rows = aggregator.latest_distinct_searches(limit).await?;
                show_latest(out, &rows)
            }
            StatsView::All => {
                let report = aggregator.report(limit).await?;
                show_report(out, &report)
            }
        }
    }

    fn name(&self) -> &'static str {
        "stats"
    }

    fn validate(&self) -> Result<()> {
        if self.limit == Some(0) {
            return Err(CinelogError::validation("--limit must be greater than 0"));
        }
        Ok(())
    }
}

fn show_types(out: &mut OutputFormatter<'_>, rows: &[SearchTypeCount]) -> Result<()> {
    if out.format() != OutputFormat::Pretty {
        return out.output(&rows);
    }
    show_lines(
        out,
        "Top search types",
        rows.iter()
            .map(|r| format!("{:<20} {}", r.search_type, r.count))
            .collect(),
    )
}

fn show_genre_years(out: &mut OutputFormatter<'_>, rows: &[GenreYearCount]) -> Result<()> {
    if out.format() != OutputFormat::Pretty {
        return out.output(&rows);
    }
    show_lines(
        out,
        "Top genre and year searches",
        rows.iter()
            .map(|r| format!("{} {}-{}: {}", r.genre, r.from, r.to, r.count))
            .collect(),
    )
}

fn show_titles(out: &mut OutputFormatter<'_>, rows: &[TitleCount]) -> Result<()> {
    if out.format() != OutputFormat::Pretty {
        return out.output(&rows);
    }
    show_lines(
        out,
        "Top title searches",
        rows.iter()
            .map(|r| format!("{}: {}", r.title, r.count))
            .collect(),
    )
}

fn show_actors(out: &mut OutputFormatter<'_>, rows: &[ActorCount]) -> Result<()> {
    if out.format() != OutputFormat::Pretty {
        return out.output(&rows);
    }
    show_lines(
        out,
        "Top actor searches",
        rows.iter()
            .map(|r| format!("{}: {}", r.actor_name, r.count))
            .collect(),
    )
}

fn show_latest(out: &mut OutputFormatter<'_>, rows: &[LatestSearch]) -> Result<()> {
    if out.format() != OutputFormat::Pretty {
        return out.output(&rows);
    }
    show_lines(
        out,
        "Latest distinct searches",
        rows.iter()
            .map(|r| format!("{} [{}] -> {} results", r.search_type, r.params, r.count))
            .collect(),
    )
}

fn show_report(out: &mut OutputFormatter<'_>, report: &AnalyticsReport) -> Result<()> {
    match out.format() {
        OutputFormat::Pretty | OutputFormat::Table => {
            out.message(&format!(
                "{} searches recorded, report generated {}",
                report.total_events,
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ))?;
            out.message("")?;
            show_types(out, &report.top_search_types)?;
            out.message("")?;
            show_genre_years(out, &report.top_genre_year_queries)?;
            out.message("")?;
            show_titles(out, &report.top_title_queries)?;
            out.message("")?;
            show_actors(out, &report.top_actor_queries)?;
            out.message("")?;
            show_latest(out, &report.latest_distinct_searches)
        }
        _ => out.output(report),
    }
}

fn show_lines(out: &mut OutputFormatter<'_>, title: &str, lines: Vec<String>) -> Result<()> {
    out.heading(title)?;
    if lines.is_empty() {
        return out.info("No searches recorded");
    }
    for (i, line) in lines.iter().enumerate() {
        out.message(&format!("{:>3}. {}", i + 1, line))?;
    }
    Ok(())
}
