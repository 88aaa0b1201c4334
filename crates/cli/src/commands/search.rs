//! Search command for querying the film catalog
//!
//! Every search made here is recorded in the search log, so it shows up
//! in `cinelog stats` afterwards.

use crate::commands::CliCommand;
use crate::config::OutputFormat;
use crate::context::AppContext;
use crate::output::OutputFormatter;
use clap::{Args, Subcommand};
use cinelog_core::{CinelogError, Result};
use serde::Serialize;
use tracing::info;

/// Search the film catalog
///
/// # Examples
///
/// ```bash
/// # Titles containing "alien", second page
/// cinelog search title alien --page 1
///
/// # Dramas from the nineties
/// cinelog search genre-years drama 1990 1999
///
/// # Same genre given by its number in `cinelog genres`
/// cinelog search genre 4
///
/// # Films with Tom Hanks, as JSON
/// cinelog --output json search actor "tom hanks"
/// ```
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(subcommand)]
    pub by: SearchBy,
}

/// What to search by
#[derive(Subcommand, Debug, Clone)]
pub enum SearchBy {
    /// Films whose title contains the text
    Title {
        /// Text to look for, case-insensitive
        #[arg(value_name = "TEXT")]
        pattern: String,

        /// Zero-based page of results
        #[arg(short, long, default_value_t = 0)]
        page: usize,
    },

    /// Films in a genre released within a year range
    GenreYears {
        /// Genre name or its number from `cinelog genres`
        genre: String,

        /// First release year, inclusive
        from: i32,

        /// Last release year, inclusive
        to: i32,
    },

    /// Films featuring an actor
    Actor {
        /// Part of the actor's name, case-insensitive
        name: String,
    },

    /// Films in a genre
    Genre {
        /// Genre name or its number from `cinelog genres`
        genre: String,
    },

    /// Films released within a year range
    Years {
        /// First release year, inclusive
        from: i32,

        /// Last release year, inclusive
        to: i32,
    },
}

impl CliCommand for SearchArgs {
    async fn execute(&self, ctx: &AppContext, out: &mut OutputFormatter<'_>) -> Result<()> {
        let search = &ctx.search;

        match &self.by {
            SearchBy::Title { pattern, page } => {
                let rows = search.by_title(pattern, *page).await?;
                info!("Title search returned {} rows", rows.len());
                render(out, &rows, |r| r.title.clone())?;
                if out.format() == OutputFormat::Pretty && rows.len() == search.page_size() {
                    out.info(&format!(
                        "More results may follow: --page {}",
                        page.saturating_add(1)
                    ))?;
                }
            }
            SearchBy::GenreYears { genre, from, to } => {
                let rows = search.by_genre_and_years(genre, *from, *to).await?;
                render(out, &rows, |r| {
                    format!("{} ({}) [{}]", r.title, r.release_year, r.genre)
                })?;
            }
            SearchBy::Actor { name } => {
                let rows = search.by_actor(name).await?;
                render(out, &rows, |r| {
                    format!("{} ({}) with {}", r.title, r.release_year, r.actor_name)
                })?;
            }
            SearchBy::Genre { genre } => {
                let rows = search.by_genre(genre).await?;
                render(out, &rows, |r| format!("{} ({})", r.title, r.release_year))?;
            }
            SearchBy::Years { from, to } => {
                let rows = search.by_years(*from, *to).await?;
                render(out, &rows, |r| format!("{} ({})", r.title, r.release_year))?;
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<()> {
        let text = match &self.by {
            SearchBy::Title { pattern, .. } => pattern,
            SearchBy::Actor { name } => name,
            SearchBy::GenreYears { genre, .. } | SearchBy::Genre { genre } => genre,
            SearchBy::Years { .. } => return Ok(()),
        };

        if text.trim().is_empty() {
            return Err(CinelogError::validation("search text cannot be empty"));
        }
        Ok(())
    }
}

/// Numbered lines in pretty output, the formatter's rendering otherwise
fn render<T: Serialize>(
    out: &mut OutputFormatter<'_>,
    rows: &[T],
    line: impl Fn(&T) -> String,
) -> Result<()> {
    if out.format() != OutputFormat::Pretty {
        return out.output(&rows);
    }

    if rows.is_empty() {
        return out.info("No films found");
    }
    for (i, row) in rows.iter().enumerate() {
        out.message(&format!("{:>3}. {}", i + 1, line(row)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use cinelog_core::config::CinelogConfig;

    async fn run(by: SearchBy, format: OutputFormat) -> (Result<()>, String, AppContext) {
        let ctx = AppContext::connect(&CinelogConfig::default()).await.unwrap();
        let mut output = Vec::new();
        let result = {
            let mut out = OutputFormatter::with_writer(format, false, &mut output);
            crate::commands::execute_command(&SearchArgs { by }, &ctx, &mut out).await
        };
        (result, String::from_utf8(output).unwrap(), ctx)
    }

    #[tokio::test]
    async fn test_title_search_pretty() {
        let (result, output, ctx) = run(
            SearchBy::Title {
                pattern: "ALIEN".to_string(),
                page: 0,
            },
            OutputFormat::Pretty,
        )
        .await;

        result.unwrap();
        assert!(output.contains("  1. Alien"));
        assert!(output.contains("  2. Aliens"));

        let titles = ctx.aggregator.top_title_queries(5).await.unwrap();
        assert_eq!(titles[0].title, "alien");
    }

    #[tokio::test]
    async fn test_actor_search_json() {
        let (result, output, _) = run(
            SearchBy::Actor {
                name: "tom hanks".to_string(),
            },
            OutputFormat::Json,
        )
        .await;

        result.unwrap();
        let rows: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r["actor_name"] == "Tom Hanks"));
    }

    #[tokio::test]
    async fn test_unknown_genre_is_not_found() {
        let (result, output, ctx) = run(
            SearchBy::Genre {
                genre: "western".to_string(),
            },
            OutputFormat::Pretty,
        )
        .await;

        assert_matches!(result, Err(CinelogError::NotFound { .. }));
        assert!(output.is_empty());
        assert!(ctx.aggregator.top_search_types(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reversed_years_rejected() {
        let (result, _, _) =
            run(SearchBy::Years { from: 2000, to: 1990 }, OutputFormat::Pretty).await;
        assert_matches!(result, Err(CinelogError::Validation { .. }));
    }

    #[test]
    fn test_blank_text_rejected() {
        let args = SearchArgs {
            by: SearchBy::Actor {
                name: "  ".to_string(),
            },
        };
        assert!(args.validate().is_err());
    }

    #[tokio::test]
    async fn test_empty_result_message() {
        let (result, output, _) = run(
            SearchBy::Years { from: 1900, to: 1910 },
            OutputFormat::Pretty,
        )
        .await;

        result.unwrap();
        assert!(output.contains("No films found"));
    }
}
