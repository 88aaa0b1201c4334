//! Genres command

use crate::commands::CliCommand;
use crate::config::OutputFormat;
use crate::context::AppContext;
use crate::output::OutputFormatter;
use clap::Args;
use cinelog_core::Result;
use serde::Serialize;

/// List catalog genres with the numbers `search` accepts in their place
#[derive(Args, Debug, Clone, Default)]
pub struct GenresArgs {}

#[derive(Serialize)]
struct NumberedGenre<'a> {
    number: usize,
    name: &'a str,
}

impl CliCommand for GenresArgs {
    async fn execute(&self, ctx: &AppContext, out: &mut OutputFormatter<'_>) -> Result<()> {
        let genres = ctx.search.genres().await?;

        if out.format() != OutputFormat::Pretty {
            let numbered: Vec<NumberedGenre<'_>> = genres
                .iter()
                .enumerate()
                .map(|(i, name)| NumberedGenre { number: i + 1, name })
                .collect();
            return out.output(&numbered);
        }

        if genres.is_empty() {
            return out.info("The catalog has no genres");
        }
        for (i, genre) in genres.iter().enumerate() {
            out.message(&format!("{:>3}. {}", i + 1, genre))?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "genres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::execute_command;
    use cinelog_core::config::CinelogConfig;

    async fn run(format: OutputFormat) -> String {
        let ctx = AppContext::connect(&CinelogConfig::default()).await.unwrap();
        let mut output = Vec::new();
        {
            let mut out = OutputFormatter::with_writer(format, false, &mut output);
            execute_command(&GenresArgs::default(), &ctx, &mut out)
                .await
                .unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_genres_numbered() {
        let output = run(OutputFormat::Pretty).await;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "  1. Action");
        assert_eq!(lines.len(), 7);
    }

    #[tokio::test]
    async fn test_genres_json() {
        let output = run(OutputFormat::Json).await;
        let rows: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
        assert_eq!(rows[3]["number"], 4);
        assert_eq!(rows[3]["name"], "Drama");
    }
}
