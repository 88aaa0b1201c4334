//! CLI commands module

use crate::context::AppContext;
use crate::output::OutputFormatter;
use cinelog_core::Result;

pub mod genres;
pub mod health;
pub mod search;
pub mod stats;

pub use genres::*;
pub use health::*;
pub use search::*;
pub use stats::*;

/// Base trait for CLI commands
#[allow(async_fn_in_trait)]
pub trait CliCommand {
    /// Execute the command
    async fn execute(&self, ctx: &AppContext, out: &mut OutputFormatter<'_>) -> Result<()>;

    /// Get command name for logging
    fn name(&self) -> &'static str;

    /// Validate command arguments
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Common command execution wrapper
pub async fn execute_command<T: CliCommand>(
    command: &T,
    ctx: &AppContext,
    out: &mut OutputFormatter<'_>,
) -> Result<()> {
    tracing::info!("Executing command: {}", command.name());

    command.validate()?;
    command.execute(ctx, out).await?;

    tracing::info!("Command {} completed successfully", command.name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use cinelog_core::config::CinelogConfig;
    use cinelog_core::CinelogError;

    struct TestCommand {
        valid: bool,
    }

    impl CliCommand for TestCommand {
        async fn execute(&self, _ctx: &AppContext, out: &mut OutputFormatter<'_>) -> Result<()> {
            out.message("ran")
        }

        fn name(&self) -> &'static str {
            "test"
        }

        fn validate(&self) -> Result<()> {
            if self.valid {
                Ok(())
            } else {
                Err(CinelogError::validation("bad arguments"))
            }
        }
    }

    #[tokio::test]
    async fn test_execute_command() {
        let ctx = AppContext::connect(&CinelogConfig::default()).await.unwrap();
        let mut output = Vec::new();
        {
            let mut out = OutputFormatter::with_writer(OutputFormat::Pretty, false, &mut output);
            execute_command(&TestCommand { valid: true }, &ctx, &mut out)
                .await
                .unwrap();
        }
        assert_eq!(String::from_utf8(output).unwrap(), "ran\n");
    }

    #[tokio::test]
    async fn test_invalid_command_does_not_run() {
        let ctx = AppContext::connect(&CinelogConfig::default()).await.unwrap();
        let mut output = Vec::new();
        {
            let mut out = OutputFormatter::with_writer(OutputFormat::Pretty, false, &mut output);
            let result = execute_command(&TestCommand { valid: false }, &ctx, &mut out).await;
            assert!(result.is_err());
        }
        assert!(output.is_empty());
    }
}
