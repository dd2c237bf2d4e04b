//! nbtidy - Notebook cleanup and LLM prompts for course repositories
//!
//! Entry point for the nbtidy CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use nbtidy::cli::{Cli, Commands};
use nbtidy::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Completions { shell } => {
            nbtidy::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            match command {
                Commands::Clean { root, keep_going } => {
                    nbtidy::cli::commands::clean_notebooks(&settings, root, keep_going)?;
                }
                Commands::Check { root } => {
                    nbtidy::cli::commands::check_notebooks(&settings, root)?;
                }
                Commands::Ask { prompt } => {
                    nbtidy::cli::commands::ask_prompt(&settings, &prompt).await?;
                }
                Commands::Config(config_cmd) => {
                    nbtidy::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
