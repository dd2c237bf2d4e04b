//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// nbtidy - Strip notebook outputs and ask cloud LLMs from the terminal
#[derive(Parser, Debug)]
#[command(name = "nbtidy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Strip outputs, execution counts and metadata from every notebook under a directory
    Clean {
        /// Directory to scan (defaults to clean.root from config)
        root: Option<PathBuf>,

        /// Keep going after a notebook fails and report failures at the end
        #[arg(short, long)]
        keep_going: bool,
    },

    /// List notebooks that still carry outputs or metadata, without changing them
    Check {
        /// Directory to scan (defaults to clean.root from config)
        root: Option<PathBuf>,
    },

    /// Send a prompt to the configured LLM provider
    Ask {
        /// Prompt text (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
