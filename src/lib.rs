//! nbtidy - Keep course notebooks diff-friendly and ask cloud LLMs from the terminal
//!
//! Strips outputs, execution counts and metadata from Jupyter notebooks, and
//! wraps the Gemini and Bedrock text generation APIs behind one trait.

pub mod cli;
pub mod config;
pub mod llm;
pub mod notebook;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for nbtidy
#[derive(Error, Debug)]
pub enum NbtidyError {
    #[error("Failed to parse notebook {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize notebook {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl NbtidyError {
    /// Path of the notebook the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Parse { path, .. } | Self::Io { path, .. } | Self::Serialize { path, .. } => {
                path
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, NbtidyError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "nbtidy";
