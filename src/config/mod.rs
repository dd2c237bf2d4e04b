//! Configuration module for nbtidy
//!
//! Handles loading and managing application settings from TOML files.

mod settings;

pub use settings::{CleanSettings, LlmSettings, Settings};
