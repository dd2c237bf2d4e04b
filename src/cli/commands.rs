//! CLI command implementations

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::llm::{ask, build_provider};
use crate::notebook::{discover_and_clean, discover_dirty, ErrorPolicy};

/// Clean every notebook under `root` (or the configured root)
pub fn clean_notebooks(
    settings: &Settings,
    root: Option<PathBuf>,
    keep_going: bool,
) -> Result<()> {
    let root = resolve_root(settings, root);
    let policy = if keep_going || settings.clean.keep_going {
        ErrorPolicy::KeepGoing
    } else {
        ErrorPolicy::Abort
    };

    tracing::debug!("Scanning {} ({:?})", root.display(), policy);

    let report = discover_and_clean(&root, policy, |path| {
        println!("Cleaned {}", path.display());
    })
    .with_context(|| format!("Failed to clean notebooks under {}", root.display()))?;

    if !report.is_success() {
        eprintln!();
        for err in &report.failed {
            eprintln!("Failed {}: {}", err.path().display(), err);
        }
        anyhow::bail!(
            "{} notebook(s) cleaned, {} failed",
            report.cleaned.len(),
            report.failed.len()
        );
    }

    Ok(())
}

/// Report notebooks that would change if cleaned
pub fn check_notebooks(settings: &Settings, root: Option<PathBuf>) -> Result<()> {
    let root = resolve_root(settings, root);

    let dirty = discover_dirty(&root)
        .with_context(|| format!("Failed to check notebooks under {}", root.display()))?;

    if dirty.is_empty() {
        println!("All notebooks under {} are clean", root.display());
        return Ok(());
    }

    for path in &dirty {
        println!("Needs cleaning: {}", path.display());
    }
    anyhow::bail!(
        "{} notebook(s) need cleaning; run `nbtidy clean {}`",
        dirty.len(),
        root.display()
    );
}

/// Send one prompt to the configured provider and print the answer
pub async fn ask_prompt(settings: &Settings, prompt: &[String]) -> Result<()> {
    let provider = build_provider(settings)?;

    eprintln!("Generating response...");
    let answer = ask(provider.as_ref(), &prompt.join(" "))
        .await
        .context("Error generating content")?;

    println!("{}", answer);
    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let mut shown = settings.clone();
            if !shown.llm.api_key.is_empty() {
                shown.llm.api_key = "********".to_string();
            }
            let toml = toml::to_string_pretty(&shown)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn resolve_root(settings: &Settings, root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| settings.clean.root.clone())
}

