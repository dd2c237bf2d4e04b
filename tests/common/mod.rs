use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

#[allow(dead_code)]
pub fn run_nbtidy(args: &[&str]) -> Output {
    TestEnv::new().run(args)
}

/// Isolated HOME/XDG directories plus a scratch workspace for notebooks.
#[allow(dead_code)]
pub struct TestEnv {
    home: TempDir,
    config: TempDir,
    pub workspace: TempDir,
}

#[allow(dead_code)]
impl TestEnv {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temporary HOME dir"),
            config: tempfile::tempdir().expect("create temporary XDG config dir"),
            workspace: tempfile::tempdir().expect("create temporary workspace dir"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_nbtidy"))
            .args(args)
            .current_dir(self.workspace.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env_remove("NBTIDY_GEMINI_API_KEY")
            .env_remove("GEMINI_API_KEY")
            .env_remove("AWS_BEARER_TOKEN_BEDROCK")
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to execute nbtidy binary")
    }

    #[allow(dead_code)]
    pub fn path(&self, relative: &str) -> PathBuf {
        self.workspace.path().join(relative)
    }

    #[allow(dead_code)]
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directory");
        }
        std::fs::write(&path, contents).expect("write workspace file");
        path
    }

    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        let output = self.run(&["config", "path"]);
        assert!(
            output.status.success(),
            "config path should succeed\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );

        let path = String::from_utf8_lossy(&output.stdout);
        PathBuf::from(path.trim())
    }

    #[allow(dead_code)]
    pub fn write_config(&self, contents: &str) {
        let config_path = self.config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).expect("create config parent directory");
        }
        std::fs::write(&config_path, contents).expect("write config file");
    }
}

/// A notebook with outputs, an execution count and kernel metadata.
#[allow(dead_code)]
pub const DIRTY_NOTEBOOK: &str = r#"{
  "cells": [
    {
      "cell_type": "code",
      "execution_count": 3,
      "metadata": {"scrolled": true},
      "outputs": [{"data": {"text/plain": ["4"]}, "execution_count": 3, "metadata": {}, "output_type": "execute_result"}],
      "source": ["2 + 2"]
    }
  ],
  "metadata": {"kernelspec": {"name": "python3", "display_name": "Python 3", "language": "python"}},
  "nbformat": 4,
  "nbformat_minor": 5
}"#;

/// The cleaned rendering of [`DIRTY_NOTEBOOK`].
#[allow(dead_code)]
pub const CLEAN_NOTEBOOK: &str = "{\n \"cells\": [\n  {\n   \"cell_type\": \"code\",\n   \"execution_count\": null,\n   \"metadata\": {},\n   \"outputs\": [],\n   \"source\": [\n    \"2 + 2\"\n   ]\n  }\n ],\n \"metadata\": {},\n \"nbformat\": 4,\n \"nbformat_minor\": 5\n}\n";

#[allow(dead_code)]
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("read file")
}
