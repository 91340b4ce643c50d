//! TestWorld pattern for CLI integration tests.
//!
//! Provides:
//! - An isolated data directory per test
//! - Dataset files written from a `DatasetBuilder`
//! - CLI execution against that directory

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use toaster_index::Dataset;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use toaster_testing::{DatasetBuilder, TestWorld};
///
/// let mut data = DatasetBuilder::new();
/// data.project("demo", None);
///
/// let world = TestWorld::new().with_dataset(&data.finish());
/// let result = world.run(&["table", "projects"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
    env_vars: HashMap<String, String>,
    format: &'static str,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".toaster");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        Self {
            temp_dir,
            data_dir,
            env_vars: HashMap::new(),
            format: "json",
        }
    }

    /// Get the data directory path (.toaster).
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the temp directory root.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Output format passed to every command (`json` unless changed).
    pub fn with_format(mut self, format: &'static str) -> Self {
        self.format = format;
        self
    }

    /// Write `dataset` to a file and import it into the data directory.
    pub fn with_dataset(self, dataset: &Dataset) -> Self {
        let path = self.write_dataset("dataset.json", dataset);
        let path = path.to_string_lossy().to_string();
        let result = self.run(&["import", &path]).expect("Failed to run import");
        assert!(result.success(), "import failed: {}", result.stderr());
        self
    }

    /// Write `dataset` as JSON under the temp root and return its path.
    pub fn write_dataset(&self, name: &str, dataset: &Dataset) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let json = serde_json::to_string_pretty(dataset).expect("Failed to serialize dataset");
        std::fs::write(&path, json).expect("Failed to write dataset");
        path
    }

    /// Write a `toaster.toml` into the data directory.
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(self.data_dir.join("toaster.toml"), toml).expect("Failed to write config");
        self
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--data-dir")
            .arg(self.data_dir())
            .arg("--format")
            .arg(self.format);

        cmd.current_dir(self.temp_dir.path());
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute a command using the `toaster` binary and return the result.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("toaster")
            .map_err(|e| anyhow::anyhow!("Failed to find toaster binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
