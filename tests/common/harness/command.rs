//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since not every test binary uses every helper
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Fluent wrapper around `assert_cmd::Command` for the `vault` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct VaultCommand {
    args: Vec<String>,
    config_home: Option<PathBuf>,
}

impl VaultCommand {
    /// Creates a new command for the `vault` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            config_home: None,
        }
    }

    /// Sets the `--dir` option to specify the vault directory.
    pub fn dir(self, path: &Path) -> Self {
        self.path_arg("--dir", path)
    }

    /// Sets the `--cache-dir` option.
    pub fn cache_dir(self, path: &Path) -> Self {
        self.path_arg("--cache-dir", path)
    }

    /// Points the config lookup (`XDG_CONFIG_HOME`) at `path`.
    pub fn config_home(mut self, path: &Path) -> Self {
        self.config_home = Some(path.to_path_buf());
        self
    }

    fn path_arg(mut self, flag: &str, path: &Path) -> Self {
        self.args.push(flag.to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("vault").expect("Failed to find vault binary");
        cmd.env_remove("VAULTKIT_LOG");
        if let Some(home) = &self.config_home {
            cmd.env("XDG_CONFIG_HOME", home);
        }
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `sync` command.
    pub fn sync(self) -> Self {
        self.args(["sync"])
    }

    /// Configures for the `ls` command.
    pub fn ls(self) -> Self {
        self.args(["ls"])
    }

    /// Configures for the `search` command with a query.
    pub fn search(self, query: &str) -> Self {
        self.args(["search", query])
    }

    /// Configures for the `tags` command.
    pub fn tags(self) -> Self {
        self.args(["tags"])
    }

    /// Configures for the `graph` command.
    pub fn graph(self) -> Self {
        self.args(["graph"])
    }

    // ===========================================
    // Format Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }

    /// Adds `--format paths` to the command.
    pub fn format_paths(self) -> Self {
        self.args(["--format", "paths"])
    }
}

impl Default for VaultCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        VaultCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_dirs() {
        let temp = TempDir::new().unwrap();
        let cmd = VaultCommand::new().dir(temp.path()).cache_dir(temp.path());
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], temp.path().to_string_lossy());
        assert_eq!(args[2], "--cache-dir");
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = VaultCommand::new().ls().format_json();
        let args = cmd.get_args();
        assert!(args.contains(&"ls".to_string()));
        assert!(args.contains(&"--format".to_string()));
        assert!(args.contains(&"json".to_string()));
    }
}
