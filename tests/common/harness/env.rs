//! Isolated test environment with temp directories.

use super::{TestNote, VaultCommand};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use vaultkit::index::{SyncStats, VaultCache};

/// Isolated test environment: a vault, a cache directory and an empty
/// config home, all cleaned up on drop.
pub struct TestEnv {
    _vault: TempDir,
    _cache: TempDir,
    _config: TempDir,
    vault_dir: PathBuf,
    cache_dir: PathBuf,
    config_home: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let vault = TempDir::new().expect("Failed to create vault directory");
        let cache = TempDir::new().expect("Failed to create cache directory");
        let config = TempDir::new().expect("Failed to create config directory");
        Self {
            vault_dir: vault.path().to_path_buf(),
            cache_dir: cache.path().to_path_buf(),
            config_home: config.path().to_path_buf(),
            _vault: vault,
            _cache: cache,
            _config: config,
        }
    }

    /// Returns the path to the vault directory.
    pub fn vault_dir(&self) -> &Path {
        &self.vault_dir
    }

    /// Returns the directory holding cache databases.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the cache database the CLI uses for this vault.
    pub fn cache_path(&self) -> PathBuf {
        VaultCache::cache_path_for(&self.vault_dir, Some(&self.cache_dir))
            .expect("Failed to compute cache path")
    }

    /// Adds a test note and returns its full path.
    pub fn add_note(&self, note: &TestNote) -> PathBuf {
        self.write_file(note.path(), &note.render())
    }

    /// Writes a file under the vault and returns its full path.
    pub fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.vault_dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create folder");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Pushes a file's modification time forward so the next sync sees it.
    pub fn touch_later(&self, rel: &str, secs: u64) {
        let file = std::fs::File::options()
            .write(true)
            .open(self.vault_dir.join(rel))
            .expect("Failed to open file");
        file.set_modified(SystemTime::now() + Duration::from_secs(secs))
            .expect("Failed to set mtime");
    }

    /// Writes the config file read by the CLI.
    pub fn write_config(&self, content: &str) {
        let dir = self.config_home.join("vaultkit");
        std::fs::create_dir_all(&dir).expect("Failed to create config dir");
        std::fs::write(dir.join("config.toml"), content).expect("Failed to write config");
    }

    /// Syncs the cache in-process, as the CLI would.
    pub fn sync(&self) -> Result<SyncStats> {
        let mut cache = VaultCache::open_for_vault(&self.vault_dir, Some(&self.cache_dir))?;
        Ok(cache.sync(&self.vault_dir)?)
    }

    /// Creates a command bound to this environment's vault and cache.
    pub fn cmd(&self) -> VaultCommand {
        self.bare_cmd().dir(&self.vault_dir).cache_dir(&self.cache_dir)
    }

    /// Creates a command with only the isolated config home set.
    pub fn bare_cmd(&self) -> VaultCommand {
        VaultCommand::new().config_home(&self.config_home)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_dirs_exist_and_differ() {
        let env = TestEnv::new();
        assert!(env.vault_dir().is_dir());
        assert!(env.cache_dir().is_dir());
        assert_ne!(env.vault_dir(), env.cache_dir());
    }

    #[test]
    fn test_env_add_note_creates_folders() {
        let env = TestEnv::new();
        let path = env.add_note(&TestNote::new("projects/alpha").title("Alpha"));
        assert!(path.exists());
        assert!(path.ends_with("projects/alpha.md"));
    }

    #[test]
    fn test_env_sync_writes_cache_file() {
        let env = TestEnv::new();
        env.add_note(&TestNote::new("a"));
        let stats = env.sync().unwrap();
        assert_eq!(stats.added, 1);
        assert!(env.cache_path().exists());
    }
}
