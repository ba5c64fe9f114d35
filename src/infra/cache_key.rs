//! Stable per-vault cache file naming.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Number of hex characters of the path digest used in the file name.
const KEY_LEN: usize = 16;

/// Directory name under the per-user cache directory.
const CACHE_DIR_NAME: &str = "vaultkit";

/// Returns the absolute form of a vault root.
///
/// Symlinks are resolved when the directory exists so that two spellings of
/// the same vault share a cache.
pub fn absolute_vault_path(root: &Path) -> std::io::Result<PathBuf> {
    match root.canonicalize() {
        Ok(path) => Ok(path),
        Err(_) => std::path::absolute(root),
    }
}

/// Returns the first 16 hex characters of `sha256(absolute vault path)`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vaultkit::infra::vault_key;
///
/// let key = vault_key(Path::new("/home/me/vault"));
/// assert_eq!(key.len(), 16);
/// assert_eq!(key, vault_key(Path::new("/home/me/vault")));
/// ```
pub fn vault_key(absolute_root: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(absolute_root.to_string_lossy().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..KEY_LEN].to_string()
}

/// Returns the default per-user cache directory, if the platform has one.
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(CACHE_DIR_NAME))
}

/// Returns `<cache_dir>/<vault_key>.db`.
pub fn cache_file_path(cache_dir: &Path, absolute_root: &Path) -> PathBuf {
    cache_dir.join(format!("{}.db", vault_key(absolute_root)))
}
