//! Vault scanning and note file I/O with atomic writes.

use crate::domain::{Note, PathError, normalize_note_path};
use crate::infra::frontmatter;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tempfile::NamedTempFile;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Deepest directory level the scanner descends into.
pub const MAX_SCAN_DEPTH: usize = 20;

/// Errors during file system operations on notes.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("note file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("note already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error(transparent)]
    InvalidPath(#[from] PathError),

    #[error("permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("invalid encoding in {path}: {encoding}")]
    InvalidEncoding { path: PathBuf, encoding: String },
}

impl FsError {
    /// Creates an appropriate FsError from an io::Error.
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path: path.into() },
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists { path: path.into() },
            _ => FsError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

// ===========================================
// Scanner
// ===========================================

/// A Markdown file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Vault-relative path with `/` separators.
    pub path: String,
    /// Modification time in milliseconds since the Unix epoch.
    pub mtime: i64,
    /// Size in bytes.
    pub size: u64,
}

/// Scans a vault recursively for markdown (`.md`) files.
///
/// - Hidden files and directories (starting with `.`) are skipped, which
///   covers the host application's config folder.
/// - Symbolic links are never followed or reported, so link cycles cannot
///   stall the scan.
/// - Directories deeper than [`MAX_SCAN_DEPTH`] are not descended into.
/// - Entries that cannot be read or statted are skipped.
///
/// Results are ordered by path within each directory.
///
/// # Errors
///
/// Returns `FsError::NotFound` if the directory doesn't exist.
/// Returns `FsError::NotADirectory` if the path is not a directory.
pub fn scan_vault(root: &Path) -> Result<Vec<ScannedFile>, FsError> {
    if !root.exists() {
        return Err(FsError::NotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(FsError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let files = WalkDir::new(root)
        .follow_links(false)
        .max_depth(MAX_SCAN_DEPTH)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || (!is_hidden(e) && !e.path_is_symlink()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && has_md_extension(e))
        .filter_map(|e| scanned_file(root, &e))
        .collect();

    Ok(files)
}

fn scanned_file(root: &Path, entry: &DirEntry) -> Option<ScannedFile> {
    let path = relative_vault_path(root, entry.path())?;
    let metadata = match entry.metadata() {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::debug!(path = %path, error = %e, "skipping file without metadata");
            return None;
        }
    };
    let mtime = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX));

    Some(ScannedFile {
        path,
        mtime,
        size: metadata.len(),
    })
}

/// Converts an absolute path under `root` into a `/`-separated vault path.
///
/// Returns `None` for paths outside the root or with non-UTF-8 names.
fn relative_vault_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

fn has_md_extension(entry: &DirEntry) -> bool {
    entry.path().extension().is_some_and(|e| e == "md")
}

// ===========================================
// Reading
// ===========================================

/// Reads and parses a note from the vault.
///
/// `path` must already be a normalized vault path.
///
/// # Errors
///
/// Returns `FsError::NotFound` if the file doesn't exist.
/// Returns `FsError::PermissionDenied` if access is denied.
/// Returns `FsError::InvalidEncoding` if the file is not valid UTF-8.
pub fn read_note(root: &Path, path: &str) -> Result<Note, FsError> {
    let full_path = root.join(path);
    let content = read_text(&full_path)?;
    let parsed = frontmatter::parse(&content);
    Ok(Note::new(path, parsed.frontmatter, parsed.body))
}

/// Reads a file as UTF-8 text, rejecting UTF-16 and stripping a UTF-8 BOM.
fn read_text(path: &Path) -> Result<String, FsError> {
    let bytes = std::fs::read(path).map_err(|e| FsError::from_io(path, e))?;

    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(FsError::InvalidEncoding {
            path: path.into(),
            encoding: "UTF-16 LE detected (byte order mark FF FE); convert to UTF-8".into(),
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(FsError::InvalidEncoding {
            path: path.into(),
            encoding: "UTF-16 BE detected (byte order mark FE FF); convert to UTF-8".into(),
        });
    }

    let content = String::from_utf8(bytes).map_err(|e| FsError::InvalidEncoding {
        path: path.into(),
        encoding: format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
    })?;

    Ok(match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

// ===========================================
// File-mode CRUD
// ===========================================

/// Reads the raw content of a note.
///
/// # Errors
///
/// Returns `FsError::InvalidPath` before touching the disk if `path` is
/// unsafe, `FsError::NotFound` if the note does not exist.
pub fn read_note_file(root: &Path, path: &str) -> Result<String, FsError> {
    let path = normalize_note_path(path)?;
    read_text(&root.join(path))
}

/// Creates a new note, failing if one already exists at `path`.
///
/// Parent folders are created as needed. Returns the normalized path.
///
/// # Errors
///
/// Returns `FsError::InvalidPath` for unsafe paths and
/// `FsError::AlreadyExists` if the file is present.
pub fn create_note_file(root: &Path, path: &str, content: &str) -> Result<String, FsError> {
    let path = normalize_note_path(path)?;
    let full_path = root.join(&path);
    if full_path.exists() {
        return Err(FsError::AlreadyExists { path: full_path });
    }
    ensure_parent(&full_path)?;
    atomic_write(&full_path, content, false)?;
    Ok(path)
}

/// Writes a note, replacing any existing content. Returns the normalized
/// path.
///
/// # Errors
///
/// Returns `FsError::InvalidPath` for unsafe paths.
pub fn write_note_file(root: &Path, path: &str, content: &str) -> Result<String, FsError> {
    let path = normalize_note_path(path)?;
    let full_path = root.join(&path);
    ensure_parent(&full_path)?;
    atomic_write(&full_path, content, true)?;
    Ok(path)
}

/// Deletes a note. Returns the normalized path.
///
/// # Errors
///
/// Returns `FsError::InvalidPath` for unsafe paths and `FsError::NotFound`
/// if the file does not exist.
pub fn delete_note_file(root: &Path, path: &str) -> Result<String, FsError> {
    let path = normalize_note_path(path)?;
    let full_path = root.join(&path);
    std::fs::remove_file(&full_path).map_err(|e| FsError::from_io(&full_path, e))?;
    Ok(path)
}

fn ensure_parent(path: &Path) -> Result<(), FsError> {
    match path.parent() {
        Some(parent) if !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|e| FsError::from_io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Writes content via a temporary file and rename so readers never see a
/// partial note.
fn atomic_write(path: &Path, content: &str, overwrite: bool) -> Result<(), FsError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| FsError::Io {
        path: path.into(),
        source: e,
    })?;

    temp.write_all(content.as_bytes())
        .map_err(|e| FsError::Io {
            path: path.into(),
            source: e,
        })?;

    if overwrite {
        temp.persist(path).map_err(|e| FsError::AtomicWrite {
            path: path.into(),
            source: e.error,
        })?;
    } else {
        temp.persist_noclobber(path)
            .map_err(|e| FsError::from_io(path, e.error))?;
    }

    Ok(())
}
