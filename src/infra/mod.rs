//! File I/O, frontmatter parsing, cache file naming

mod cache_key;
pub mod frontmatter;
mod fs;

pub use cache_key::{absolute_vault_path, cache_file_path, default_cache_dir, vault_key};
pub use fs::{
    FsError, MAX_SCAN_DEPTH, ScannedFile, create_note_file, delete_note_file, read_note,
    read_note_file, scan_vault, write_note_file,
};
