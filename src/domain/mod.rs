//! Core types: Note, Frontmatter, link and tag extraction, path safety

mod frontmatter;
mod link;
mod note;
mod tag;
mod validation;

pub use frontmatter::Frontmatter;
pub use link::{ExtractedLink, LinkKind, ParseLinkKindError, extract_links};
pub use note::{Note, file_stem, parent_folder, path_without_extension};
pub use tag::{MAX_TAG_LEN, extract_inline_tags, tags_from_note};
pub use validation::{
    PathError, normalize_note_path, normalize_vault_path, validate_folder,
};
