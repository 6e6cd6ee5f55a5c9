//! Directory listing for the post-extraction report.

use std::io;
use std::path::Path;

/// Kind of a listed entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    /// A directory.
    Directory,
    /// A regular file, symlink, or anything else.
    File,
}

/// One immediate child of a listed directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListedEntry {
    /// File name of the entry.
    pub name: String,
    /// Whether the entry is a directory.
    pub kind: EntryKind,
    /// Size in bytes as reported by the filesystem.
    pub size: u64,
}

impl ListedEntry {
    /// Returns true for directories.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// List the immediate entries of `dir`, sorted by name.
///
/// # Errors
///
/// Returns an error if the directory or any entry's metadata cannot be read.
pub fn list_directory(dir: &Path) -> io::Result<Vec<ListedEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        entries.push(ListedEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            kind,
            size: metadata.len(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
