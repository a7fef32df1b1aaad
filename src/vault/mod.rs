//! Filesystem access for a note vault.
//!
//! All operations take vault-relative paths with `/` separators. The intake
//! pipeline and the rename routine only ever talk to a [`Vault`], so the
//! on-disk [`FsVault`] can be swapped for the in-memory [`MemoryVault`].

pub mod fs;
pub mod memory;

pub use self::fs::FsVault;
pub use self::memory::MemoryVault;

use crate::error::Result;

/// What a vault path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Listed but not readable, such as a link to a missing target.
    Unreadable,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Last path component.
    pub name: String,
    /// Full vault-relative path.
    pub path: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// File operations the pipeline needs from its host.
pub trait Vault {
    /// List the direct children of `dir` (non-recursive).
    fn list(&self, dir: &str) -> Result<Vec<Entry>>;

    /// Kind of the entry at `path`, or `None` if nothing is there.
    fn kind(&self, path: &str) -> Option<EntryKind>;

    /// Size of a file in bytes, or `None` if it is not a file.
    fn size(&self, path: &str) -> Option<u64>;

    /// Read the full content of a file.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Create or truncate a file. The parent folder must exist.
    fn write(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Move a file, replacing whatever is at `to`.
    fn rename(&self, from: &str, to: &str) -> Result<()>;

    /// Copy a file, replacing whatever is at `to`.
    fn copy(&self, from: &str, to: &str) -> Result<()>;

    /// Delete a file.
    fn remove(&self, path: &str) -> Result<()>;

    /// Create a folder and all missing parents.
    fn create_dir_all(&self, path: &str) -> Result<()>;

    fn exists(&self, path: &str) -> bool {
        self.kind(path).is_some()
    }

    fn is_file(&self, path: &str) -> bool {
        self.kind(path) == Some(EntryKind::File)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.kind(path) == Some(EntryKind::Dir)
    }

    /// Read a file as text, replacing invalid UTF-8.
    fn read_to_string(&self, path: &str) -> Result<String> {
        let bytes = self.read(path)?;
        Ok(String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
    }
}

/// Normalize a vault path: `\` becomes `/`, duplicate, leading and trailing
/// slashes and `.` components are dropped.
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a folder and a child name. An empty folder is the vault root.
pub fn join(dir: &str, name: &str) -> String {
    let dir = normalize(dir);
    let name = normalize(name);
    if dir.is_empty() {
        name
    } else {
        format!("{dir}/{name}")
    }
}

/// Last component of a path.
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Parent folder of a path (`""` for top-level entries).
pub fn parent(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(pos) => &trimmed[..pos],
        None => "",
    }
}

/// Split a file name into stem and extension.
///
/// A leading dot does not start an extension (`.hidden` has no extension),
/// and a trailing dot yields an empty one.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(pos) => (&name[..pos], Some(&name[pos + 1..])),
    }
}

/// File name without its extension.
pub fn file_stem(path: &str) -> &str {
    split_extension(file_name(path)).0
}

/// Non-empty extension of a file name, without the dot.
pub fn extension(path: &str) -> Option<&str> {
    split_extension(file_name(path)).1.filter(|ext| !ext.is_empty())
}
