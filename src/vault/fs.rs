//! [`Vault`] backed by a directory on disk.

use std::path::{Path, PathBuf};

use tracing::warn;

use super::{join, normalize, Entry, EntryKind, Vault};
use crate::error::{NotedropError, Result};

/// A vault rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Open a vault rooted at `root`. The directory must exist.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(NotedropError::FolderNotFound(root.display().to_string()));
        }
        Ok(Self { root })
    }

    /// The directory this vault is rooted at.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Express a path given on the command line relative to the vault root.
    ///
    /// Paths that exist on disk are resolved against the current directory;
    /// anything else is taken as already vault-relative.
    pub fn vault_path(&self, path: &Path) -> String {
        let root = std::fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone());
        let absolute = std::fs::canonicalize(path).ok();
        match absolute.as_deref().and_then(|p| p.strip_prefix(&root).ok()) {
            Some(relative) => relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            None => normalize(&path.to_string_lossy()),
        }
    }

    /// Absolute location of a vault path.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let normalized = normalize(path);
        if normalized.is_empty() {
            return self.root.clone();
        }
        normalized
            .split('/')
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

impl Vault for FsVault {
    fn list(&self, dir: &str) -> Result<Vec<Entry>> {
        let abs = self.resolve(dir);
        let read_dir = std::fs::read_dir(&abs).map_err(|e| NotedropError::io(dir, e))?;

        let mut entries = Vec::new();
        for item in read_dir {
            let item = item.map_err(|e| NotedropError::io(dir, e))?;
            let name = item.file_name().to_string_lossy().into_owned();
            // Follow symlinks so a linked folder is still treated as a folder.
            let kind = match std::fs::metadata(item.path()) {
                Ok(meta) if meta.is_dir() => EntryKind::Dir,
                Ok(_) => EntryKind::File,
                Err(e) => {
                    warn!(name = %name, error = %e, "Cannot read directory entry");
                    EntryKind::Unreadable
                }
            };
            entries.push(Entry {
                path: join(dir, &name),
                name,
                kind,
            });
        }
        Ok(entries)
    }

    fn kind(&self, path: &str) -> Option<EntryKind> {
        let meta = std::fs::metadata(self.resolve(path)).ok()?;
        Some(if meta.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        })
    }

    fn size(&self, path: &str) -> Option<u64> {
        std::fs::metadata(self.resolve(path))
            .ok()
            .filter(|meta| meta.is_file())
            .map(|meta| meta.len())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        std::fs::read(self.resolve(path)).map_err(|e| NotedropError::io(path, e))
    }

    fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        std::fs::write(self.resolve(path), data).map_err(|e| NotedropError::io(path, e))
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        let src = self.resolve(from);
        let dst = self.resolve(to);
        match std::fs::rename(&src, &dst) {
            Ok(()) => Ok(()),
            // Folders on different devices: fall back to copy + delete.
            Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
                std::fs::copy(&src, &dst).map_err(|e| NotedropError::io(from, e))?;
                std::fs::remove_file(&src).map_err(|e| NotedropError::io(from, e))
            }
            Err(e) => Err(NotedropError::io(from, e)),
        }
    }

    fn copy(&self, from: &str, to: &str) -> Result<()> {
        std::fs::copy(self.resolve(from), self.resolve(to))
            .map(|_| ())
            .map_err(|e| NotedropError::io(from, e))
    }

    fn remove(&self, path: &str) -> Result<()> {
        std::fs::remove_file(self.resolve(path)).map_err(|e| NotedropError::io(path, e))
    }

    fn create_dir_all(&self, path: &str) -> Result<()> {
        std::fs::create_dir_all(self.resolve(path)).map_err(|e| NotedropError::io(path, e))
    }
}
