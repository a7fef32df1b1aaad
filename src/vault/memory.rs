//! In-memory [`Vault`] used by tests and dry runs.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use super::{file_name, join, normalize, parent, Entry, EntryKind, Vault};
use crate::error::{NotedropError, Result};

#[derive(Debug, Default)]
struct Tree {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
}

impl Tree {
    fn kind(&self, path: &str) -> Option<EntryKind> {
        if path.is_empty() || self.dirs.contains(path) {
            Some(EntryKind::Dir)
        } else if self.files.contains_key(path) {
            Some(EntryKind::File)
        } else {
            None
        }
    }

    fn require_parent(&self, path: &str) -> Result<()> {
        let dir = parent(path);
        if self.kind(dir) == Some(EntryKind::Dir) {
            Ok(())
        } else {
            Err(NotedropError::NotFound(dir.to_string()))
        }
    }

    fn add_dirs(&mut self, path: &str) {
        let mut current = String::new();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            current = join(&current, part);
            self.dirs.insert(current.clone());
        }
    }
}

/// A vault that lives entirely in memory. Listings are in lexical order.
#[derive(Debug, Default)]
pub struct MemoryVault {
    tree: Mutex<Tree>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent folders.
    pub fn with_file(self, path: &str, data: impl AsRef<[u8]>) -> Self {
        {
            let mut tree = self.lock();
            let path = normalize(path);
            tree.add_dirs(parent(&path));
            tree.files.insert(path, data.as_ref().to_vec());
        }
        self
    }

    /// Add a folder and its parents.
    pub fn with_dir(self, path: &str) -> Self {
        self.lock().add_dirs(&normalize(path));
        self
    }

    /// Every file path, sorted.
    pub fn file_paths(&self) -> Vec<String> {
        self.lock().files.keys().cloned().collect()
    }

    /// Paths of all files directly inside `dir`, sorted.
    pub fn files_in(&self, dir: &str) -> Vec<String> {
        let dir = normalize(dir);
        self.lock()
            .files
            .keys()
            .filter(|path| parent(path) == dir)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Tree> {
        // A panic while holding the lock leaves the tree intact.
        self.tree.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Vault for MemoryVault {
    fn list(&self, dir: &str) -> Result<Vec<Entry>> {
        let dir = normalize(dir);
        let tree = self.lock();
        if tree.kind(&dir) != Some(EntryKind::Dir) {
            return Err(NotedropError::NotFound(dir));
        }

        let dirs = tree
            .dirs
            .iter()
            .filter(|path| parent(path) == dir)
            .map(|path| (path, EntryKind::Dir));
        let files = tree
            .files
            .keys()
            .filter(|path| parent(path) == dir)
            .map(|path| (path, EntryKind::File));

        let mut entries: Vec<Entry> = dirs
            .chain(files)
            .map(|(path, kind)| Entry {
                name: file_name(path).to_string(),
                path: path.clone(),
                kind,
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn kind(&self, path: &str) -> Option<EntryKind> {
        self.lock().kind(&normalize(path))
    }

    fn size(&self, path: &str) -> Option<u64> {
        self.lock()
            .files
            .get(&normalize(path))
            .map(|data| data.len() as u64)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let path = normalize(path);
        self.lock()
            .files
            .get(&path)
            .cloned()
            .ok_or(NotedropError::NotFound(path))
    }

    fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let path = normalize(path);
        let mut tree = self.lock();
        tree.require_parent(&path)?;
        tree.files.insert(path, data.to_vec());
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        let (from, to) = (normalize(from), normalize(to));
        let mut tree = self.lock();
        tree.require_parent(&to)?;
        let data = tree
            .files
            .remove(&from)
            .ok_or_else(|| NotedropError::NotFound(from.clone()))?;
        tree.files.insert(to, data);
        Ok(())
    }

    fn copy(&self, from: &str, to: &str) -> Result<()> {
        let (from, to) = (normalize(from), normalize(to));
        let mut tree = self.lock();
        tree.require_parent(&to)?;
        let data = tree
            .files
            .get(&from)
            .cloned()
            .ok_or(NotedropError::NotFound(from))?;
        tree.files.insert(to, data);
        Ok(())
    }

    fn remove(&self, path: &str) -> Result<()> {
        let path = normalize(path);
        match self.lock().files.remove(&path) {
            Some(_) => Ok(()),
            None => Err(NotedropError::NotFound(path)),
        }
    }

    fn create_dir_all(&self, path: &str) -> Result<()> {
        self.lock().add_dirs(&normalize(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_direct_children_only() {
        let vault = MemoryVault::new()
            .with_file("in/b.pdf", b"b")
            .with_file("in/sub/deep.txt", b"d")
            .with_file("in/a.eml", b"a");

        let entries = vault.list("in").unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.eml", "b.pdf", "sub"]);
        assert!(entries[2].is_dir());
    }

    #[test]
    fn test_write_requires_parent() {
        let vault = MemoryVault::new();
        assert!(matches!(
            vault.write("missing/x.md", b""),
            Err(NotedropError::NotFound(ref p)) if p == "missing"
        ));
        vault.write("root.md", b"ok").unwrap();
        assert!(vault.is_file("root.md"));
    }

    #[test]
    fn test_rename_and_copy() {
        let vault = MemoryVault::new()
            .with_file("in/a.pdf", b"pdf")
            .with_dir("out");
        vault.copy("in/a.pdf", "out/c.pdf").unwrap();
        vault.rename("in/a.pdf", "out/m.pdf").unwrap();
        assert!(!vault.exists("in/a.pdf"));
        assert_eq!(vault.read("out/c.pdf").unwrap(), b"pdf");
        assert_eq!(vault.read("out/m.pdf").unwrap(), b"pdf");
        assert!(vault.rename("in/a.pdf", "out/z.pdf").is_err());
    }

    #[test]
    fn test_list_missing_dir_is_not_found() {
        let vault = MemoryVault::new();
        assert!(matches!(vault.list("nope"), Err(NotedropError::NotFound(_))));
    }
}
