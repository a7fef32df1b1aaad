//! Place imported files in the attachments folder under collision-free names.

use tracing::debug;

use crate::error::Result;
use crate::model::note::Relocation;
use crate::vault::{self, Vault};

/// Characters that break file names or wiki links in a vault.
const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '#', '^', '[', ']'];

/// Longest file name stem kept when sanitizing.
const MAX_STEM_LEN: usize = 150;

/// Sanitize a string for use in file names.
///
/// Replaces reserved and control characters with `_`, trims surrounding
/// whitespace and truncates to `max_len` characters.
pub fn sanitize_filename_part(s: &str, max_len: usize) -> String {
    let sanitized: String = s
        .chars()
        .map(|c| {
            if c.is_control() || RESERVED.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .take(max_len)
        .collect();

    let trimmed = sanitized.trim();
    if trimmed.is_empty() {
        "unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sanitize a full file name, keeping its extension intact.
pub fn sanitize_file_name(name: &str) -> String {
    match vault::split_extension(name) {
        (stem, Some(ext)) if !ext.is_empty() => format!(
            "{}.{}",
            sanitize_filename_part(stem, MAX_STEM_LEN),
            sanitize_filename_part(ext, 16)
        ),
        _ => sanitize_filename_part(name, MAX_STEM_LEN),
    }
}

/// Name a relocated file gets: `<run id>_<sanitized original name>`.
pub fn target_name(run_id: &str, original: &str) -> String {
    format!("{run_id}_{}", sanitize_file_name(original))
}

/// `name` with `_<n>` inserted before its extension.
fn numbered_name(name: &str, n: usize) -> String {
    match vault::split_extension(name) {
        (stem, Some(ext)) if !ext.is_empty() => format!("{stem}_{n}.{ext}"),
        _ => format!("{name}_{n}"),
    }
}

/// Collects the files relocated for one intake item.
pub struct Relocator<'a> {
    vault: &'a dyn Vault,
    folder: &'a str,
    run_id: &'a str,
    records: Vec<Relocation>,
}

impl<'a> Relocator<'a> {
    pub fn new(vault: &'a dyn Vault, folder: &'a str, run_id: &'a str) -> Self {
        Self {
            vault,
            folder,
            run_id,
            records: Vec::new(),
        }
    }

    /// Write extracted content as a new file.
    pub fn write(&mut self, original: &str, data: &[u8]) -> Result<&Relocation> {
        let record = self.record(original, data.len() as u64);
        self.vault.write(&record.target_path(), data)?;
        Ok(self.push(record))
    }

    /// Move a file out of its current folder.
    pub fn move_file(&mut self, source: &str, original: &str) -> Result<&Relocation> {
        let size = self.vault.size(source).unwrap_or(0);
        let record = self.record(original, size);
        self.vault.rename(source, &record.target_path())?;
        Ok(self.push(record))
    }

    /// Copy a file, leaving the source in place.
    pub fn copy_file(&mut self, source: &str, original: &str) -> Result<&Relocation> {
        let size = self.vault.size(source).unwrap_or(0);
        let record = self.record(original, size);
        self.vault.copy(source, &record.target_path())?;
        Ok(self.push(record))
    }

    /// Files relocated so far, in order.
    pub fn records(&self) -> &[Relocation] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Relocation> {
        self.records
    }

    /// Build the record for `original`, numbering the target name while it
    /// clashes with an earlier relocation or a file already in the folder.
    fn record(&self, original: &str, size: u64) -> Relocation {
        let folder = vault::normalize(self.folder);
        let base = target_name(self.run_id, original);
        let mut name = base.clone();
        let mut n = 1;
        while self.is_taken(&folder, &name) {
            name = numbered_name(&base, n);
            n += 1;
        }
        if name != base {
            debug!(original, target = %name, "Target name taken, numbering");
        }
        Relocation {
            original_name: original.to_string(),
            target_name: name,
            folder,
            size,
        }
    }

    fn is_taken(&self, folder: &str, name: &str) -> bool {
        self.records.iter().any(|r| r.target_name == name)
            || self.vault.exists(&vault::join(folder, name))
    }

    fn push(&mut self, record: Relocation) -> &Relocation {
        debug!(
            from = %record.original_name,
            to = %record.target_path(),
            size = record.size,
            "Relocated file"
        );
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }
}
