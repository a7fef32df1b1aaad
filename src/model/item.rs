//! Entries discovered in the input folder.

use crate::vault::{self, Entry};

/// How an input file is handled, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// `.eml`: parsed into subject, body and attachments.
    Mail,
    /// `.md`: assumed to be a leftover note, never imported.
    Note,
    /// Anything else: moved as-is and embedded.
    Other,
}

impl ItemKind {
    /// Classify a file name by its extension (case-insensitive).
    pub fn classify(name: &str) -> Self {
        match vault::extension(name).map(str::to_ascii_lowercase).as_deref() {
            Some("eml") => Self::Mail,
            Some("md") => Self::Note,
            _ => Self::Other,
        }
    }
}

/// A file found by one scan of the input folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeItem {
    /// File name, including extension.
    pub name: String,
    /// Vault path of the source file.
    pub path: String,
    pub kind: ItemKind,
}

impl IntakeItem {
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            name: entry.name.clone(),
            path: entry.path.clone(),
            kind: ItemKind::classify(&entry.name),
        }
    }

    /// File name without extension.
    pub fn stem(&self) -> &str {
        vault::file_stem(&self.name)
    }
}
