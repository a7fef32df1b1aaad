//! Naming and writing of imported notes.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::relocate::sanitize_filename_part;
use crate::config::Config;
use crate::error::Result;
use crate::vault::{self, Vault};

/// Extension of note files.
pub const NOTE_EXTENSION: &str = "md";

/// `YYYY-MM-DD`, used for every date prefix.
pub const DATE_PREFIX_FORMAT: &str = "%Y-%m-%d";

/// Note file name for a source file: `<YYYY-MM-DD> <sanitized stem>.md`.
pub fn note_name(stem: &str, date: NaiveDate) -> String {
    format!(
        "{} {}.{NOTE_EXTENSION}",
        date.format(DATE_PREFIX_FORMAT),
        sanitize_filename_part(stem, 150)
    )
}

/// Vault path of the note for a source file.
pub fn note_path(config: &Config, stem: &str, date: NaiveDate) -> String {
    vault::join(&config.folders.notes, &note_name(stem, date))
}

/// Write a note, replacing any file already at `path`.
pub fn write_note(vault: &dyn Vault, path: &str, content: &str) -> Result<()> {
    if vault.exists(path) {
        debug!(path, "Replacing existing note");
        vault.remove(path)?;
    }
    vault.write(path, content.as_bytes())?;
    info!(path, bytes = content.len(), "Note written");
    Ok(())
}
