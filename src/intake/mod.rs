//! Batch import of the input folder.
//!
//! One run lists the input folder once and handles every eligible file in
//! listing order: `.eml` files are split into a note plus attachments, other
//! files are moved and embedded, `.md` files are left alone. A failing item
//! is reported and the run moves on to the next one.

pub mod guard;
pub mod note;
pub mod pipeline;
pub mod relocate;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::i18n;
use crate::model::item::{IntakeItem, ItemKind};
use crate::model::note::Relocation;
use crate::notify::Notifier;
use crate::vault::{Entry, EntryKind, Vault};

/// Source of the current local time.
pub type Clock = fn() -> NaiveDateTime;

/// Source of run ids.
pub type IdSource = fn() -> String;

/// Current local date and time.
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Short random id: the first 8 hex digits of a UUID v4.
pub fn new_run_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Result of importing one file.
#[derive(Debug, Clone, Serialize)]
pub struct ItemOutcome {
    /// Name of the source file.
    pub source: String,
    pub kind: ItemKind,
    /// Vault path of the note written.
    pub note: String,
    /// Files placed in the attachments folder, in embed order.
    pub relocations: Vec<Relocation>,
}

/// A file that could not be imported.
#[derive(Debug, Clone, Serialize)]
pub struct ItemFailure {
    pub source: String,
    pub error: String,
}

/// Summary of one batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Items handed to a pipeline, including the ones that failed.
    pub processed: usize,
    /// Entries not eligible for import (folders, dot-files, notes).
    pub skipped: usize,
    pub failures: Vec<ItemFailure>,
    pub items: Vec<ItemOutcome>,
}

impl BatchReport {
    /// Total bytes placed in the attachments folder.
    pub fn bytes_relocated(&self) -> u64 {
        self.items
            .iter()
            .flat_map(|item| &item.relocations)
            .map(|r| r.size)
            .sum()
    }

    /// Vault paths of every note written.
    pub fn notes(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.note.as_str())
    }
}

/// Runs imports against a vault.
pub struct Intake<'a> {
    vault: &'a dyn Vault,
    config: &'a Config,
    notifier: &'a dyn Notifier,
    clock: Clock,
    ids: IdSource,
}

impl<'a> Intake<'a> {
    pub fn new(vault: &'a dyn Vault, config: &'a Config, notifier: &'a dyn Notifier) -> Self {
        Self {
            vault,
            config,
            notifier,
            clock: local_now,
            ids: new_run_id,
        }
    }

    /// Use a fixed clock (tests, reproducible runs).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Use a custom run id generator.
    pub fn with_id_source(mut self, ids: IdSource) -> Self {
        self.ids = ids;
        self
    }

    /// Import every eligible file of the input folder.
    ///
    /// Fails without touching any file if a configured folder (or the
    /// enabled template) is missing. Per-item failures are reported through
    /// the notifier and collected in the report. The progress callback
    /// receives `(current, total)` over all listed entries.
    pub fn run(&self, progress: Option<&dyn Fn(usize, usize)>) -> Result<BatchReport> {
        if let Err(e) = guard::check_folders(self.vault, self.config) {
            warn!(error = %e, "Import aborted");
            self.notifier.error(&e.notice());
            return Err(e);
        }

        let entries = self.vault.list(&self.config.folders.input)?;
        let total = entries.len();
        info!(input = %self.config.folders.input, entries = total, "Starting import");

        let mut report = BatchReport::default();
        for (i, entry) in entries.iter().enumerate() {
            if let Some(cb) = progress {
                cb(i, total);
            }

            let Some(item) = self.admit(entry) else {
                report.skipped += 1;
                continue;
            };

            let result = match item.kind {
                ItemKind::Mail => self.process_mail(&item),
                ItemKind::Other => self.process_file(&item),
                ItemKind::Note => {
                    debug!(path = %item.path, "Skipping note");
                    report.skipped += 1;
                    continue;
                }
            };
            report.processed += 1;

            match result {
                Ok(outcome) => report.items.push(outcome),
                Err(e) => {
                    warn!(file = %item.path, error = %e, "Import of file failed");
                    self.notifier.error(&format!(
                        "{} {}: {}",
                        i18n::err_item_failed(),
                        item.name,
                        e.notice()
                    ));
                    report.failures.push(ItemFailure {
                        source: item.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        if let Some(cb) = progress {
            cb(total, total);
        }

        info!(
            processed = report.processed,
            failed = report.failures.len(),
            skipped = report.skipped,
            "Import finished"
        );
        self.notifier.info(&format!(
            "{} {} {}",
            i18n::msg_processed(),
            report.processed,
            i18n::msg_files()
        ));
        Ok(report)
    }

    /// Decide whether a listed entry is imported.
    fn admit(&self, entry: &Entry) -> Option<IntakeItem> {
        match entry.kind {
            EntryKind::Dir => {
                debug!(path = %entry.path, "Skipping folder");
                return None;
            }
            EntryKind::Unreadable => {
                warn!(path = %entry.path, "Skipping unreadable entry");
                return None;
            }
            EntryKind::File => {}
        }
        if self.config.intake.ignore_dot_files && entry.name.starts_with('.') {
            debug!(path = %entry.path, "Skipping dot-file");
            return None;
        }
        Some(IntakeItem::from_entry(entry))
    }
}
