//! Per-item pipelines: mail messages and plain files.

use tracing::{debug, info};

use super::note::{note_path, write_note};
use super::relocate::Relocator;
use super::{Intake, ItemOutcome};
use crate::error::Result;
use crate::model::item::IntakeItem;
use crate::model::note::NoteDraft;
use crate::parser::mime;
use crate::template;

impl Intake<'_> {
    /// Import an `.eml` file.
    ///
    /// Attachments with an extension are written to the attachments folder.
    /// The message itself is copied there when `attach_original_mail` is set
    /// and removed from the input folder when `delete_original_mail` is set.
    /// Nothing is rolled back if a later step fails.
    pub(super) fn process_mail(&self, item: &IntakeItem) -> Result<ItemOutcome> {
        let run_id = (self.ids)();
        let now = (self.clock)();
        let intake = &self.config.intake;

        let raw = self.vault.read(&item.path)?;
        let mail = mime::parse_mail(&raw, &item.path)?;
        debug!(
            file = %item.path,
            subject = %mail.subject,
            attachments = mail.attachments.len(),
            "Parsed mail"
        );

        let mut draft = NoteDraft::new(template::load_or_empty(
            self.vault,
            self.config,
            self.notifier,
            &run_id,
            now,
        ));
        draft.push_block(&format!("# {}\n\n{}", mail.subject, mail.body));

        let mut relocator =
            Relocator::new(self.vault, &self.config.folders.attachments, &run_id);
        let ignored = mail.attachments.len() - mail.real_attachments().count();
        if ignored > 0 {
            debug!(file = %item.path, ignored, "Ignoring attachments without extension");
        }
        for attachment in mail.real_attachments() {
            relocator.write(&attachment.filename, &attachment.content)?;
        }

        if intake.attach_original_mail {
            relocator.copy_file(&item.path, &item.name)?;
        }
        if intake.delete_original_mail {
            self.vault.remove(&item.path)?;
            debug!(file = %item.path, "Deleted original mail");
        }

        self.finish(item, draft, relocator, now)
    }

    /// Import any other file: move it to the attachments folder and embed it.
    pub(super) fn process_file(&self, item: &IntakeItem) -> Result<ItemOutcome> {
        let run_id = (self.ids)();
        let now = (self.clock)();

        let mut relocator =
            Relocator::new(self.vault, &self.config.folders.attachments, &run_id);
        relocator.move_file(&item.path, &item.name)?;

        let draft = NoteDraft::new(template::load_or_empty(
            self.vault,
            self.config,
            self.notifier,
            &run_id,
            now,
        ));

        self.finish(item, draft, relocator, now)
    }

    /// Append the embed links and write the note.
    fn finish(
        &self,
        item: &IntakeItem,
        mut draft: NoteDraft,
        relocator: Relocator<'_>,
        now: chrono::NaiveDateTime,
    ) -> Result<ItemOutcome> {
        let relocations = relocator.into_records();
        for relocation in &relocations {
            draft.push_link(relocation);
        }

        let path = note_path(self.config, item.stem(), now.date());
        write_note(self.vault, &path, &draft.finish())?;
        info!(source = %item.name, note = %path, attachments = relocations.len(), "Imported file");

        Ok(ItemOutcome {
            source: item.name.clone(),
            kind: item.kind,
            note: path,
            relocations,
        })
    }
}
