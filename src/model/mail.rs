//! Parsed mail message types.

use crate::vault;

/// Subject used when a message has none.
pub const NO_SUBJECT: &str = "No Subject";

/// A decoded file attached to a mail message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    /// Filename from the MIME headers. Generated if missing.
    pub filename: String,

    /// Decoded content.
    pub content: Vec<u8>,
}

impl MailAttachment {
    /// Only attachments whose name carries an extension are kept.
    ///
    /// Parts without one are usually inline signatures or calendar
    /// fragments; extensionless real files are dropped as well.
    pub fn has_extension(&self) -> bool {
        vault::extension(&self.filename).is_some()
    }
}

/// The parts of a mail message that end up in a note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMail {
    /// Decoded subject line, or [`NO_SUBJECT`].
    pub subject: String,

    /// Plain-text body (from `text/plain`, or stripped from HTML). May be empty.
    pub body: String,

    /// Attachments in message order.
    pub attachments: Vec<MailAttachment>,
}

impl ParsedMail {
    /// Attachments that qualify for relocation, in message order.
    pub fn real_attachments(&self) -> impl Iterator<Item = &MailAttachment> {
        self.attachments.iter().filter(|a| a.has_extension())
    }
}
