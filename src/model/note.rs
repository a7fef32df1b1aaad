//! Relocated files and the note built from them.

use crate::vault;

/// One file placed in the attachments folder while processing an item.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Relocation {
    /// Name the file had in the input folder or mail message.
    pub original_name: String,
    /// `<run id>_<original name>`.
    pub target_name: String,
    /// Folder the file now lives in.
    pub folder: String,
    /// Size of the relocated content in bytes.
    pub size: u64,
}

impl Relocation {
    /// Vault path of the relocated file.
    pub fn target_path(&self) -> String {
        vault::join(&self.folder, &self.target_name)
    }

    /// Markup that embeds the file in a note.
    pub fn embed_link(&self) -> String {
        format!("![[{}]]", self.target_path())
    }
}

/// Note content under construction.
///
/// Text goes in as it is produced; embed links are held back and emitted
/// after all text, in relocation order.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    text: String,
    links: Vec<String>,
}

impl NoteDraft {
    /// Start a draft from rendered template text (may be empty).
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            text: template.into(),
            links: Vec::new(),
        }
    }

    /// Append a block of text, separated from existing content by a blank line.
    pub fn push_block(&mut self, block: &str) {
        let block = block.trim_end();
        if block.is_empty() {
            return;
        }
        if !self.text.trim_end().is_empty() {
            let trimmed = self.text.trim_end().len();
            self.text.truncate(trimmed);
            self.text.push_str("\n\n");
        } else {
            self.text.clear();
        }
        self.text.push_str(block);
    }

    /// Queue an embed link for a relocated file.
    pub fn push_link(&mut self, relocation: &Relocation) {
        self.links.push(relocation.embed_link());
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Final note content: text, a blank line, then one link per line.
    pub fn finish(self) -> String {
        let mut content = self.text;
        if !self.links.is_empty() {
            if !content.trim_end().is_empty() {
                let trimmed = content.trim_end().len();
                content.truncate(trimmed);
                content.push_str("\n\n");
            } else {
                content.clear();
            }
            content.push_str(&self.links.join("\n"));
        }
        content.push('\n');
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reloc(name: &str) -> Relocation {
        Relocation {
            original_name: name.to_string(),
            target_name: format!("abc12345_{name}"),
            folder: "_unsortiert/_files".to_string(),
            size: 3,
        }
    }

    #[test]
    fn test_embed_link() {
        assert_eq!(
            reloc("a.pdf").embed_link(),
            "![[_unsortiert/_files/abc12345_a.pdf]]"
        );
    }

    #[test]
    fn test_links_follow_text_in_order() {
        let mut draft = NoteDraft::new("---\ncreated: 2024-01-01\n---\n");
        draft.push_link(&reloc("a.pdf"));
        draft.push_block("# Hello\n\nBody");
        draft.push_link(&reloc("b.png"));

        let content = draft.finish();
        assert_eq!(
            content,
            "---\ncreated: 2024-01-01\n---\n\n# Hello\n\nBody\n\n\
             ![[_unsortiert/_files/abc12345_a.pdf]]\n\
             ![[_unsortiert/_files/abc12345_b.png]]\n"
        );
    }

    #[test]
    fn test_empty_template_has_no_leading_blank_lines() {
        let mut draft = NoteDraft::new("");
        draft.push_link(&reloc("a.pdf"));
        assert_eq!(draft.finish(), "![[_unsortiert/_files/abc12345_a.pdf]]\n");
    }
}
