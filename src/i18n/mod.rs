//! Internationalization (i18n) module.
//!
//! Provides localized strings for notifications and CLI output.
//! English is the default language; German is available as an alternative.

use std::sync::atomic::{AtomicU8, Ordering};

static CURRENT_LANG: AtomicU8 = AtomicU8::new(Lang::En as u8);

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Lang {
    /// English (default)
    En,
    /// German
    De,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "de", "en_US", "de_AT").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-', '.']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "de" => Some(Self::De),
            _ => None,
        }
    }

    /// Return the ISO 639-1 code for this language.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
        }
    }
}

/// Set the global language. The last call wins.
pub fn set_lang(lang: Lang) {
    CURRENT_LANG.store(lang as u8, Ordering::Relaxed);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        x if x == Lang::De as u8 => Lang::De,
        _ => Lang::En,
    }
}

/// Detect language from `NOTEDROP_LANG`, `LC_MESSAGES` or `LANG`.
pub fn detect_system_lang() -> Lang {
    ["NOTEDROP_LANG", "LC_MESSAGES", "LANG"]
        .iter()
        .find_map(|var| std::env::var(var).ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Macro for defining translatable message functions.
/// Each function returns a `&'static str` based on the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $de:expr) => {
        /// Returns a localized string for the current language.
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::De => $de,
            }
        }
    };
}

// ── General ──────────────────────────────────────────────────────

msg!(
    app_about,
    "notedrop \u{2014} Turn files and emails dropped into an input folder into linked markdown notes.",
    "notedrop \u{2014} Macht aus Dateien und E-Mails im Eingangsordner verlinkte Markdown-Notizen."
);
msg!(
    app_long_about,
    "notedrop \u{2014} Turn files and emails dropped into an input folder into linked markdown notes.\nAttachments are moved into the attachment folder and embedded in a new note;\nexisting notes can be renamed with the date from their 'created' property.",
    "notedrop \u{2014} Macht aus Dateien und E-Mails im Eingangsordner verlinkte Markdown-Notizen.\nAnh\u{e4}nge werden in den Anhangsordner verschoben und in eine neue Notiz eingebettet;\nbestehende Notizen k\u{f6}nnen nach ihrer 'created'-Eigenschaft umbenannt werden."
);

// ── CLI help strings ─────────────────────────────────────────────

msg!(
    help_cmd_import,
    "Import every file in the input folder as a note",
    "Alle Dateien im Eingangsordner als Notizen importieren"
);
msg!(
    help_cmd_rename,
    "Prefix notes with the date from their 'created' property",
    "Notizen mit dem Datum ihrer 'created'-Eigenschaft pr\u{e4}fixieren"
);
msg!(
    help_cmd_init,
    "Create the configured folders and a vault config file",
    "Konfigurierte Ordner und eine Vault-Konfigurationsdatei anlegen"
);
msg!(
    help_cmd_config,
    "Show the effective configuration",
    "Wirksame Konfiguration anzeigen"
);
msg!(
    help_cmd_completions,
    "Generate shell completions",
    "Shell-Vervollst\u{e4}ndigungen erzeugen"
);
msg!(
    help_cmd_manpage,
    "Generate a man page",
    "Manpage erzeugen"
);

// ── Notifications ────────────────────────────────────────────────

msg!(msg_importing, "Importing", "Importiere");
msg!(msg_processed, "Processed", "Verarbeitet");
msg!(msg_files, "file(s)", "Datei(en)");
msg!(msg_failed, "failed", "fehlgeschlagen");
msg!(msg_skipped, "skipped", "\u{fc}bersprungen");
msg!(msg_note_created, "Note created", "Notiz erstellt");
msg!(msg_renamed, "Renamed", "Umbenannt");
msg!(msg_relocated, "Relocated", "Verschoben");
msg!(msg_created_folder, "Created folder", "Ordner angelegt");
msg!(msg_created_template, "Created template", "Vorlage angelegt");
msg!(msg_config_written, "Config written", "Konfiguration geschrieben");
msg!(msg_config_source, "Config source", "Konfigurationsquelle");
msg!(msg_defaults, "built-in defaults", "eingebaute Standardwerte");
msg!(
    msg_vault_ready,
    "All configured folders exist",
    "Alle konfigurierten Ordner existieren"
);

// ── Errors ───────────────────────────────────────────────────────

msg!(err_io, "I/O error on", "E/A-Fehler bei");
msg!(err_file_not_found, "File not found", "Datei nicht gefunden");
msg!(err_folder_not_found, "Folder not found", "Ordner nicht gefunden");
msg!(err_template_not_found, "Template not found", "Vorlage nicht gefunden");
msg!(
    err_mail_parse,
    "Could not parse mail message",
    "E-Mail konnte nicht gelesen werden"
);
msg!(err_item_failed, "Could not process", "Konnte nicht verarbeiten");
msg!(
    err_no_frontmatter,
    "No frontmatter found",
    "Kein Frontmatter gefunden"
);
msg!(
    err_no_created,
    "No 'created' property",
    "Keine 'created'-Eigenschaft"
);
msg!(
    err_bad_date,
    "Unrecognized 'created' date",
    "Unbekanntes 'created'-Datum"
);
msg!(
    err_already_prefixed,
    "Already prefixed with its date",
    "Bereits mit Datum versehen"
);
msg!(
    err_target_exists,
    "Target already exists",
    "Ziel existiert bereits"
);
msg!(err_rename_failed, "Could not rename", "Umbenennen fehlgeschlagen");
