//! Centralized error types for notedrop.

use thiserror::Error;

use crate::i18n;

/// All errors produced by the notedrop library.
///
/// Paths are vault-relative, `/`-separated strings.
#[derive(Error, Debug)]
pub enum NotedropError {
    /// I/O error with the associated vault path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The path does not exist in the vault.
    #[error("File not found: {0}")]
    NotFound(String),

    /// A folder referenced by the configuration does not exist.
    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    /// The configured template file does not exist.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// The file could not be parsed as a mail message.
    #[error("Could not parse mail message: {0}")]
    MailParse(String),

    /// The note does not start with a `---` delimited header block.
    #[error("No frontmatter found in {0}")]
    NoFrontmatter(String),

    /// The frontmatter has no `created` key.
    #[error("No 'created' property in {0}")]
    NoCreatedDate(String),

    /// The `created` value is in neither `YYYY-MM-DD` nor `DD.MM.YYYY` form.
    #[error("Unrecognized 'created' date '{value}' in {path}")]
    UnrecognizedDate { path: String, value: String },

    /// A rename would replace an existing file.
    #[error("Target already exists: {0}")]
    TargetExists(String),

    /// The note name already carries the date prefix.
    #[error("Note is already prefixed with its date: {0}")]
    AlreadyPrefixed(String),
}

/// Convenience alias for `Result<T, NotedropError>`.
pub type Result<T> = std::result::Result<T, NotedropError>;

impl NotedropError {
    /// Create an `Io` variant from a path and an `io::Error`.
    ///
    /// `NotFound` errors are mapped to [`NotedropError::NotFound`].
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }

    /// Short localized text for a user-visible notification.
    pub fn notice(&self) -> String {
        match self {
            Self::Io { path, source } => format!("{} {path}: {source}", i18n::err_io()),
            Self::NotFound(path) => format!("{}: {path}", i18n::err_file_not_found()),
            Self::FolderNotFound(path) => format!("{}: {path}", i18n::err_folder_not_found()),
            Self::TemplateNotFound(path) => {
                format!("{}: {path}", i18n::err_template_not_found())
            }
            Self::MailParse(path) => format!("{}: {path}", i18n::err_mail_parse()),
            Self::NoFrontmatter(path) => format!("{}: {path}", i18n::err_no_frontmatter()),
            Self::NoCreatedDate(path) => format!("{}: {path}", i18n::err_no_created()),
            Self::UnrecognizedDate { path, value } => {
                format!("{} '{value}': {path}", i18n::err_bad_date())
            }
            Self::TargetExists(path) => format!("{}: {path}", i18n::err_target_exists()),
            Self::AlreadyPrefixed(path) => format!("{}: {path}", i18n::err_already_prefixed()),
        }
    }
}
