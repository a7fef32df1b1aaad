//! Note templates with `%date%` and `%id%` placeholders.

use chrono::NaiveDateTime;

use crate::config::Config;
use crate::error::{NotedropError, Result};
use crate::notify::Notifier;
use crate::vault::Vault;

/// Replaced with the local date and time, `YYYY-MM-DD HH:MM`.
pub const DATE_PLACEHOLDER: &str = "%date%";
/// Replaced with the run id of the item being imported.
pub const ID_PLACEHOLDER: &str = "%id%";

/// Template written into a fresh vault.
pub const STARTER_TEMPLATE: &str = "---\ncreated: %date%\nid: %id%\n---\n";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Substitute every placeholder in `template`. Unknown `%...%` tokens are
/// left alone.
pub fn render(template: &str, id: &str, now: NaiveDateTime) -> String {
    template
        .replace(DATE_PLACEHOLDER, &now.format(DATE_FORMAT).to_string())
        .replace(ID_PLACEHOLDER, id)
}

/// Load the configured template file and render it.
pub fn load(vault: &dyn Vault, config: &Config, id: &str, now: NaiveDateTime) -> Result<String> {
    let path = config.template.path(&config.folders);
    if !vault.is_file(&path) {
        return Err(NotedropError::TemplateNotFound(path));
    }
    let text = vault.read_to_string(&path)?;
    Ok(render(&text, id, now))
}

/// Rendered template text for a new note, or an empty string when templates
/// are disabled. A template that cannot be loaded is reported and replaced
/// by empty text so the import can go on.
pub fn load_or_empty(
    vault: &dyn Vault,
    config: &Config,
    notifier: &dyn Notifier,
    id: &str,
    now: NaiveDateTime,
) -> String {
    if !config.template.enabled {
        return String::new();
    }
    match load(vault, config, id, now) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "Template unavailable, continuing without it");
            notifier.warn(&e.notice());
            String::new()
        }
    }
}
