//! Precondition check run once before every import.

use tracing::info;

use crate::config::Config;
use crate::error::{NotedropError, Result};
use crate::i18n;
use crate::notify::Notifier;
use crate::template::STARTER_TEMPLATE;
use crate::vault::{self, Vault};

/// Folders every import needs, in the order they are checked.
pub fn required_folders(config: &Config) -> [&str; 4] {
    let f = &config.folders;
    [
        f.attachments.as_str(),
        f.input.as_str(),
        f.notes.as_str(),
        f.templates.as_str(),
    ]
}

/// Check that all configured folders exist, plus the template file when
/// templates are enabled. Stops at the first missing path.
pub fn check_folders(vault: &dyn Vault, config: &Config) -> Result<()> {
    for folder in required_folders(config) {
        if !vault.is_dir(folder) {
            return Err(NotedropError::FolderNotFound(vault::normalize(folder)));
        }
    }

    if config.template.enabled {
        let path = config.template.path(&config.folders);
        if !vault.is_file(&path) {
            return Err(NotedropError::TemplateNotFound(path));
        }
    }
    Ok(())
}

/// Every required folder that is missing, deduplicated, in check order.
pub fn missing_folders(vault: &dyn Vault, config: &Config) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for folder in required_folders(config) {
        let folder = vault::normalize(folder);
        if !vault.is_dir(&folder) && !missing.contains(&folder) {
            missing.push(folder);
        }
    }
    missing
}

/// Create every missing folder, and the starter template when templates are
/// enabled and the file is missing, so that [`check_folders`] passes.
pub fn prepare_vault(vault: &dyn Vault, config: &Config, notifier: &dyn Notifier) -> Result<()> {
    for folder in missing_folders(vault, config) {
        vault.create_dir_all(&folder)?;
        info!(folder = %folder, "Created folder");
        notifier.info(&format!("{}: {folder}", i18n::msg_created_folder()));
    }

    let template = config.template.path(&config.folders);
    if config.template.enabled && !vault.exists(&template) {
        vault.write(&template, STARTER_TEMPLATE.as_bytes())?;
        info!(path = %template, "Created template");
        notifier.info(&format!("{}: {template}", i18n::msg_created_template()));
    }

    check_folders(vault, config)
}
