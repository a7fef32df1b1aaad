//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$NOTEDROP_CONFIG` (environment variable)
//! 2. `<vault>/.notedrop.toml`
//! 3. `~/.config/notedrop/config.toml` (Linux/macOS)
//!    `%APPDATA%\notedrop\config.toml` (Windows)
//! 4. Built-in defaults
//!
//! Folder paths are relative to the vault root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::NotedropError;
use crate::vault;

/// File name of the per-vault configuration.
pub const VAULT_CONFIG_FILE: &str = ".notedrop.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Folder layout inside the vault.
    pub folders: FoldersConfig,
    /// Note template.
    pub template: TemplateConfig,
    /// Import behavior.
    pub intake: IntakeConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Language for notifications ("en", "de"). Defaults to system locale.
    pub lang: Option<String>,
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
}

/// Folder layout. Every folder must exist before an import runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldersConfig {
    /// Folder scanned for new files.
    pub input: String,
    /// Folder new notes are written to.
    pub notes: String,
    /// Folder relocated files and attachments end up in.
    pub attachments: String,
    /// Folder holding the note template.
    pub templates: String,
}

/// Note template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Prepend the rendered template to every new note.
    pub enabled: bool,
    /// Template file name inside the templates folder.
    pub filename: String,
}

/// Import behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Copy the `.eml` file itself into the attachments folder and embed it.
    pub attach_original_mail: bool,
    /// Delete the `.eml` file from the input folder once processed.
    pub delete_original_mail: bool,
    /// Skip input entries whose name starts with `.`.
    pub ignore_dot_files: bool,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            lang: None,
            cache_dir: None,
        }
    }
}

impl Default for FoldersConfig {
    fn default() -> Self {
        Self {
            input: "_input".to_string(),
            notes: "_unsortiert".to_string(),
            attachments: "_unsortiert/_files".to_string(),
            templates: "_templates".to_string(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: "import.md".to_string(),
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            attach_original_mail: true,
            delete_original_mail: true,
            ignore_dot_files: true,
        }
    }
}

impl TemplateConfig {
    /// Vault path of the template file.
    pub fn path(&self, folders: &FoldersConfig) -> String {
        vault::join(&folders.templates, &self.filename)
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Load configuration for the vault at `vault_root`, searching standard
/// locations. An explicit `path` takes precedence over all of them and
/// must exist.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config(
    explicit: Option<&Path>,
    vault_root: &Path,
) -> anyhow::Result<(Config, ConfigSource)> {
    let candidates = match explicit {
        Some(path) if !path.is_file() => {
            return Err(NotedropError::NotFound(path.display().to_string()).into());
        }
        Some(path) => vec![path.to_path_buf()],
        None => config_file_candidates(vault_root),
    };

    for path in candidates {
        if !path.exists() {
            continue;
        }
        match read_config(&path) {
            Ok(cfg) => {
                tracing::info!(path = %path.display(), "Loaded config");
                return Ok((cfg, ConfigSource::File(path)));
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load config, using defaults"
                );
                return Ok((Config::default(), ConfigSource::Defaults));
            }
        }
    }
    Ok((Config::default(), ConfigSource::Defaults))
}

/// Read and parse one config file.
pub fn read_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str::<Config>(&contents)?)
}

/// Save configuration to `path`, creating parent folders.
pub fn save_config(path: &Path, config: &Config) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

/// Config file locations, most specific first.
pub fn config_file_candidates(vault_root: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(env_path) = std::env::var("NOTEDROP_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }
    paths.push(vault_root.join(VAULT_CONFIG_FILE));
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("notedrop").join("config.toml"));
    }
    paths
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notedrop")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.folders.input, "_input");
        assert_eq!(cfg.folders.notes, "_unsortiert");
        assert_eq!(cfg.folders.attachments, "_unsortiert/_files");
        assert_eq!(cfg.folders.templates, "_templates");
        assert!(!cfg.template.enabled);
        assert!(cfg.intake.ignore_dot_files);
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let mut cfg = Config::default();
        cfg.template.enabled = true;
        cfg.intake.delete_original_mail = false;
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[folders]
input = "Inbox"

[template]
enabled = true
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert_eq!(cfg.folders.input, "Inbox");
        assert!(cfg.template.enabled);
        // Other fields use defaults
        assert_eq!(cfg.folders.notes, "_unsortiert");
        assert_eq!(cfg.template.filename, "import.md");
        assert!(cfg.intake.attach_original_mail);
    }

    #[test]
    fn test_template_path() {
        let cfg = Config::default();
        assert_eq!(cfg.template.path(&cfg.folders), "_templates/import.md");
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[folders]\nnotes = \"Notes\"\n").unwrap();

        let (cfg, source) = load_config(Some(&path), dir.path()).unwrap();
        assert_eq!(cfg.folders.notes, "Notes");
        assert_eq!(source, ConfigSource::File(path));
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[folders\nnotes = ").unwrap();

        let (cfg, source) = load_config(Some(&path), dir.path()).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(source, ConfigSource::Defaults);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.toml");

        let err = load_config(Some(&path), dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NotedropError>(),
            Some(NotedropError::NotFound(_))
        ));
    }

    #[test]
    fn test_vault_file_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(VAULT_CONFIG_FILE);
        std::fs::write(&path, "[intake]\nignore_dot_files = false\n").unwrap();

        let (cfg, _) = load_config(None, dir.path()).unwrap();
        assert!(!cfg.intake.ignore_dot_files);
    }

    #[test]
    fn test_save_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(VAULT_CONFIG_FILE);
        let cfg = Config::default();
        save_config(&path, &cfg).unwrap();
        assert_eq!(read_config(&path).unwrap(), cfg);
    }
}
