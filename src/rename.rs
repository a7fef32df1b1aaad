//! Prefix a note's file name with the date from its `created` property.

use tracing::{info, warn};

use crate::error::{NotedropError, Result};
use crate::i18n;
use crate::notify::Notifier;
use crate::parser::frontmatter::{self, CREATED_KEY};
use crate::vault::{self, Vault};

/// A rename that is ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub from: String,
    pub to: String,
    /// Normalized `YYYY-MM-DD` date.
    pub date: String,
}

/// Work out the new path of a note without touching it.
///
/// The new name is `<YYYY-MM-DD> <stem>.<ext>` in the same folder.
pub fn plan(vault: &dyn Vault, path: &str) -> Result<RenamePlan> {
    let path = vault::normalize(path);
    if !vault.is_file(&path) {
        return Err(NotedropError::NotFound(path));
    }
    let content = vault.read_to_string(&path)?;

    let header = frontmatter::parse(&content)
        .ok_or_else(|| NotedropError::NoFrontmatter(path.clone()))?;
    let created = header
        .get(CREATED_KEY)
        .ok_or_else(|| NotedropError::NoCreatedDate(path.clone()))?;
    let date = frontmatter::normalize_date(created).ok_or_else(|| {
        NotedropError::UnrecognizedDate {
            path: path.clone(),
            value: created.clone(),
        }
    })?;

    let name = vault::file_name(&path);
    if name.starts_with(&format!("{date} ")) {
        return Err(NotedropError::AlreadyPrefixed(path));
    }

    let new_name = match vault::extension(name) {
        Some(ext) => format!("{date} {}.{ext}", vault::file_stem(name)),
        None => format!("{date} {name}"),
    };
    let to = vault::join(vault::parent(&path), &new_name);
    Ok(RenamePlan {
        from: path,
        to,
        date,
    })
}

/// Rename a note after its `created` date.
///
/// Nothing is renamed if the note has no frontmatter, no `created` key, an
/// unrecognized date, is already prefixed, or the new name is taken.
pub fn rename_by_created(vault: &dyn Vault, path: &str) -> Result<RenamePlan> {
    let plan = plan(vault, path)?;
    if vault.exists(&plan.to) {
        return Err(NotedropError::TargetExists(plan.to));
    }
    vault.rename(&plan.from, &plan.to)?;
    info!(from = %plan.from, to = %plan.to, "Renamed note");
    Ok(plan)
}

/// [`rename_by_created`], reporting the outcome through `notifier`.
pub fn rename_and_notify(
    vault: &dyn Vault,
    path: &str,
    notifier: &dyn Notifier,
) -> Result<RenamePlan> {
    match rename_by_created(vault, path) {
        Ok(plan) => {
            notifier.info(&format!(
                "{}: {} \u{2192} {}",
                i18n::msg_renamed(),
                plan.from,
                vault::file_name(&plan.to)
            ));
            Ok(plan)
        }
        Err(e) => {
            warn!(path, error = %e, "Rename failed");
            notifier.error(&format!("{}: {}", i18n::err_rename_failed(), e.notice()));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Level, RecordingNotifier};
    use crate::vault::MemoryVault;

    fn note(created: &str) -> String {
        format!("---\ntitle: Meeting\ncreated: {created}\n---\n# Meeting\n")
    }

    #[test]
    fn test_plan_iso_date() {
        let vault = MemoryVault::new().with_file("notes/Meeting.md", note("2023-08-20"));
        let plan = plan(&vault, "notes/Meeting.md").unwrap();
        assert_eq!(plan.to, "notes/2023-08-20 Meeting.md");
        assert_eq!(plan.date, "2023-08-20");
    }

    #[test]
    fn test_both_formats_give_same_prefix() {
        let vault = MemoryVault::new()
            .with_file("a.md", note("2023-08-20 10:15"))
            .with_file("b.md", note("20.08.2023"));
        assert_eq!(plan(&vault, "a.md").unwrap().date, "2023-08-20");
        assert_eq!(plan(&vault, "b.md").unwrap().date, "2023-08-20");
    }

    #[test]
    fn test_no_frontmatter() {
        let vault = MemoryVault::new().with_file("n.md", "# Just a note\n");
        assert!(matches!(
            rename_by_created(&vault, "n.md"),
            Err(NotedropError::NoFrontmatter(_))
        ));
        assert!(vault.exists("n.md"));
    }

    #[test]
    fn test_no_created_key() {
        let vault = MemoryVault::new().with_file("n.md", "---\ntitle: x\n---\n");
        assert!(matches!(
            rename_by_created(&vault, "n.md"),
            Err(NotedropError::NoCreatedDate(_))
        ));
    }

    #[test]
    fn test_unrecognized_date_does_not_rename() {
        let vault = MemoryVault::new().with_file("n.md", note("last tuesday"));
        let err = rename_by_created(&vault, "n.md").unwrap_err();
        assert!(matches!(err, NotedropError::UnrecognizedDate { ref value, .. } if value == "last tuesday"));
        assert_eq!(vault.file_paths(), vec!["n.md"]);
    }

    #[test]
    fn test_already_prefixed() {
        let vault = MemoryVault::new().with_file("2023-08-20 Meeting.md", note("2023-08-20"));
        assert!(matches!(
            plan(&vault, "2023-08-20 Meeting.md"),
            Err(NotedropError::AlreadyPrefixed(_))
        ));
    }

    #[test]
    fn test_target_exists() {
        let vault = MemoryVault::new()
            .with_file("Meeting.md", note("2023-08-20"))
            .with_file("2023-08-20 Meeting.md", "other");
        assert!(matches!(
            rename_by_created(&vault, "Meeting.md"),
            Err(NotedropError::TargetExists(_))
        ));
        assert_eq!(
            vault.read_to_string("2023-08-20 Meeting.md").unwrap(),
            "other"
        );
    }

    #[test]
    fn test_rename_and_notify() {
        let vault = MemoryVault::new().with_file("notes/Meeting.md", note("20.08.2023"));
        let notifier = RecordingNotifier::new();
        rename_and_notify(&vault, "notes/Meeting.md", &notifier).unwrap();
        assert!(vault.exists("notes/2023-08-20 Meeting.md"));
        assert!(!vault.exists("notes/Meeting.md"));
        assert_eq!(notifier.messages(Level::Info).len(), 1);

        let missing = rename_and_notify(&vault, "notes/Meeting.md", &notifier);
        assert!(matches!(missing, Err(NotedropError::NotFound(_))));
        assert_eq!(notifier.messages(Level::Error).len(), 1);
    }
}
