//! Runtime settings loader for the memory bank.
//!
//! Loads and merges:
//! - System defaults: `<project root>/packages/conf/memory-bank.yaml`
//! - User overrides:  `<PRJ_CONFIG_HOME or .config>/omni-dev-fusion/memory-bank.yaml`
//!
//! Merge precedence is user over system. Missing or invalid files are
//! ignored with a warning.

use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH: &str = "packages/conf/memory-bank.yaml";
const DEFAULT_USER_SETTINGS_RELATIVE_PATH: &str = "omni-dev-fusion/memory-bank.yaml";
const DEFAULT_CONFIG_HOME_RELATIVE_PATH: &str = ".config";

const DEFAULT_DIRECTORY_NAME: &str = "memory-bank";
const DEFAULT_RULES_FILE: &str = ".clinerules";
const DEFAULT_MIN_QUERY_CHARS: usize = 5;

/// Memory bank settings; unset fields fall back to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MemoryBankSettings {
    /// Directory (relative to the project root) holding the documents.
    pub directory_name: Option<String>,
    /// Rules document path (relative to the project root).
    pub rules_file: Option<String>,
    /// Minimum search query length in characters.
    pub min_query_chars: Option<usize>,
}

impl MemoryBankSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            directory_name: overlay.directory_name.or(self.directory_name),
            rules_file: overlay.rules_file.or(self.rules_file),
            min_query_chars: overlay.min_query_chars.or(self.min_query_chars),
        }
    }

    /// Memory bank directory name.
    #[must_use]
    pub fn directory_name(&self) -> &str {
        non_empty(self.directory_name.as_deref()).unwrap_or(DEFAULT_DIRECTORY_NAME)
    }

    /// Rules document path relative to the project root.
    #[must_use]
    pub fn rules_file(&self) -> &str {
        non_empty(self.rules_file.as_deref()).unwrap_or(DEFAULT_RULES_FILE)
    }

    /// Minimum accepted query length.
    #[must_use]
    pub fn min_query_chars(&self) -> usize {
        self.min_query_chars.unwrap_or(DEFAULT_MIN_QUERY_CHARS)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Load system + user settings for `project_root`.
#[must_use]
pub fn load_settings(project_root: &Path) -> MemoryBankSettings {
    let (system_path, user_path) = settings_paths(project_root);
    load_settings_from_paths(&system_path, &user_path)
}

/// Load settings from one explicit file, ignoring the default locations.
#[must_use]
pub fn load_settings_from_file(path: &Path) -> MemoryBankSettings {
    load_one(path)
}

/// System and user settings locations for `project_root`.
#[must_use]
pub fn settings_paths(project_root: &Path) -> (PathBuf, PathBuf) {
    let system_path = project_root.join(DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH);
    let user_path = resolve_config_home(project_root).join(DEFAULT_USER_SETTINGS_RELATIVE_PATH);
    (system_path, user_path)
}

/// System settings overlaid with user settings.
#[doc(hidden)]
#[must_use]
pub fn load_settings_from_paths(system: &Path, user: &Path) -> MemoryBankSettings {
    load_one(system).merge(load_one(user))
}

fn load_one(path: &Path) -> MemoryBankSettings {
    if !path.exists() {
        return MemoryBankSettings::default();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to read settings file; ignoring"
            );
            return MemoryBankSettings::default();
        }
    };
    if raw.trim().is_empty() {
        return MemoryBankSettings::default();
    }
    match serde_yaml::from_str::<MemoryBankSettings>(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to parse settings yaml; ignoring file"
            );
            MemoryBankSettings::default()
        }
    }
}

fn resolve_config_home(project_root: &Path) -> PathBuf {
    match std::env::var("PRJ_CONFIG_HOME") {
        Ok(raw) if !raw.trim().is_empty() => {
            let path = PathBuf::from(raw.trim());
            if path.is_absolute() {
                path
            } else {
                project_root.join(path)
            }
        }
        _ => project_root.join(DEFAULT_CONFIG_HOME_RELATIVE_PATH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_unset_and_blank_values() {
        let settings = MemoryBankSettings {
            directory_name: Some("  ".to_string()),
            ..MemoryBankSettings::default()
        };
        assert_eq!(settings.directory_name(), DEFAULT_DIRECTORY_NAME);
        assert_eq!(settings.rules_file(), DEFAULT_RULES_FILE);
        assert_eq!(settings.min_query_chars(), DEFAULT_MIN_QUERY_CHARS);
    }

    #[test]
    fn overlay_wins_field_by_field() {
        let system = MemoryBankSettings {
            directory_name: Some("docs/bank".to_string()),
            rules_file: Some("rules.md".to_string()),
            min_query_chars: None,
        };
        let user = MemoryBankSettings {
            directory_name: None,
            rules_file: Some("custom.md".to_string()),
            min_query_chars: Some(3),
        };
        let merged = system.merge(user);
        assert_eq!(merged.directory_name(), "docs/bank");
        assert_eq!(merged.rules_file(), "custom.md");
        assert_eq!(merged.min_query_chars(), 3);
    }
}
