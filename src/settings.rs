//! Remembered operator preferences.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
}

pub struct SettingsStore {
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// Explicit path, or `settings.json` under the platform config dir.
    pub fn new(path: Option<PathBuf>) -> Self {
        let path = path.or_else(|| {
            ProjectDirs::from("", "", "dockpeek").map(|d| d.config_dir().join("settings.json"))
        });
        Self { path }
    }

    /// Missing or unreadable files yield defaults.
    pub fn load(&self) -> Settings {
        let Some(path) = &self.path else {
            return Settings::default();
        };
        match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring malformed settings");
                Settings::default()
            }),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no settings file");
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(settings)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(Some(dir.path().join("nested/settings.json")));
        assert_eq!(store.load().theme, Theme::Dark);

        store.save(&Settings { theme: Theme::Light }).unwrap();
        assert_eq!(store.load().theme, Theme::Light);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(SettingsStore::new(Some(path)).load(), Settings::default());
    }

    #[test]
    fn toggling_alternates() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }
}
