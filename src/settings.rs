use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// Timer lengths and distraction threshold. The defaults are the classic
/// Pomodoro split; the profile page lets users tune them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSettings {
    pub focus_secs: u32,
    pub break_secs: u32,
    pub distraction_threshold_secs: u32,
    pub chime_enabled: bool,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            focus_secs: 25 * 60,
            break_secs: 5 * 60,
            distraction_threshold_secs: 30,
            chime_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct UserSettings {
    focus: FocusSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn focus(&self) -> FocusSettings {
        self.data.read().unwrap().focus.clone()
    }

    pub fn update_focus(&self, settings: FocusSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            guard.focus = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

impl SettingsStore {
    #[allow(dead_code)]
    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: UserSettings = serde_json::from_str(&contents)?;
        let mut guard = self.data.write().unwrap();
        *guard = data;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        let focus = store.focus();
        assert_eq!(focus.focus_secs, 1500);
        assert_eq!(focus.break_secs, 300);
        assert_eq!(focus.distraction_threshold_secs, 30);
        assert!(focus.chime_enabled);
    }

    #[test]
    fn update_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        let mut focus = store.focus();
        focus.focus_secs = 50 * 60;
        focus.chime_enabled = false;
        store.update_focus(focus).unwrap();

        let reopened = SettingsStore::new(path).unwrap();
        assert_eq!(reopened.focus().focus_secs, 3000);
        assert!(!reopened.focus().chime_enabled);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not valid json").unwrap();

        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.focus().focus_secs, 1500);
    }
}
