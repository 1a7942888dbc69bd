use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::ui::settings::UiSettings;

fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("textworld_adventure");
    path.push("ui_settings.json");
    path
}

pub fn load_settings() -> UiSettings {
    load_settings_from(&settings_path())
}

pub fn save_settings(settings: &UiSettings) {
    save_settings_to(&settings_path(), settings);
}

/// Missing or unreadable files fall back to defaults.
pub fn load_settings_from(path: &Path) -> UiSettings {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str::<UiSettings>(&s).ok())
        .map(UiSettings::sanitized)
        .unwrap_or_default()
}

pub fn save_settings_to(path: &Path, settings: &UiSettings) {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok();
    }
    match serde_json::to_string_pretty(settings) {
        Ok(json) => match fs::write(path, json) {
            Ok(()) => debug!(path = %path.display(), "saved ui settings"),
            Err(e) => warn!(path = %path.display(), error = %e, "could not save ui settings"),
        },
        Err(e) => warn!(error = %e, "could not serialize ui settings"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ui_settings.json");
        let settings = UiSettings {
            ui_scale: 1.25,
            agent_panel_width: 400.0,
        };

        save_settings_to(&path, &settings);

        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_settings.json");
        fs::write(&path, "not json").unwrap();

        assert_eq!(load_settings_from(&path), UiSettings::default());
        assert_eq!(
            load_settings_from(&dir.path().join("missing.json")),
            UiSettings::default()
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_settings.json");
        fs::write(&path, r#"{"ui_scale":1.5}"#).unwrap();

        let loaded = load_settings_from(&path);
        assert_eq!(loaded.ui_scale, 1.5);
        assert_eq!(loaded.agent_panel_width, UiSettings::default().agent_panel_width);
    }
}
