//! Settings persistence in a JSON key-value file

use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::state::Settings;

/// Key the settings record is stored under
pub const SETTINGS_KEY: &str = "zen-rest-settings";

/// Key-value file holding the settings record.
///
/// Loading never fails: anything unreadable falls back to defaults. Saving
/// overwrites the whole record and keeps unrelated keys in the file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load settings, defaulting missing or invalid fields
    pub fn load(&self) -> Settings {
        let entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Using default settings: {}", e);
                return Settings::default();
            }
        };

        let Some(record) = entries.get(SETTINGS_KEY) else {
            debug!("No saved settings in {}, using defaults", self.path.display());
            return Settings::default();
        };

        let (settings, problems) = Settings::from_record(record);
        for problem in problems {
            warn!("Saved settings: {}, using default", problem);
        }

        info!("Loaded settings from {}", self.path.display());
        settings
    }

    /// Persist the full settings record
    pub fn save(&self, settings: &Settings) -> Result<(), String> {
        // A corrupt file is replaced rather than blocking the save
        let mut entries = self.read_entries().unwrap_or_default();

        let record = serde_json::to_value(settings)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        entries.insert(SETTINGS_KEY.to_string(), record);

        let serialized = serde_json::to_string_pretty(&Value::Object(entries))
            .map_err(|e| format!("Failed to serialize settings file: {}", e))?;
        self.replace_file(serialized.as_bytes())?;

        info!("Saved settings to {}", self.path.display());
        Ok(())
    }

    /// Write to a sibling temp file and rename it over the target, so a crash
    /// mid-write never leaves a truncated settings file
    fn replace_file(&self, contents: &[u8]) -> Result<(), String> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let write_error = |e: std::io::Error| {
            format!("Failed to write settings to {}: {}", self.path.display(), e)
        };

        let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
        file.write_all(contents).map_err(write_error)?;
        file.as_file().sync_all().map_err(write_error)?;
        file.persist(&self.path).map_err(|e| write_error(e.error))?;
        Ok(())
    }

    fn read_entries(&self) -> Result<Map<String, Value>, String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(format!("Failed to read {}: {}", self.path.display(), e));
            }
        };

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(format!("{} is not a JSON object", self.path.display())),
            Err(e) => Err(format!("Failed to parse {}: {}", self.path.display(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("zen-rest.json"))
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store_in(&dir).load(), Settings::default());
    }

    #[test]
    fn save_then_load_returns_saved_settings() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let settings = Settings {
            work_duration: 45,
            auto_start: true,
            ..Settings::default()
        };

        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn corrupt_file_loads_defaults_and_is_replaced_on_save() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert_eq!(store.load(), Settings::default());
        store.save(&Settings::default()).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        let value: Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value[SETTINGS_KEY]["totalCycles"], 4);
    }

    #[test]
    fn partial_record_is_completed_with_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"zen-rest-settings": {"restDuration": 60, "totalCycles": -2}}"#,
        )
        .unwrap();

        let settings = store.load();
        assert_eq!(settings.rest_duration, 60);
        assert_eq!(settings.total_cycles, 4);
        assert_eq!(settings.work_duration, 25);
    }

    #[test]
    fn save_replaces_the_file_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&Settings::default()).unwrap();

        let settings = Settings {
            rest_duration: 90,
            ..Settings::default()
        };
        store.save(&settings).unwrap();

        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn save_preserves_other_keys() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"window-geometry": [500, 680]}"#).unwrap();

        store.save(&Settings::default()).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(value["window-geometry"][1], 680);
        assert_eq!(value[SETTINGS_KEY]["skipShortcut"], "Ctrl+Shift+Q");
    }
}
