//! User preferences for the work/rest schedule

use std::ops::RangeInclusive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::shortcuts::normalize_shortcut;

pub const WORK_MINUTES_RANGE: RangeInclusive<u64> = 1..=120;
pub const REST_SECONDS_RANGE: RangeInclusive<u64> = 5..=600;
pub const TOTAL_CYCLES_RANGE: RangeInclusive<u32> = 0..=99;

/// Schedule and shortcut preferences, serialized with the camelCase keys the
/// host UI reads and writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Work phase length in minutes
    pub work_duration: u64,
    /// Rest phase length in seconds
    pub rest_duration: u64,
    /// Number of work/rest cycles per run, 0 for unlimited
    pub total_cycles: u32,
    /// Start the next work phase automatically once a rest ends
    pub auto_start: bool,
    pub skip_shortcut: String,
    pub pause_shortcut: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            rest_duration: 20,
            total_cycles: 4,
            auto_start: false,
            skip_shortcut: "Ctrl+Shift+Q".to_string(),
            pause_shortcut: "Ctrl+Shift+P".to_string(),
        }
    }
}

impl Settings {
    /// Length of the work phase in seconds
    pub fn work_seconds(&self) -> u64 {
        self.work_duration * 60
    }

    /// Length of the rest phase in seconds
    pub fn rest_seconds(&self) -> u64 {
        self.rest_duration
    }

    /// Whether the shortcut labels differ from another settings record
    pub fn shortcuts_differ(&self, other: &Settings) -> bool {
        self.skip_shortcut != other.skip_shortcut || self.pause_shortcut != other.pause_shortcut
    }

    /// Check ranges and normalise the shortcut labels.
    ///
    /// Used for records submitted by the user; a rejected record leaves the
    /// running configuration untouched.
    pub fn validated(mut self) -> Result<Self, String> {
        if !WORK_MINUTES_RANGE.contains(&self.work_duration) {
            return Err(format!(
                "workDuration must be between {} and {} minutes",
                WORK_MINUTES_RANGE.start(),
                WORK_MINUTES_RANGE.end()
            ));
        }
        if !REST_SECONDS_RANGE.contains(&self.rest_duration) {
            return Err(format!(
                "restDuration must be between {} and {} seconds",
                REST_SECONDS_RANGE.start(),
                REST_SECONDS_RANGE.end()
            ));
        }
        if !TOTAL_CYCLES_RANGE.contains(&self.total_cycles) {
            return Err(format!(
                "totalCycles must be between {} and {}",
                TOTAL_CYCLES_RANGE.start(),
                TOTAL_CYCLES_RANGE.end()
            ));
        }

        self.skip_shortcut = normalize_shortcut(&self.skip_shortcut)?;
        self.pause_shortcut = normalize_shortcut(&self.pause_shortcut)?;
        Ok(self)
    }

    /// Build settings from a persisted record, defaulting every field that is
    /// missing or invalid. Returns the settings plus one message per defaulted field
    /// that was present but unusable.
    pub fn from_record(record: &Value) -> (Self, Vec<String>) {
        let defaults = Self::default();
        let mut problems = Vec::new();

        let empty = Map::new();
        let fields = match record.as_object() {
            Some(fields) => fields,
            None => {
                problems.push("settings record is not an object".to_string());
                &empty
            }
        };

        let work_duration = read_field(fields, "workDuration", &mut problems, |v| {
            v.as_u64().filter(|n| WORK_MINUTES_RANGE.contains(n))
        })
        .unwrap_or(defaults.work_duration);

        let rest_duration = read_field(fields, "restDuration", &mut problems, |v| {
            v.as_u64().filter(|n| REST_SECONDS_RANGE.contains(n))
        })
        .unwrap_or(defaults.rest_duration);

        let total_cycles = read_field(fields, "totalCycles", &mut problems, |v| {
            v.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .filter(|n| TOTAL_CYCLES_RANGE.contains(n))
        })
        .unwrap_or(defaults.total_cycles);

        let auto_start = read_field(fields, "autoStart", &mut problems, Value::as_bool)
            .unwrap_or(defaults.auto_start);

        let skip_shortcut = read_field(fields, "skipShortcut", &mut problems, |v| {
            v.as_str().and_then(|s| normalize_shortcut(s).ok())
        })
        .unwrap_or(defaults.skip_shortcut);

        let pause_shortcut = read_field(fields, "pauseShortcut", &mut problems, |v| {
            v.as_str().and_then(|s| normalize_shortcut(s).ok())
        })
        .unwrap_or(defaults.pause_shortcut);

        let settings = Self {
            work_duration,
            rest_duration,
            total_cycles,
            auto_start,
            skip_shortcut,
            pause_shortcut,
        };

        (settings, problems)
    }
}

fn read_field<T>(
    fields: &Map<String, Value>,
    key: &str,
    problems: &mut Vec<String>,
    parse: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
    let value = fields.get(key)?;
    let parsed = parse(value);
    if parsed.is_none() {
        problems.push(format!("invalid value for {}: {}", key, value));
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_the_documented_schedule() {
        let settings = Settings::default();
        assert_eq!(settings.work_seconds(), 25 * 60);
        assert_eq!(settings.rest_seconds(), 20);
        assert_eq!(settings.total_cycles, 4);
        assert!(!settings.auto_start);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(value["workDuration"], json!(25));
        assert_eq!(value["skipShortcut"], json!("Ctrl+Shift+Q"));
    }

    #[test]
    fn partial_record_keeps_present_fields() {
        let (settings, problems) = Settings::from_record(&json!({
            "workDuration": 50,
            "autoStart": true
        }));

        assert!(problems.is_empty());
        assert_eq!(settings.work_duration, 50);
        assert!(settings.auto_start);
        assert_eq!(settings.rest_duration, 20);
        assert_eq!(settings.pause_shortcut, "Ctrl+Shift+P");
    }

    #[test]
    fn invalid_fields_fall_back_individually() {
        let (settings, problems) = Settings::from_record(&json!({
            "workDuration": 0,
            "restDuration": "long",
            "totalCycles": 3,
            "skipShortcut": "Ctrl+F13",
            "pauseShortcut": "alt+ctrl+k"
        }));

        assert_eq!(problems.len(), 3);
        assert_eq!(settings.work_duration, 25);
        assert_eq!(settings.rest_duration, 20);
        assert_eq!(settings.total_cycles, 3);
        assert_eq!(settings.skip_shortcut, "Ctrl+Shift+Q");
        assert_eq!(settings.pause_shortcut, "Ctrl+Alt+K");
    }

    #[test]
    fn non_object_record_yields_defaults() {
        let (settings, problems) = Settings::from_record(&json!([1, 2, 3]));
        assert_eq!(settings, Settings::default());
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let mut settings = Settings::default();
        settings.rest_duration = 2;
        assert!(settings.clone().validated().is_err());

        settings.rest_duration = 30;
        settings.total_cycles = 100;
        assert!(settings.clone().validated().is_err());

        settings.total_cycles = 0;
        settings.skip_shortcut = "shift+ctrl+s".to_string();
        let valid = settings.validated().unwrap();
        assert_eq!(valid.skip_shortcut, "Ctrl+Shift+S");
    }
}
