//! Application settings: a JSON document under the per-user config
//! directory.
//!
//! Loading is lenient by design — the file only ever narrows in on the
//! defaults. Keys the application does not know are warned about and
//! dropped, type mismatches keep the default, and a missing or unreadable
//! file just means running off defaults. Saving excludes the store-side
//! keys (directory, file name) and is atomic via write-to-temp-then-rename.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories_next::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "reticle-gfx";
const APPLICATION: &str = "reticle";

/// File name of the settings document inside the config directory.
pub const SETTINGS_FILE: &str = "reticle_settings.json";

/// Settings the file must never override.
const PROTECTED_KEYS: &[&str] = &["system/application_name", "system/version_string"];

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to determine the user configuration directory")]
    NoHome,
    #[error("configuration I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("configuration serialization failed: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSection {
    pub application_name: String,
    pub version_string: String,
}

impl Default for SystemSection {
    fn default() -> Self {
        Self {
            application_name: "reticle".to_owned(),
            version_string: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSection {
    pub full_screen: bool,
    pub resolution_x: u32,
    pub resolution_y: u32,
    pub vsync: bool,
}

impl Default for VideoSection {
    fn default() -> Self {
        Self {
            full_screen: false,
            resolution_x: 640,
            resolution_y: 480,
            vsync: true,
        }
    }
}

/// The nested settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub system: SystemSection,
    pub video: VideoSection,
}

/// Knows where the settings document lives and how to read/write it. The
/// directory and file name never appear inside the document itself.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    config_dir: PathBuf,
}

impl SettingsStore {
    /// Resolves the per-user config directory, creating it if missing.
    pub fn discover() -> Result<Self, SettingsError> {
        let dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
            .ok_or(SettingsError::NoHome)?;
        Self::with_dir(dirs.config_dir())
    }

    /// Uses an explicit directory (CLI override, tests).
    pub fn with_dir(dir: &Path) -> Result<Self, SettingsError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            config_dir: dir.to_path_buf(),
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Loads the settings document, merging it over the defaults. Never
    /// fails: every problem is logged and answered with defaults.
    pub fn load(&self) -> Settings {
        let path = self.settings_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "missing configuration file, running off defaults");
                return Settings::default();
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read configuration, running off defaults");
                return Settings::default();
            }
        };

        let incoming: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "configuration is not valid JSON, running off defaults");
                return Settings::default();
            }
        };

        info!(path = %path.display(), "configuration loaded");
        merge_over_defaults(incoming)
    }

    /// Writes the document atomically: serialize to `<file>.tmp`, then
    /// rename over the target.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let path = self.settings_path();
        let staging = path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(settings)?;
        fs::write(&staging, body)?;
        fs::rename(&staging, &path)?;
        info!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn merge_over_defaults(incoming: Value) -> Settings {
    let defaults = match serde_json::to_value(Settings::default()) {
        Ok(Value::Object(map)) => map,
        _ => return Settings::default(),
    };

    let Value::Object(incoming) = incoming else {
        warn!("configuration root is not an object, running off defaults");
        return Settings::default();
    };

    let mut document = defaults;
    merge_object(&mut document, incoming, "");

    match serde_json::from_value(Value::Object(document)) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "merged configuration failed to decode, running off defaults");
            Settings::default()
        }
    }
}

/// Imports `incoming` into `target`, keeping only keys the defaults
/// already define.
fn merge_object(target: &mut Map<String, Value>, incoming: Map<String, Value>, base_path: &str) {
    for (key, value) in incoming {
        let path = if base_path.is_empty() {
            key.clone()
        } else {
            format!("{base_path}/{key}")
        };

        if PROTECTED_KEYS.contains(&path.as_str()) {
            debug!(key = %path, "protected setting ignored from file");
            continue;
        }

        match target.get_mut(&key) {
            None => {
                warn!(key = %path, "unsupported configuration option, it will not be saved");
            }
            Some(Value::Object(slot)) => match value {
                Value::Object(value) => merge_object(slot, value, &path),
                other => {
                    warn!(key = %path, got = value_kind(&other), "configuration section replaced by a scalar, keeping defaults");
                }
            },
            Some(slot) => {
                if value_kind(slot) == value_kind(&value) {
                    *slot = value;
                } else {
                    warn!(
                        key = %path,
                        expected = value_kind(slot),
                        got = value_kind(&value),
                        "configuration option has the wrong type, keeping the default"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = SettingsStore::with_dir(dir.path()).expect("store");
        (dir, store)
    }

    #[test]
    fn save_then_load_round_trips_non_excluded_keys() {
        let (_dir, store) = store();
        let mut settings = Settings::default();
        settings.video.resolution_x = 1920;
        settings.video.resolution_y = 1080;
        settings.video.full_screen = true;
        settings.video.vsync = false;

        store.save(&settings).expect("save");
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn store_side_keys_are_never_written() {
        let (_dir, store) = store();
        store.save(&Settings::default()).expect("save");

        let raw = fs::read_to_string(store.settings_path()).expect("read back");
        let document: Value = serde_json::from_str(&raw).expect("json");
        let root = document.as_object().expect("object root");
        assert_eq!(root.len(), 2);
        assert!(root.contains_key("system") && root.contains_key("video"));

        let system = root["system"].as_object().expect("system section");
        let keys: Vec<_> = system.keys().cloned().collect();
        assert_eq!(keys, vec!["application_name", "version_string"]);
    }

    #[test]
    fn atomic_save_leaves_no_staging_file() {
        let (_dir, store) = store();
        store.save(&Settings::default()).expect("save");

        assert!(store.settings_path().exists());
        assert!(!store.settings_path().with_extension("json.tmp").exists());
    }

    #[test]
    fn unknown_keys_are_warned_and_dropped() {
        let (_dir, store) = store();
        fs::write(
            store.settings_path(),
            r#"{
                "video": { "resolution_x": 800, "gamma": 2.2 },
                "audio": { "volume": 11 }
            }"#,
        )
        .expect("write");

        let loaded = store.load();
        assert_eq!(loaded.video.resolution_x, 800);

        store.save(&loaded).expect("save");
        let raw = fs::read_to_string(store.settings_path()).expect("read back");
        assert!(!raw.contains("gamma"));
        assert!(!raw.contains("audio"));
    }

    #[test]
    fn protected_keys_are_not_imported() {
        let (_dir, store) = store();
        fs::write(
            store.settings_path(),
            r#"{ "system": { "application_name": "impostor", "version_string": "99.9.9" } }"#,
        )
        .expect("write");

        let loaded = store.load();
        assert_eq!(loaded.system, SystemSection::default());
    }

    #[test]
    fn type_mismatches_keep_the_default() {
        let (_dir, store) = store();
        fs::write(
            store.settings_path(),
            r#"{ "video": { "resolution_x": "wide", "vsync": false } }"#,
        )
        .expect("write");

        let loaded = store.load();
        assert_eq!(loaded.video.resolution_x, 640);
        assert!(!loaded.video.vsync);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (_dir, store) = store();
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn invalid_json_yields_defaults() {
        let (_dir, store) = store();
        fs::write(store.settings_path(), "{ not json").expect("write");
        assert_eq!(store.load(), Settings::default());
    }
}
