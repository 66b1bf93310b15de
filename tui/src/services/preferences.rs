//! The three persisted dashboard toggles and the store they live in.

use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

pub const INCLUDE_SYSTEM_KEY: &str = "indexLastSynced.includeSystem";
pub const INCLUDE_HIDDEN_KEY: &str = "indexLastSynced.includeHidden";
pub const AUTO_REFRESH_KEY: &str = "indexLastSynced.autoRefresh";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub include_system: bool,
    /// Shown and persisted only; nothing filters on it.
    pub include_hidden: bool,
    pub auto_refresh: bool,
}

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to access preferences at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable key/value storage for [`Preferences`].
pub trait PreferenceStore: Send + Sync {
    /// Never fails: unreadable or malformed entries fall back to `false`.
    fn load(&self) -> Preferences;

    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError>;
}

impl Preferences {
    /// Reads the three keys out of a flat JSON object.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            warn!("preferences are not a JSON object; using defaults");
            return Self::default();
        };

        Self {
            include_system: read_flag(object, INCLUDE_SYSTEM_KEY),
            include_hidden: read_flag(object, INCLUDE_HIDDEN_KEY),
            auto_refresh: read_flag(object, AUTO_REFRESH_KEY),
        }
    }

    /// Writes the three keys into `object`, leaving other keys alone.
    pub fn write_into(&self, object: &mut Map<String, Value>) {
        object.insert(INCLUDE_SYSTEM_KEY.to_string(), Value::Bool(self.include_system));
        object.insert(INCLUDE_HIDDEN_KEY.to_string(), Value::Bool(self.include_hidden));
        object.insert(AUTO_REFRESH_KEY.to_string(), Value::Bool(self.auto_refresh));
    }
}

fn read_flag(object: &Map<String, Value>, key: &str) -> bool {
    match object.get(key) {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        // "true"/"false" strings are accepted.
        Some(Value::String(text)) if text == "true" => true,
        Some(Value::String(text)) if text == "false" => false,
        Some(other) => {
            warn!(key = %key, value = %other, "ignoring malformed preference");
            false
        }
    }
}

/// JSON file store, `~/.lastsync/preferences.json` by default.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_object(&self) -> Option<Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return None,
            Err(error) => {
                warn!(path = %self.path.display(), error = %error, "failed to read preferences");
                return None;
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(object)) => Some(object),
            Ok(_) | Err(_) => {
                warn!(path = %self.path.display(), "preferences file is corrupt; using defaults");
                None
            }
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Preferences {
        self.read_object()
            .map(|object| Preferences::from_json(&Value::Object(object)))
            .unwrap_or_default()
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        let mut object = self.read_object().unwrap_or_default();
        preferences.write_into(&mut object);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| PreferencesError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(&Value::Object(object))?;
        std::fs::write(&self.path, content).map_err(|source| PreferencesError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Process-local store, used when `dashboard.preferences_path` is empty.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<Map<String, Value>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Map<String, Value> {
        match self.values.lock() {
            Ok(values) => values.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Preferences {
        Preferences::from_json(&Value::Object(self.snapshot()))
    }

    fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        let mut values = match self.values.lock() {
            Ok(values) => values,
            Err(poisoned) => poisoned.into_inner(),
        };
        preferences.write_into(&mut values);
        Ok(())
    }
}
