use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("failed to access preference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid preference file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("preference file {0} does not hold a JSON object")]
    NotAnObject(PathBuf),
}

/// Key-value preference store
///
/// Values are JSON so numeric, boolean and string entries share one backend.
pub trait PrefStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value) -> Result<(), PrefsError>;

    fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_str().map(str::to_owned))
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.as_f64())
    }

    /// Whole-valued floats such as `1000.0` count too
    fn get_u64(&self, key: &str) -> Option<u64> {
        let value = self.get(key)?;
        value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        })
    }
}

/// In-process store, nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            values: RwLock::new(values.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }
}

impl PrefStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), PrefsError> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
///
/// The whole file is rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFilePrefs {
    path: PathBuf,
    values: RwLock<Map<String, Value>>,
}

impl JsonFilePrefs {
    /// Opens `path`, a missing file starts an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PrefsError> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let data = fs::read_to_string(&path).map_err(|source| PrefsError::Io {
                path: path.clone(),
                source,
            })?;

            if data.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&data) {
                    Ok(Value::Object(map)) => map,
                    Ok(_) => return Err(PrefsError::NotAnObject(path)),
                    Err(source) => return Err(PrefsError::Json { path, source }),
                }
            }
        } else {
            tracing::debug!("Preference file {} not found, starting empty", path.display());
            Map::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    fn flush(&self, values: &Map<String, Value>) -> Result<(), PrefsError> {
        let data = serde_json::to_string_pretty(values).map_err(|source| PrefsError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| PrefsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, data).map_err(|source| PrefsError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl PrefStore for JsonFilePrefs {
    fn get(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), PrefsError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value);
        self.flush(&values)
    }
}
