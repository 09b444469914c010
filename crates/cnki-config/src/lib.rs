use std::env;

use serde::{Deserialize, Serialize};

use self::prefs::PrefStore;
use self::translator::TranslatorConfig;

pub mod keys;
pub mod prefs;
pub mod translator;

pub use prefs::{JsonFilePrefs, MemoryPrefs, PrefsError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub translator: TranslatorConfig,
    /// Timeout applied to every HTTP request, the core adds none of its own
    pub timeout_seconds: u64,
}

impl Config {
    /// Reads translator settings from `prefs`, then applies environment overrides.
    pub fn load(prefs: &dyn PrefStore) -> Self {
        let timeout_seconds = env::var("TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30); // 30 seconds default

        Config {
            translator: TranslatorConfig::from_prefs(prefs).with_env_overrides(),
            timeout_seconds,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translator: TranslatorConfig::default(),
            timeout_seconds: 30,
        }
    }
}
