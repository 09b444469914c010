use std::env;

use cnki_types::TranslationRequest;
use serde::{Deserialize, Serialize};

use crate::keys;
use crate::prefs::PrefStore;

fn default_use_split() -> bool {
    true
}

fn default_split_second() -> f64 {
    0.5
}

fn default_max_length() -> usize {
    1000
}

fn default_token_url() -> String {
    "https://dict.cnki.net/fyzs-front-api/getToken".to_string()
}

fn default_translate_url() -> String {
    "https://dict.cnki.net/fyzs-front-api/translate/literaltranslation".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Split long input into sentence-aligned chunks
    #[serde(default = "default_use_split")]
    pub use_split: bool,
    /// Pacing between chunks, milliseconds per character of `max_length`
    #[serde(default = "default_split_second")]
    pub split_second: f64,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Extra pattern stripped from every translation
    #[serde(default)]
    pub regex: Option<String>,
    #[serde(default = "default_token_url")]
    pub token_url: String,
    #[serde(default = "default_translate_url")]
    pub translate_url: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            use_split: default_use_split(),
            split_second: default_split_second(),
            max_length: default_max_length(),
            regex: None,
            token_url: default_token_url(),
            translate_url: default_translate_url(),
        }
    }
}

impl TranslatorConfig {
    /// Missing or mistyped entries fall back to their defaults.
    pub fn from_prefs(prefs: &dyn PrefStore) -> Self {
        let defaults = Self::default();

        Self {
            use_split: prefs.get_bool(keys::USE_SPLIT).unwrap_or(defaults.use_split),
            split_second: prefs
                .get_f64(keys::SPLIT_SECOND)
                .unwrap_or(defaults.split_second),
            max_length: prefs
                .get_u64(keys::MAX_LENGTH)
                .and_then(|v| usize::try_from(v).ok())
                .unwrap_or(defaults.max_length),
            regex: prefs.get_str(keys::REGEX).filter(|r| !r.is_empty()),
            ..defaults
        }
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(use_split) = env::var("CNKI_USE_SPLIT").ok().and_then(|v| v.parse().ok()) {
            self.use_split = use_split;
        }

        if let Some(split_second) = env::var("CNKI_SPLIT_SECOND")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.split_second = split_second;
        }

        if let Some(max_length) = env::var("CNKI_MAX_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.max_length = max_length;
        }

        if let Ok(regex) = env::var("CNKI_REGEX") {
            self.regex = Some(regex).filter(|r| !r.is_empty());
        }

        if let Ok(url) = env::var("CNKI_TOKEN_URL") {
            self.token_url = url;
        }

        if let Ok(url) = env::var("CNKI_TRANSLATE_URL") {
            self.translate_url = url;
        }

        self
    }

    pub fn request(&self, raw_text: impl Into<String>) -> TranslationRequest {
        TranslationRequest {
            raw_text: raw_text.into(),
            max_chunk_length: self.max_length,
            split_enabled: self.use_split,
            inter_chunk_delay_millis_per_char: self.split_second,
        }
    }
}
