use serde::{Deserialize, Serialize};

/// Cached bearer token as persisted in the preference store.
///
/// Serialized as `{"t": <epoch millis>, "token": "<value>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    #[serde(rename = "t")]
    pub issued_at_millis: i64,
    pub token: String,
}

impl TokenRecord {
    pub fn new(token: impl Into<String>, issued_at_millis: i64) -> Self {
        Self {
            issued_at_millis,
            token: token.into(),
        }
    }

    /// Usable only while non-empty and younger than `ttl_millis`.
    ///
    /// A timestamp in the future or too far back to subtract is stale.
    pub fn is_fresh(&self, now_millis: i64, ttl_millis: i64) -> bool {
        !self.token.is_empty()
            && now_millis
                .checked_sub(self.issued_at_millis)
                .is_some_and(|age| (0..ttl_millis).contains(&age))
    }
}

/// One translation run, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub raw_text: String,
    pub max_chunk_length: usize,
    pub split_enabled: bool,
    /// Pacing between chunks, in milliseconds per character of `max_chunk_length`.
    pub inter_chunk_delay_millis_per_char: f64,
}

/// Caller-facing task: `raw` in, `result` filled incrementally.
#[derive(Debug, Clone, Default)]
pub struct TranslateTask {
    pub raw: String,
    pub silent: bool,
    pub result: String,
}

impl TranslateTask {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            silent: false,
            result: String::new(),
        }
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Chunking,
    Translating(usize),
    Done,
    Failed,
}

/// Events a host renders while a pipeline runs.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Refresh {
        result: String,
    },
    Warning(String),
    Finished {
        result: String,
    },
    /// `result` holds whatever was published before the failure
    Failed {
        message: String,
        banned: bool,
        result: String,
    },
}
