#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cnki_config::MemoryPrefs;
use cnki_config::translator::TranslatorConfig;
use cnki_translator::{
    Clock, CnkiApi, ProgressObserver, TokenResponse, TokenStore, TranslateError,
    TranslateResponse, TranslationPipeline,
};

/// Scripted service: token responses and translation replies are popped in order.
#[derive(Default)]
pub struct FakeApi {
    token_replies: Mutex<VecDeque<Result<TokenResponse, TranslateError>>>,
    translate_replies: Mutex<VecDeque<Result<TranslateResponse, TranslateError>>>,
    pub token_calls: AtomicUsize,
    /// (token header, encoded words) per translation call
    pub submitted: Mutex<Vec<(String, String)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(self, token: &str) -> Self {
        self.push_token(Ok(TokenResponse::success(token)));
        self
    }

    pub fn push_token(&self, reply: Result<TokenResponse, TranslateError>) {
        self.token_replies.lock().unwrap().push_back(reply);
    }

    pub fn push_translation(&self, reply: Result<TranslateResponse, TranslateError>) {
        self.translate_replies.lock().unwrap().push_back(reply);
    }

    pub fn translations<'a>(self, texts: impl IntoIterator<Item = &'a str>) -> Self {
        for text in texts {
            self.push_translation(Ok(TranslateResponse::translated(text)));
        }
        self
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<(String, String)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CnkiApi for FakeApi {
    async fn fetch_token(&self) -> Result<TokenResponse, TranslateError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        self.token_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(TokenResponse::success("fallback-token")))
    }

    async fn translate(
        &self,
        token: &str,
        words: &str,
    ) -> Result<TranslateResponse, TranslateError> {
        self.submitted
            .lock()
            .unwrap()
            .push((token.to_string(), words.to_string()));
        self.translate_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TranslateError::ApiError("no scripted reply".to_string())))
    }
}

#[derive(Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn at(millis: i64) -> Self {
        Self {
            now: AtomicI64::new(millis),
        }
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Records every hook invocation
#[derive(Default)]
pub struct RecordingObserver {
    pub refreshes: AtomicUsize,
    pub warnings: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

impl ProgressObserver for RecordingObserver {
    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}

pub struct Harness {
    pub api: Arc<FakeApi>,
    pub prefs: Arc<MemoryPrefs>,
    pub clock: Arc<ManualClock>,
    pub observer: Arc<RecordingObserver>,
    pub pipeline: TranslationPipeline,
}

impl Harness {
    pub fn new(api: FakeApi, config: TranslatorConfig) -> Self {
        let api = Arc::new(api);
        let prefs = Arc::new(MemoryPrefs::new());
        let clock = Arc::new(ManualClock::at(1_700_000_000_000));
        let observer = Arc::new(RecordingObserver::default());

        let tokens = TokenStore::new(api.clone(), prefs.clone()).with_clock(clock.clone());
        let pipeline = TranslationPipeline::new(api.clone(), tokens, config, observer.clone())
            .expect("valid pipeline config");

        Self {
            api,
            prefs,
            clock,
            observer,
            pipeline,
        }
    }
}

pub fn config(use_split: bool, max_length: usize) -> TranslatorConfig {
    TranslatorConfig {
        use_split,
        split_second: 0.0,
        max_length,
        ..TranslatorConfig::default()
    }
}
