use std::sync::Arc;
use std::time::Duration;

use cnki_config::translator::TranslatorConfig;
use cnki_types::{PipelineState, TranslateTask, TranslationRequest};

use crate::api::CnkiApi;
use crate::chunker;
use crate::encoder::TextEncoder;
use crate::error::TranslateError;
use crate::observer::ProgressObserver;
use crate::result::TranslationResult;
use crate::sanitizer::Sanitizer;
use crate::token::TokenStore;

/// Token, encode, submit, sanitize, publish; one chunk at a time.
pub struct TranslationPipeline {
    api: Arc<dyn CnkiApi>,
    tokens: TokenStore,
    encoder: TextEncoder,
    sanitizer: Sanitizer,
    config: TranslatorConfig,
    observer: Arc<dyn ProgressObserver>,
}

impl TranslationPipeline {
    /// Fails only when the configured cleanup pattern does not compile.
    pub fn new(
        api: Arc<dyn CnkiApi>,
        tokens: TokenStore,
        config: TranslatorConfig,
        observer: Arc<dyn ProgressObserver>,
    ) -> Result<Self, TranslateError> {
        let sanitizer = Sanitizer::new(config.regex.as_deref())?;

        Ok(Self {
            api,
            tokens,
            encoder: TextEncoder::new(),
            sanitizer,
            config,
            observer,
        })
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Host entry point: translates `task.raw` with the configured settings
    /// and leaves whatever was published in `task.result`, even on failure.
    pub async fn run_task(
        &self,
        task: &mut TranslateTask,
        result: &TranslationResult,
    ) -> Result<(), TranslateError> {
        let request = self.config.request(task.raw.as_str());
        let outcome = self.execute(&request, task.silent, result).await;
        task.result = result.text();
        outcome
    }

    pub async fn translate(
        &self,
        request: &TranslationRequest,
        result: &TranslationResult,
    ) -> Result<(), TranslateError> {
        self.execute(request, false, result).await
    }

    async fn execute(
        &self,
        request: &TranslationRequest,
        silent: bool,
        result: &TranslationResult,
    ) -> Result<(), TranslateError> {
        result.reset();

        let outcome = if request.split_enabled {
            self.translate_chunked(request, result).await
        } else {
            self.translate_whole(request, silent, result).await
        };

        match &outcome {
            Ok(()) => {
                result.set_state(PipelineState::Done);
                tracing::info!("Translation finished ({} chars)", result.text().chars().count());
            }
            Err(e) => {
                result.set_state(PipelineState::Failed);
                tracing::error!("Translation failed: {e}");
            }
        }

        outcome
    }

    async fn translate_whole(
        &self,
        request: &TranslationRequest,
        silent: bool,
        result: &TranslationResult,
    ) -> Result<(), TranslateError> {
        let max_length = request.max_chunk_length;
        let text = match truncate_chars(&request.raw_text, max_length) {
            Some(truncated) => {
                let message = format!(
                    "Maximum text length is {max_length}, {} selected. Will only translate first {max_length} characters.",
                    request.raw_text.chars().count()
                );
                tracing::warn!("{message}");
                if !silent {
                    self.observer.warn(&message);
                }
                truncated
            }
            None => request.raw_text.as_str(),
        };

        result.set_state(PipelineState::Translating(0));
        let translated = self.translate_text(text).await?;

        result.publish(&translated);
        self.observer.refresh();

        Ok(())
    }

    async fn translate_chunked(
        &self,
        request: &TranslationRequest,
        result: &TranslationResult,
    ) -> Result<(), TranslateError> {
        result.set_state(PipelineState::Chunking);
        let chunks = chunker::split(&request.raw_text, request.max_chunk_length);
        let pacing = pacing_delay(request);
        tracing::debug!("Split into {} chunks, pacing {:?}", chunks.len(), pacing);

        let mut translated = String::new();
        for (index, chunk) in chunks.iter().enumerate() {
            if index > 0 && !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }

            result.set_state(PipelineState::Translating(index));
            tracing::debug!("Translating chunk {}/{}", index + 1, chunks.len());

            let text = self.translate_text(chunk).await?;
            translated.push_str(&text);
            translated.push(' ');

            result.publish(translated.trim());
            self.observer.refresh();
        }

        Ok(())
    }

    async fn translate_text(&self, text: &str) -> Result<String, TranslateError> {
        let token = self.tokens.get_token(false).await?;
        let words = self.encoder.encode(text);

        let response = self.api.translate(&token, &words).await?;
        if response.is_banned() {
            return Err(TranslateError::banned());
        }

        Ok(self.sanitizer.sanitize(response.text()))
    }
}

/// `Some` prefix of `max_length` chars when `text` is longer.
fn truncate_chars(text: &str, max_length: usize) -> Option<&str> {
    text.char_indices()
        .nth(max_length)
        .map(|(index, _)| &text[..index])
}

fn pacing_delay(request: &TranslationRequest) -> Duration {
    let millis = request.inter_chunk_delay_millis_per_char * request.max_chunk_length as f64;

    if millis.is_finite() && millis > 0.0 {
        Duration::try_from_secs_f64(millis / 1000.0).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
