use std::sync::{Arc, PoisonError, RwLock};

use cnki_types::PipelineState;

#[derive(Debug, Default)]
struct Published {
    text: String,
    state: PipelineState,
}

/// Shared view of a running translation.
///
/// Clones observe the same value, so a host can read the partial result
/// while the pipeline is still working.
#[derive(Debug, Clone, Default)]
pub struct TranslationResult {
    inner: Arc<RwLock<Published>>,
}

impl TranslationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .text
            .clone()
    }

    pub fn state(&self) -> PipelineState {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).state
    }

    pub(crate) fn publish(&self, text: &str) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.text.clear();
        inner.text.push_str(text);
    }

    pub(crate) fn set_state(&self, state: PipelineState) {
        tracing::trace!("Pipeline state: {state:?}");
        self.inner.write().unwrap_or_else(PoisonError::into_inner).state = state;
    }

    pub(crate) fn reset(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Published::default();
    }
}
