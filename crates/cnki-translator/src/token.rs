use std::sync::Arc;

use cnki_config::keys;
use cnki_config::prefs::PrefStore;
use cnki_types::TokenRecord;

use crate::api::CnkiApi;
use crate::clock::{Clock, SystemClock};
use crate::error::TranslateError;

/// Five minutes
pub const TOKEN_TTL_MILLIS: i64 = 300_000;

/// Bearer token cache persisted under `cnkiToken`.
///
/// Concurrent callers may both refresh an expired token; the last write wins
/// and either token is accepted by the service.
#[derive(Clone)]
pub struct TokenStore {
    api: Arc<dyn CnkiApi>,
    prefs: Arc<dyn PrefStore>,
    clock: Arc<dyn Clock>,
    ttl_millis: i64,
}

impl TokenStore {
    pub fn new(api: Arc<dyn CnkiApi>, prefs: Arc<dyn PrefStore>) -> Self {
        Self {
            api,
            prefs,
            clock: Arc::new(SystemClock),
            ttl_millis: TOKEN_TTL_MILLIS,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Persisted record, if one parses
    pub fn cached(&self) -> Option<TokenRecord> {
        let raw = self.prefs.get_str(keys::TOKEN)?;

        match serde_json::from_str::<TokenRecord>(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("Ignoring malformed cached token: {e}");
                None
            }
        }
    }

    /// Returns the cached token while fresh, otherwise refreshes it.
    ///
    /// A refresh answered with a non-200 code yields an empty token.
    pub async fn get_token(&self, force_refresh: bool) -> Result<String, TranslateError> {
        if !force_refresh
            && let Some(record) = self.cached()
            && record.is_fresh(self.clock.now_millis(), self.ttl_millis)
        {
            tracing::debug!("Using cached token");
            return Ok(record.token);
        }

        self.refresh().await
    }

    async fn refresh(&self) -> Result<String, TranslateError> {
        tracing::debug!("Refreshing token");
        let response = self.api.fetch_token().await?;

        let Some(token) = response.token() else {
            tracing::warn!(
                "Token refresh failed (code {:?}), continuing without token",
                response.code
            );
            return Ok(String::new());
        };

        let record = TokenRecord::new(token, self.clock.now_millis());
        match serde_json::to_string(&record) {
            Ok(raw) => {
                if let Err(e) = self.prefs.set(keys::TOKEN, serde_json::Value::String(raw)) {
                    tracing::warn!("Failed to persist token: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize token: {e}"),
        }

        tracing::info!("Token refreshed");
        Ok(record.token)
    }
}
