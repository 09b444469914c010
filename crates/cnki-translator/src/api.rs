use std::time::Duration;

use async_trait::async_trait;
use cnki_config::translator::TranslatorConfig;
use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";
const SUCCESS_CODE: i64 = 200;

/// Remote dictionary service
#[async_trait]
pub trait CnkiApi: Send + Sync {
    /// GET the token endpoint
    async fn fetch_token(&self) -> Result<TokenResponse, TranslateError>;

    /// POST one encoded chunk
    async fn translate(
        &self,
        token: &str,
        words: &str,
    ) -> Result<TranslateResponse, TranslateError>;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl TokenResponse {
    pub fn success(token: impl Into<String>) -> Self {
        Self {
            code: Some(SUCCESS_CODE),
            data: Some(serde_json::Value::String(token.into())),
        }
    }

    /// Token value, only for an application-level 200
    pub fn token(&self) -> Option<&str> {
        if self.code != Some(SUCCESS_CODE) {
            return None;
        }

        self.data.as_ref().and_then(|d| d.as_str())
    }
}

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    words: &'a str,
    #[serde(rename = "translateType")]
    translate_type: Option<&'a str>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub data: Option<TranslateData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateData {
    #[serde(default, rename = "mResult")]
    pub m_result: Option<String>,
    #[serde(default)]
    pub is_input_verification_code: Option<bool>,
}

impl TranslateResponse {
    pub fn translated(text: impl Into<String>) -> Self {
        Self {
            data: Some(TranslateData {
                m_result: Some(text.into()),
                is_input_verification_code: None,
            }),
        }
    }

    pub fn verification_required() -> Self {
        Self {
            data: Some(TranslateData {
                m_result: None,
                is_input_verification_code: Some(true),
            }),
        }
    }

    pub fn is_banned(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|d| d.is_input_verification_code)
            .unwrap_or(false)
    }

    /// Missing text reads as empty
    pub fn text(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|d| d.m_result.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    token_url: String,
    translate_url: String,
}

impl HttpApi {
    pub fn new(
        token_url: String,
        translate_url: String,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            token_url,
            translate_url,
        })
    }

    pub fn from_config(
        config: &TranslatorConfig,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        Self::new(
            config.token_url.clone(),
            config.translate_url.clone(),
            timeout,
        )
    }

    async fn read_json<T>(response: reqwest::Response, what: &str) -> Result<T, TranslateError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| TranslateError::DecodeError(format!("Failed to parse {what}: {e}")))
    }
}

#[async_trait]
impl CnkiApi for HttpApi {
    async fn fetch_token(&self) -> Result<TokenResponse, TranslateError> {
        let response = self.client.get(&self.token_url).send().await?;

        Self::read_json(response, "token response").await
    }

    async fn translate(
        &self,
        token: &str,
        words: &str,
    ) -> Result<TranslateResponse, TranslateError> {
        let body = serde_json::to_string(&TranslateBody {
            words,
            translate_type: None,
        })
        .map_err(|e| TranslateError::DecodeError(format!("Failed to encode request: {e}")))?;

        let response = self
            .client
            .post(&self.translate_url)
            .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header("Token", token)
            .body(body)
            .send()
            .await?;

        Self::read_json(response, "translation response").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_only_on_code_200() {
        let ok: TokenResponse = serde_json::from_str(r#"{"code":200,"data":"abc"}"#).unwrap();
        assert_eq!(ok.token(), Some("abc"));

        let denied: TokenResponse =
            serde_json::from_str(r#"{"code":500,"data":"abc","msg":"busy"}"#).unwrap();
        assert_eq!(denied.token(), None);

        let odd: TokenResponse = serde_json::from_str(r#"{"code":200,"data":{"x":1}}"#).unwrap();
        assert_eq!(odd.token(), None);
    }

    #[test]
    fn translate_body_sends_null_type() {
        let body = serde_json::to_value(TranslateBody {
            words: "Zm9v",
            translate_type: None,
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({ "words": "Zm9v", "translateType": null }));
    }

    #[test]
    fn translate_response_fields() {
        let response: TranslateResponse = serde_json::from_str(
            r#"{"code":200,"data":{"mResult":"你好","isInputVerificationCode":false}}"#,
        )
        .unwrap();
        assert_eq!(response.text(), "你好");
        assert!(!response.is_banned());

        let banned: TranslateResponse =
            serde_json::from_str(r#"{"data":{"isInputVerificationCode":true}}"#).unwrap();
        assert!(banned.is_banned());
        assert_eq!(banned.text(), "");

        let empty: TranslateResponse = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert_eq!(empty.text(), "");
        assert!(!empty.is_banned());
    }
}
