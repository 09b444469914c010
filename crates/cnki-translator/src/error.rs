/// Shown to the user when the service demands human verification.
pub const BAN_MESSAGE: &str = "Your access is temporarily banned by the CNKI service. Please goto https://dict.cnki.net/, translate manually and pass human verification.";

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("{0}")]
    AccessBanned(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    DecodeError(String),

    #[error("Invalid cleanup pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl TranslateError {
    pub fn banned() -> Self {
        Self::AccessBanned(BAN_MESSAGE.to_string())
    }

    pub fn is_access_banned(&self) -> bool {
        matches!(self, Self::AccessBanned(_))
    }

    /// Network failure, bad HTTP status or unreadable body
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ApiError(_) | Self::NetworkError(_) | Self::DecodeError(_)
        )
    }
}
