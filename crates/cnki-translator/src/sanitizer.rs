use regex::Regex;

use crate::error::TranslateError;

/// Advertisement the service appends to some translations
pub const AD_PAYLOAD: &str = "(查看名企职位领高薪offer！--->智联招聘https://dict.cnki.net/ad.html)";

/// Strips the advertisement and an optional user pattern from translations.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    ad: String,
    pattern: Option<Regex>,
}

impl Sanitizer {
    /// Blank patterns are ignored, invalid ones are a configuration error.
    pub fn new(user_pattern: Option<&str>) -> Result<Self, TranslateError> {
        Self::with_ad(AD_PAYLOAD, user_pattern)
    }

    pub fn with_ad(ad: &str, user_pattern: Option<&str>) -> Result<Self, TranslateError> {
        let pattern = user_pattern
            .filter(|p| !p.is_empty())
            .map(Regex::new)
            .transpose()?;

        Ok(Self {
            ad: ad.to_string(),
            pattern,
        })
    }

    pub fn sanitize(&self, raw: &str) -> String {
        let mut text = raw.to_string();

        // Removal can splice a new occurrence together
        while !self.ad.is_empty() && text.contains(&self.ad) {
            text = text.replace(&self.ad, "");
        }

        if let Some(pattern) = &self.pattern {
            text = pattern.replace_all(&text, "").into_owned();
        }

        text
    }
}

/// One-shot form of [`Sanitizer::sanitize`].
pub fn sanitize(
    raw_translation: &str,
    ad_pattern: &str,
    user_pattern: Option<&str>,
) -> Result<String, TranslateError> {
    Ok(Sanitizer::with_ad(ad_pattern, user_pattern)?.sanitize(raw_translation))
}
