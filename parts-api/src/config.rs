use reqwest::Url;
use std::time::Duration;

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.beta.partstech.com";

/// Connection settings for [`crate::PartsApi`]
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Applied to every request; an elapsed timeout surfaces as a transport error
    pub timeout: Duration,
    /// Token lifetime assumed when the auth response carries no `expiresIn`
    pub default_token_ttl: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_token_ttl(mut self, ttl: Duration) -> Self {
        self.default_token_ttl = ttl;
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// `path` followed by one percent-encoded segment, so ids taken from
    /// user text cannot add path segments, a query or a fragment
    pub(crate) fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| ApiError::Precondition(format!("invalid base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Precondition("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            default_token_ttl: Duration::from_secs(3600),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_is_percent_encoded() {
        let config = ApiConfig::new("http://localhost:9000/");
        let url = config
            .url_with_segment("/catalog/parts", "A?B/C#D")
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/catalog/parts/A%3FB%2FC%23D");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn unusable_base_url_is_rejected() {
        let config = ApiConfig::new("not a url");
        assert!(matches!(
            config.url_with_segment("/catalog/parts", "ABC123"),
            Err(ApiError::Precondition(_))
        ));
    }
}
