//! Client configuration.
//!
//! Values come from CLI flags with environment fallbacks (see `main.rs`);
//! this module holds the typed result, its defaults and URL validation.

use reqwest::Url;

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CHAT_PATH: &str = "/chat";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The base URL does not parse or the joined endpoint is not a URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Only `http` and `https` endpoints are supported.
    #[error("unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub chat_path: String,
    pub connect_timeout_secs: u64,
    /// `None` waits for the endpoint indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// Open `checkout_url` targets with the system URL handler.
    pub open_checkout: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            chat_path: DEFAULT_CHAT_PATH.to_owned(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: None,
            open_checkout: true,
        }
    }
}

impl ClientConfig {
    /// Validated base URL; relative checkout links resolve against it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL does not parse or is not http(s).
    pub fn base(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(self.base_url.trim()).map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::UnsupportedScheme(other.to_owned())),
        }
    }

    /// Full chat endpoint: base URL with `chat_path` appended.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base URL is invalid.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let base = self.base()?;
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            self.chat_path.trim().trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ConfigError::InvalidBaseUrl(e.to_string()))
    }
}
