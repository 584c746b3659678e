//! Chat endpoint transport.
//!
//! DESIGN
//! ======
//! `ChatTransport` is the only thing the turn controller knows about the
//! network, which keeps the controller testable with in-process mocks. The
//! production implementation posts JSON with reqwest and classifies every
//! outcome into success or one `ExchangeError`.
//!
//! ERROR HANDLING
//! ==============
//! The user sees a single fixed message for every failure, but the error
//! keeps enough detail (status, body, parser message) for the logs.

use std::time::Duration;

use reqwest::Url;

use super::types::{ChatReply, ChatRequest, parse_reply};
use crate::config::{ClientConfig, ConfigError};

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

// =============================================================================
// ERROR
// =============================================================================

/// Coarse failure category shown to the turn controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request could not be sent or no usable response arrived.
    Transport,
    /// A response arrived but its body was not the expected structure.
    Malformed,
}

#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// The request could not be sent or the response could not be read.
    #[error("chat request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("chat endpoint returned status {status}")]
    Status { status: u16, body: String },

    /// The response body is not a JSON object of the expected shape.
    #[error("chat response malformed: {0}")]
    Malformed(String),
}

impl ExchangeError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) | Self::Status { .. } => FailureKind::Transport,
            Self::Malformed(_) => FailureKind::Malformed,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E_TRANSPORT",
            Self::Status { .. } => "E_STATUS",
            Self::Malformed(_) => "E_MALFORMED",
        }
    }
}

// =============================================================================
// TRANSPORT TRAIT
// =============================================================================

/// One request/response exchange with the chat endpoint.
///
/// Futures are not required to be `Send`: the controller runs on a single
/// event-loop thread.
#[async_trait::async_trait(?Send)]
pub trait ChatTransport {
    /// # Errors
    ///
    /// Returns an [`ExchangeError`] when the request fails, the endpoint
    /// answers with a non-success status, or the body is malformed.
    async fn exchange(&self, request: &ChatRequest) -> Result<ChatReply, ExchangeError>;
}

#[async_trait::async_trait(?Send)]
impl<T: ChatTransport + ?Sized> ChatTransport for std::rc::Rc<T> {
    async fn exchange(&self, request: &ChatRequest) -> Result<ChatReply, ExchangeError> {
        (**self).exchange(request).await
    }
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpChatClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpChatClient {
    /// Build a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the endpoint URL is invalid or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let endpoint = config.endpoint_url()?;
        let mut builder =
            reqwest::Client::builder().connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait(?Send)]
impl ChatTransport for HttpChatClient {
    async fn exchange(&self, request: &ChatRequest) -> Result<ChatReply, ExchangeError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ExchangeError::Status { status: status.as_u16(), body });
        }

        parse_reply(&body)
    }
}
