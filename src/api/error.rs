use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;

/// Generic message shown when nothing more specific is known
pub const GENERIC_FAILURE: &str = "Something went wrong. Try again.";

/// Errors surfaced by the remote API and the controllers wrapping it
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Bad form input, caught before any network call
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing, invalid or expired token, or a non-admin role
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The request never completed
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response carrying a server message
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("unable to decode response: {0}")]
    Decode(String),

    #[error("session storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn is_authorization(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Inline message for the control that triggered the request.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(message)
            | ApiError::Unauthorized(message)
            | ApiError::Server { message, .. } => message.clone(),
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::Storage(_) => {
                GENERIC_FAILURE.to_string()
            }
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Pull the server-supplied message out of an error body, if there is one.
pub fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|message| !message.trim().is_empty())
}

#[async_trait]
pub trait ResponseExt {
    /// Turn a non-2xx response into an `ApiError`, using `fallback` when the
    /// body carries no message.
    async fn map_api_error(self, fallback: &str) -> Result<Response, ApiError>;
}

#[async_trait]
impl ResponseExt for Response {
    async fn map_api_error(self, fallback: &str) -> Result<Response, ApiError> {
        let status = self.status();
        if status.is_success() {
            return Ok(self);
        }

        let body = self.text().await.unwrap_or_default();
        let message = server_message(&body).unwrap_or_else(|| fallback.to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ApiError::Unauthorized(message))
            }
            _ => Err(ApiError::Server {
                status: status.as_u16(),
                message,
            }),
        }
    }
}

#[async_trait]
impl ResponseExt for Result<Response, reqwest::Error> {
    async fn map_api_error(self, fallback: &str) -> Result<Response, ApiError> {
        match self {
            Ok(response) => response.map_api_error(fallback).await,
            Err(e) => Err(ApiError::Network(e)),
        }
    }
}
