//! Core `Converter` trait and `HttpConverter` implementation.
//!
//! `HttpConverter` reaches the conversion service over HTTP: one `POST` per
//! call to `{base_url}/{variant_id}` with body `{"s": "<text>"}`, answered by
//! a bare JSON string.  All connection details come from [`ServiceConfig`].

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ServiceConfig;

// ---------------------------------------------------------------------------
// ConvertError
// ---------------------------------------------------------------------------

/// Errors a conversion call can fail with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// HTTP transport or connection error.
    #[error("conversion request failed: {0}")]
    Request(String),

    /// The transport gave up waiting for the service.
    #[error("conversion request timed out")]
    Timeout,

    /// The service answered with a non-success status code.
    #[error("conversion service returned HTTP {0}")]
    Status(u16),

    /// The response body was not the expected JSON string.
    #[error("failed to parse conversion response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ConvertError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ConvertError::Timeout
        } else {
            ConvertError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Converter trait
// ---------------------------------------------------------------------------

/// The remote conversion operation.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn Converter>` between the scheduler's tasks.
///
/// # Arguments
/// * `variant_id` – Selector for the service's mapping table, passed
///   verbatim (see [`crate::variant::VARIANTS`]).
/// * `text`       – Text to convert.
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(&self, variant_id: &str, text: &str) -> Result<String, ConvertError>;
}

// ---------------------------------------------------------------------------
// HttpConverter
// ---------------------------------------------------------------------------

/// Calls the conversion service over HTTP.
pub struct HttpConverter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpConverter {
    /// Build an `HttpConverter` from application config.
    ///
    /// A client timeout is only installed when `config.timeout_secs` is set.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().unwrap_or_else(|e| {
            log::warn!("failed to build HTTP client ({e}); using defaults without a timeout");
            reqwest::Client::new()
        });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL the given variant is posted to.
    pub fn endpoint(&self, variant_id: &str) -> String {
        format!("{}/{}", self.base_url, variant_id)
    }
}

#[async_trait]
impl Converter for HttpConverter {
    async fn convert(&self, variant_id: &str, text: &str) -> Result<String, ConvertError> {
        let body = serde_json::json!({ "s": text });

        let response = self
            .client
            .post(self.endpoint(variant_id))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConvertError::Status(status.as_u16()));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ConvertError::Parse(e.to_string()))?;

        json.as_str()
            .map(str::to_owned)
            .ok_or_else(|| ConvertError::Parse(format!("expected a JSON string, got {json}")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
