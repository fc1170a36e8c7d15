//! Remote brief generation service.
//!
//! The workflow talks to the service through the [`BriefingBackend`] trait so
//! tests can substitute a scripted mock for the real HTTP client.

mod http;
mod types;

pub use http::HttpBriefingBackend;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the generation service.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// A document URL returned by the service could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// The four calls the brief workflow makes against the generation service.
#[async_trait]
pub trait BriefingBackend: Send + Sync {
    /// `POST /ingest`: register a company and receive a session id.
    async fn ingest(&self, request: &IngestRequest) -> Result<IngestResponse, BackendError>;

    /// `POST /generate`: kick off generation for a session.
    ///
    /// The response body is ignored; only the HTTP status is reported back.
    async fn trigger_generation(&self, session_id: &str) -> Result<TriggerAck, BackendError>;

    /// `GET /outputs/{session_id}`: current generation status.
    async fn fetch_outputs(&self, session_id: &str) -> Result<OutputsResponse, BackendError>;

    /// Fetch a generated document as raw text.
    async fn fetch_document(&self, url: &str) -> Result<String, BackendError>;
}
