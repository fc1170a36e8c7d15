//! Wire types for the generation service API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `POST /ingest`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    pub company_name: String,
    pub interviewee_email: String,
}

/// Response of `POST /ingest`.
///
/// Only `sessionId` is used; any other fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl IngestResponse {
    /// The session id, if the service returned a non-empty one.
    pub fn session_id(&self) -> Option<&str> {
        non_empty(self.session_id.as_deref())
    }
}

/// Body of `POST /generate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub session_id: String,
}

/// Outcome of `POST /generate`. The body is never inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerAck {
    /// HTTP status code returned by the service.
    pub status: u16,
}

impl TriggerAck {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Generation status reported by `GET /outputs/{session_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputStatus {
    Pending,
    Complete,
    Generated,
    Failed,
    /// Any value the service may send that we don't know about.
    Unrecognized(String),
}

impl OutputStatus {
    /// `COMPLETE` and `GENERATED` both mean the documents are ready.
    pub fn is_success(&self) -> bool {
        matches!(self, OutputStatus::Complete | OutputStatus::Generated)
    }

    /// Whether polling should stop on this status.
    pub fn is_terminal(&self) -> bool {
        self.is_success() || matches!(self, OutputStatus::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            OutputStatus::Pending => "PENDING",
            OutputStatus::Complete => "COMPLETE",
            OutputStatus::Generated => "GENERATED",
            OutputStatus::Failed => "FAILED",
            OutputStatus::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for OutputStatus {
    fn from(raw: String) -> Self {
        // Exact match: the service sends upper-case tags.
        match raw.as_str() {
            "PENDING" => OutputStatus::Pending,
            "COMPLETE" => OutputStatus::Complete,
            "GENERATED" => OutputStatus::Generated,
            "FAILED" => OutputStatus::Failed,
            _ => OutputStatus::Unrecognized(raw),
        }
    }
}

impl From<OutputStatus> for String {
    fn from(status: OutputStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OutputStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response of `GET /outputs/{session_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputsResponse {
    /// Missing or null is treated like an unrecognized status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OutputStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interviewer_brief_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_interview_packet_url: Option<String>,
}

impl OutputsResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_ref().is_some_and(OutputStatus::is_success)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, Some(OutputStatus::Failed))
    }

    pub fn session_id(&self) -> Option<&str> {
        non_empty(self.session_id.as_deref())
    }

    pub fn interviewer_brief_url(&self) -> Option<&str> {
        non_empty(self.interviewer_brief_url.as_deref())
    }

    pub fn pre_interview_packet_url(&self) -> Option<&str> {
        non_empty(self.pre_interview_packet_url.as_deref())
    }

    /// Status label for logs and metrics.
    pub fn status_label(&self) -> &str {
        self.status.as_ref().map(OutputStatus::as_str).unwrap_or("<missing>")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
