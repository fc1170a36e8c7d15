//! reqwest implementation of the generation service client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::metrics::record_backend_request;

use super::{
    BackendError, BriefingBackend, GenerateRequest, IngestRequest, IngestResponse,
    OutputsResponse, TriggerAck,
};

/// HTTP client for the generation service.
pub struct HttpBriefingBackend {
    client: Client,
    base_url: String,
}

impl HttpBriefingBackend {
    /// Create a new client from configuration.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn outputs_url(&self, session_id: &str) -> String {
        format!(
            "{}/outputs/{}",
            self.base_url,
            urlencoding::encode(session_id)
        )
    }
}

/// Parse a JSON reply whatever its HTTP status.
///
/// The service answers some non-2xx statuses with a JSON body (a 404 while
/// outputs do not exist yet, a 500 without `sessionId`); those are handed to
/// the workflow like any other payload. A non-2xx reply that is not JSON
/// becomes [`BackendError::ApiError`].
async fn parse_json<T: DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await?;

    match serde_json::from_str(&body) {
        Ok(parsed) => {
            if !status.is_success() {
                warn!("{} answered HTTP {} with a JSON body", what, status.as_u16());
            }
            Ok(parsed)
        }
        Err(_) if !status.is_success() => Err(BackendError::ApiError {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        }),
        Err(e) => Err(BackendError::ParseError(format!(
            "invalid {} response: {}",
            what, e
        ))),
    }
}

#[async_trait]
impl BriefingBackend for HttpBriefingBackend {
    async fn ingest(&self, request: &IngestRequest) -> Result<IngestResponse, BackendError> {
        let started = Instant::now();
        let url = format!("{}/ingest", self.base_url);

        debug!("Ingest: company='{}'", request.company_name);

        let result: Result<IngestResponse, BackendError> = async {
            let response = self.client.post(&url).json(request).send().await?;
            parse_json::<IngestResponse>(response, "ingest").await
        }
        .await;

        record_backend_request("ingest", started, result.is_ok());
        result
    }

    async fn trigger_generation(&self, session_id: &str) -> Result<TriggerAck, BackendError> {
        let started = Instant::now();
        let url = format!("{}/generate", self.base_url);
        let body = GenerateRequest {
            session_id: session_id.to_string(),
        };

        debug!("Trigger generation: session={}", session_id);

        let result = self.client.post(&url).json(&body).send().await;
        record_backend_request("generate", started, result.is_ok());

        let response = result?;
        let ack = TriggerAck {
            status: response.status().as_u16(),
        };
        if !ack.is_success() {
            warn!(
                "Generation trigger for session {} answered HTTP {}",
                session_id, ack.status
            );
        }
        Ok(ack)
    }

    async fn fetch_outputs(&self, session_id: &str) -> Result<OutputsResponse, BackendError> {
        let started = Instant::now();
        let url = self.outputs_url(session_id);

        let result: Result<OutputsResponse, BackendError> = async {
            let response = self.client.get(&url).send().await?;
            parse_json::<OutputsResponse>(response, "outputs").await
        }
        .await;

        record_backend_request("outputs", started, result.is_ok());
        if let Ok(outputs) = &result {
            debug!(
                "Outputs: session={} status={}",
                session_id,
                outputs.status_label()
            );
        }
        result
    }

    async fn fetch_document(&self, url: &str) -> Result<String, BackendError> {
        let url = Url::parse(url).map_err(|e| BackendError::InvalidUrl(format!("{}: {}", url, e)))?;
        let started = Instant::now();

        debug!("Fetch document: {}", url);

        let result: Result<String, BackendError> = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                // The body is shown as the document text.
                warn!("Document {} answered HTTP {}", response.url(), status.as_u16());
            }
            Ok(response.text().await?)
        }
        .await;

        record_backend_request("document", started, result.is_ok());
        result
    }
}
