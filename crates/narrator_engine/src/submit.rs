use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{EngineEvent, FailureKind, JobId, JobProgress, Stage, SubmitError};

/// Wire payload sent to the synthesis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub filename: String,
}

/// Locator for the produced audio artifact, as reported by the service.
/// Unknown extra fields in the response body are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SynthesisResponse {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Wait imposed after a successful exchange before the job completes.
    /// Heuristic buffer for storage propagation in the remote service, not
    /// a correctness guarantee.
    pub settle_delay: Duration,
    pub max_artifact_bytes: u64,
}

impl SubmitSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_millis(2000),
            max_artifact_bytes: 50 * 1024 * 1024,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait SynthesisClient: Send + Sync {
    /// Single request/response exchange: no chunking, no retry, at most one
    /// outcome per call.
    async fn synthesize(
        &self,
        job_id: JobId,
        request: &SynthesisRequest,
        sink: &dyn ProgressSink,
    ) -> Result<SynthesisResponse, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSynthesisClient {
    settings: SubmitSettings,
}

impl ReqwestSynthesisClient {
    pub fn new(settings: SubmitSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, SubmitError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| SubmitError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl SynthesisClient for ReqwestSynthesisClient {
    async fn synthesize(
        &self,
        job_id: JobId,
        request: &SynthesisRequest,
        sink: &dyn ProgressSink,
    ) -> Result<SynthesisResponse, SubmitError> {
        let endpoint = reqwest::Url::parse(&self.settings.endpoint)
            .map_err(|err| SubmitError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        let client = self.build_client()?;

        sink.emit(EngineEvent::Progress(JobProgress {
            job_id,
            stage: Stage::Uploading,
        }));

        let response = client
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            // Every non-success status is the same failure class; the body
            // is not consulted.
            return Err(SubmitError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        parse_response(&body)
    }
}

/// Validate the success body: a JSON object with string `name` and `url`
/// fields. The response is untrusted input; anything else is a malformed
/// response, never a placeholder result.
fn parse_response(body: &[u8]) -> Result<SynthesisResponse, SubmitError> {
    serde_json::from_slice::<SynthesisResponse>(body)
        .map_err(|err| SubmitError::new(FailureKind::MalformedResponse, err.to_string()))
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::new(FailureKind::Timeout, err.to_string());
    }
    SubmitError::new(FailureKind::Network, err.to_string())
}
