use futures_util::StreamExt;

use crate::submit::{map_reqwest_error, SubmitSettings};
use crate::{FailureKind, SubmitError};

/// Downloads a produced audio artifact from its retrieval locator.
#[async_trait::async_trait]
pub trait ArtifactRetriever: Send + Sync {
    async fn retrieve(&self, url: &str) -> Result<Vec<u8>, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestArtifactRetriever {
    settings: SubmitSettings,
}

impl ReqwestArtifactRetriever {
    pub fn new(settings: SubmitSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl ArtifactRetriever for ReqwestArtifactRetriever {
    async fn retrieve(&self, url: &str) -> Result<Vec<u8>, SubmitError> {
        // The locator came from the service response; a bad one is a
        // malformed response, not a caller error.
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| SubmitError::new(FailureKind::MalformedResponse, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| SubmitError::new(FailureKind::Network, err.to_string()))?;

        let response = client.get(parsed).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_artifact_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(SubmitError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "artifact too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(SubmitError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "artifact too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}
