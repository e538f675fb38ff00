use std::fmt;
use std::path::PathBuf;

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Queued,
    Reading,
    Uploading,
    Settling,
    Retrieving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub job_id: JobId,
    pub stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(JobProgress),
    JobCompleted {
        job_id: JobId,
        result: Result<JobOutcome, SubmitError>,
    },
}

/// In-flight submission record. Created once the input file has been read
/// and decoded, consumed when the wire request is built; nothing of it
/// survives job resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingJob {
    pub source_name: String,
    pub raw_text: String,
    pub submitted_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    /// Artifact name reported by the synthesis service.
    pub name: String,
    /// Retrieval locator reported by the synthesis service.
    pub url: String,
    /// Local copy of the artifact, when retrieval is configured and succeeded.
    pub saved_path: Option<PathBuf>,
}

/// Fallback shown when a failure carries no descriptive text of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Upload failed. Please try again";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitError {
    pub kind: FailureKind,
    pub message: String,
}

impl SubmitError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Message for the user-visible error slot: the underlying text when
    /// there is any, the generic fallback otherwise.
    pub fn user_message(&self) -> String {
        if self.message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            self.message.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    FileRead,
    DecodeFailure,
    InvalidEndpoint,
    HttpStatus(u16),
    Timeout,
    Network,
    MalformedResponse,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Persist,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::FileRead => write!(f, "file read error"),
            FailureKind::DecodeFailure => write!(f, "decode failure"),
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "artifact too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Persist => write!(f, "persist error"),
        }
    }
}
