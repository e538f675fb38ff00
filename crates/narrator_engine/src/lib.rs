//! Narrator engine: IO pipeline and effect execution.
mod decode;
mod engine;
mod filename;
mod persist;
mod retrieve;
mod submit;
mod types;

pub use decode::{decode_text, DecodeError, DecodedText};
pub use engine::{EngineConfig, EngineHandle};
pub use filename::{base_name, base_name_for_path};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use retrieve::{ArtifactRetriever, ReqwestArtifactRetriever};
pub use submit::{
    ProgressSink, ReqwestSynthesisClient, SubmitSettings, SynthesisClient, SynthesisRequest,
    SynthesisResponse,
};
pub use types::{
    EngineEvent, FailureKind, JobId, JobOutcome, JobProgress, PendingJob, Stage, SubmitError,
    GENERIC_FAILURE_MESSAGE,
};
