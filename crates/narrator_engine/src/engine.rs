use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_info, engine_warn};

use crate::persist::AtomicFileWriter;
use crate::retrieve::{ArtifactRetriever, ReqwestArtifactRetriever};
use crate::submit::{
    ChannelProgressSink, ProgressSink, ReqwestSynthesisClient, SubmitSettings, SynthesisClient,
    SynthesisRequest, SynthesisResponse,
};
use crate::{
    base_name_for_path, decode_text, EngineEvent, FailureKind, JobId, JobOutcome, JobProgress,
    PendingJob, Stage, SubmitError,
};

pub struct EngineConfig {
    pub settings: SubmitSettings,
    /// When set, produced artifacts are downloaded here after settling.
    pub output_dir: Option<PathBuf>,
    /// Clock injected by the platform; stamps each job's submission time.
    pub submitted_utc: Arc<dyn Fn() -> String + Send + Sync>,
}

impl EngineConfig {
    pub fn new(settings: SubmitSettings) -> Self {
        Self {
            settings,
            output_dir: None,
            submitted_utc: Arc::new(|| "unknown".to_string()),
        }
    }
}

enum EngineCommand {
    Submit { job_id: JobId, path: PathBuf },
}

pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let client = Arc::new(ReqwestSynthesisClient::new(config.settings.clone()));
        let retriever = Arc::new(ReqwestArtifactRetriever::new(config.settings.clone()));
        let config = Arc::new(config);

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let retriever = retriever.clone();
                let config = config.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(
                        client.as_ref(),
                        retriever.as_ref(),
                        &config,
                        command,
                        event_tx,
                    )
                    .await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    /// Hand a file to the pipeline. There is no cancellation: a job runs to
    /// its single completion event even if nobody is listening for it any
    /// more.
    pub fn enqueue(&self, job_id: JobId, path: impl Into<PathBuf>) {
        let _ = self.cmd_tx.send(EngineCommand::Submit {
            job_id,
            path: path.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    client: &dyn SynthesisClient,
    retriever: &dyn ArtifactRetriever,
    config: &EngineConfig,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Submit { job_id, path } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            sink.emit(EngineEvent::Progress(JobProgress {
                job_id,
                stage: Stage::Queued,
            }));
            let result = run_job(client, retriever, config, job_id, &path, &sink).await;
            let _ = event_tx.send(EngineEvent::JobCompleted { job_id, result });
        }
    }
}

async fn run_job(
    client: &dyn SynthesisClient,
    retriever: &dyn ArtifactRetriever,
    config: &EngineConfig,
    job_id: JobId,
    path: &Path,
    sink: &dyn ProgressSink,
) -> Result<JobOutcome, SubmitError> {
    sink.emit(EngineEvent::Progress(JobProgress {
        job_id,
        stage: Stage::Reading,
    }));

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| SubmitError::new(FailureKind::FileRead, err.to_string()))?;
    let decoded = decode_text(&bytes)
        .map_err(|err| SubmitError::new(FailureKind::DecodeFailure, err.to_string()))?;

    let job = PendingJob {
        source_name: base_name_for_path(path),
        raw_text: decoded.text,
        submitted_at: (config.submitted_utc)(),
    };
    engine_info!(
        "job {}: submitting '{}' ({} chars, {} encoded, at {})",
        job_id,
        job.source_name,
        job.raw_text.len(),
        decoded.encoding_label,
        job.submitted_at
    );

    let request = SynthesisRequest {
        text: job.raw_text,
        filename: job.source_name,
    };
    let response = client.synthesize(job_id, &request, sink).await?;

    // The artifact may not be visible in remote storage immediately after
    // the HTTP response; settle before declaring the job complete.
    sink.emit(EngineEvent::Progress(JobProgress {
        job_id,
        stage: Stage::Settling,
    }));
    tokio::time::sleep(config.settings.settle_delay).await;

    let saved_path = match &config.output_dir {
        Some(dir) => {
            sink.emit(EngineEvent::Progress(JobProgress {
                job_id,
                stage: Stage::Retrieving,
            }));
            match save_artifact(retriever, dir, &response).await {
                Ok(saved) => {
                    engine_info!("job {}: artifact saved to {:?}", job_id, saved);
                    Some(saved)
                }
                Err(err) => {
                    // The conversion itself stands; a missed download only
                    // loses the local copy.
                    engine_warn!(
                        "job {}: artifact retrieval failed ({}): {}",
                        job_id,
                        err.kind,
                        err.message
                    );
                    None
                }
            }
        }
        None => None,
    };

    Ok(JobOutcome {
        name: response.name,
        url: response.url,
        saved_path,
    })
}

async fn save_artifact(
    retriever: &dyn ArtifactRetriever,
    dir: &Path,
    response: &SynthesisResponse,
) -> Result<PathBuf, SubmitError> {
    let bytes = retriever.retrieve(&response.url).await?;
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    writer
        .write(&response.name, &bytes)
        .map_err(|err| SubmitError::new(FailureKind::Persist, err.to_string()))
}
