use crate::registry::ResultRegistry;
use crate::view_model::{AppViewModel, ResultRowView};

pub type JobId = u64;

/// Pipeline stage of the job currently awaiting resolution, as reported by
/// the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Queued,
    Reading,
    Uploading,
    Settling,
    Retrieving,
}

/// Terminal outcome of a conversion job. Exactly one of these is applied
/// per job; a job never produces both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobResult {
    Completed { name: String, url: String },
    Failed { message: String },
}

/// A completed conversion as recorded in the session registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    /// Identifier of the produced audio artifact, as reported by the
    /// synthesis service (not necessarily the submitted base name).
    pub name: String,
    /// Retrieval locator for the audio artifact.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveJob {
    job_id: JobId,
    source_path: String,
    stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    selected_file: Option<String>,
    next_job_id: JobId,
    active: Option<ActiveJob>,
    registry: ResultRegistry,
    error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            selected_file: self.selected_file.clone(),
            in_flight: self.active.is_some(),
            active_file: self.active.as_ref().map(|job| job.source_path.clone()),
            active_stage: self.active.as_ref().map(|job| job.stage),
            results: self
                .registry
                .list()
                .iter()
                .map(|result| ResultRowView {
                    name: result.name.clone(),
                    url: result.url.clone(),
                })
                .collect(),
            error: self.error.clone(),
            dirty: self.dirty,
        }
    }

    /// True while a submission is awaiting resolution.
    pub fn in_flight(&self) -> bool {
        self.active.is_some()
    }

    /// Completed conversions in insertion order.
    pub fn results(&self) -> &[ConversionResult] {
        self.registry.list()
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn choose_file(&mut self, path: String) {
        self.selected_file = Some(path);
        self.dirty = true;
    }

    /// Start a new submission for the chosen file, if any.
    ///
    /// Returns the fresh job id and the path to submit, or `None` when no
    /// file is chosen (submission is then a silent no-op). A job still in
    /// flight is superseded: the new id takes over, and late events for the
    /// old id fail the id checks in [`Self::apply_progress`] and
    /// [`Self::apply_done`] and are discarded.
    pub(crate) fn begin_submission(&mut self) -> Option<(JobId, String)> {
        let path = self.selected_file.clone()?;
        self.error = None;
        self.next_job_id += 1;
        let job_id = self.next_job_id;
        self.active = Some(ActiveJob {
            job_id,
            source_path: path.clone(),
            stage: Stage::Queued,
        });
        self.dirty = true;
        Some((job_id, path))
    }

    pub(crate) fn apply_progress(&mut self, job_id: JobId, stage: Stage) {
        match self.active.as_mut() {
            Some(job) if job.job_id == job_id => {
                job.stage = stage;
                self.dirty = true;
            }
            // Progress for a superseded or unknown job is discarded.
            _ => {}
        }
    }

    /// Apply the single tagged completion for a job.
    ///
    /// The in-flight flag is cleared here and nowhere else; a stale
    /// completion (superseded job id) leaves the active job, the error
    /// slot, and the registry untouched.
    pub(crate) fn apply_done(&mut self, job_id: JobId, result: JobResult) {
        match self.active.take() {
            Some(job) if job.job_id == job_id => {
                match result {
                    JobResult::Completed { name, url } => {
                        self.registry.append(ConversionResult { name, url });
                    }
                    JobResult::Failed { message } => {
                        self.error = Some(message);
                    }
                }
                self.dirty = true;
            }
            other => self.active = other,
        }
    }
}
