#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked an input file; replaces any earlier pick.
    FileChosen(String),
    /// User triggered submission of the currently chosen file.
    SubmitClicked,
    /// Engine stage report for a job.
    JobProgress {
        job_id: crate::JobId,
        stage: crate::Stage,
    },
    /// Engine completion for a job.
    JobDone {
        job_id: crate::JobId,
        result: crate::JobResult,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
