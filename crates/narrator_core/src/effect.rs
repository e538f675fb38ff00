#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitFile { job_id: crate::JobId, path: String },
}
