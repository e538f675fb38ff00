//! Narrator core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod registry;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use registry::ResultRegistry;
pub use state::{AppState, ConversionResult, JobId, JobResult, Stage};
pub use update::update;
pub use view_model::{AppViewModel, ResultRowView};
