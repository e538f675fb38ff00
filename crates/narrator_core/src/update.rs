use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileChosen(path) => {
            state.choose_file(path);
            Vec::new()
        }
        Msg::SubmitClicked => match state.begin_submission() {
            Some((job_id, path)) => vec![Effect::SubmitFile { job_id, path }],
            // No file chosen: a silent no-op, not an error.
            None => Vec::new(),
        },
        Msg::JobProgress { job_id, stage } => {
            state.apply_progress(job_id, stage);
            Vec::new()
        }
        Msg::JobDone { job_id, result } => {
            state.apply_done(job_id, result);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
