use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use engine_logging::engine_debug;
use narrator_core::{update, AppState, Msg};
use narrator_engine::{EngineConfig, SubmitSettings};

use super::effects::EffectRunner;
use super::logging::{initialize, LogDestination};

const ENDPOINT_ENV: &str = "NARRATOR_ENDPOINT";
const OUTPUT_DIR_ENV: &str = "NARRATOR_OUTPUT_DIR";

pub fn run_app() -> ExitCode {
    initialize(LogDestination::Both);

    let files: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    if files.is_empty() {
        eprintln!("usage: narrator <file.txt> [more.txt ...]");
        eprintln!("  {ENDPOINT_ENV} must point at the synthesis endpoint;");
        eprintln!("  set {OUTPUT_DIR_ENV} to also download the audio artifacts.");
        return ExitCode::FAILURE;
    }

    let endpoint = match env::var(ENDPOINT_ENV) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            eprintln!("{ENDPOINT_ENV} is not set; refusing to guess a synthesis endpoint.");
            return ExitCode::FAILURE;
        }
    };

    let mut config = EngineConfig::new(SubmitSettings::new(endpoint));
    config.output_dir = env::var_os(OUTPUT_DIR_ENV).map(PathBuf::from);
    config.submitted_utc = Arc::new(|| Utc::now().to_rfc3339());

    let runner = EffectRunner::new(config);
    let mut state = AppState::new();
    let mut any_failed = false;

    for file in &files {
        let (next, failed) = submit_and_wait(state, &runner, file);
        state = next;
        any_failed |= failed;
    }

    render_summary(&state, any_failed)
}

/// Drive one submission through the update loop until its outcome lands.
fn submit_and_wait(state: AppState, runner: &EffectRunner, file: &Path) -> (AppState, bool) {
    let (state, _) = update(state, Msg::FileChosen(file.display().to_string()));
    let (mut state, effects) = update(state, Msg::SubmitClicked);
    runner.run(effects);
    println!("converting {} ...", file.display());

    let before = state.results().len();
    while state.in_flight() {
        match runner.poll() {
            Some(msg) => {
                let (mut next, effects) = update(state, msg);
                runner.run(effects);
                if next.consume_dirty() {
                    if let Some(stage) = next.view().active_stage {
                        engine_debug!("{}: {:?}", file.display(), stage);
                    }
                }
                state = next;
            }
            None => std::thread::sleep(Duration::from_millis(20)),
        }
    }

    // Print the outcome now: the error slot is cleared again by the next
    // submission, and a success row is easiest to attribute here.
    if let Some(result) = state.results().get(before) {
        println!("  {}  {}", result.name, result.url);
        (state, false)
    } else {
        let view = state.view();
        let message = view.error.as_deref().unwrap_or("no result reported");
        eprintln!("{}: {}", file.display(), message);
        (state, true)
    }
}

fn render_summary(state: &AppState, any_failed: bool) -> ExitCode {
    let results = state.results();
    if results.is_empty() {
        eprintln!("no conversions completed");
        return ExitCode::FAILURE;
    }

    println!("Converted audio:");
    for result in results {
        println!("  {}  {}", result.name, result.url);
    }

    if any_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
