use engine_logging::{engine_debug, engine_info, engine_warn};
use narrator_core::{Effect, JobResult, Msg, Stage};
use narrator_engine::{EngineConfig, EngineEvent, EngineHandle};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: EngineHandle::new(config),
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitFile { job_id, path } => {
                    engine_info!("SubmitFile job_id={} path={}", job_id, path);
                    self.engine.enqueue(job_id, path);
                }
            }
        }
    }

    /// Translate the next engine event, if any, into a core message.
    pub fn poll(&self) -> Option<Msg> {
        let msg = match self.engine.try_recv()? {
            EngineEvent::Progress(progress) => {
                engine_debug!("job {}: stage {:?}", progress.job_id, progress.stage);
                Msg::JobProgress {
                    job_id: progress.job_id,
                    stage: map_stage(progress.stage),
                }
            }
            EngineEvent::JobCompleted { job_id, result } => Msg::JobDone {
                job_id,
                result: match result {
                    Ok(outcome) => {
                        if let Some(saved) = &outcome.saved_path {
                            engine_info!("job {}: artifact available at {:?}", job_id, saved);
                        }
                        JobResult::Completed {
                            name: outcome.name,
                            url: outcome.url,
                        }
                    }
                    Err(err) => {
                        engine_warn!("job {} failed ({}): {}", job_id, err.kind, err.message);
                        JobResult::Failed {
                            message: err.user_message(),
                        }
                    }
                },
            },
        };
        Some(msg)
    }
}

fn map_stage(stage: narrator_engine::Stage) -> Stage {
    match stage {
        narrator_engine::Stage::Queued => Stage::Queued,
        narrator_engine::Stage::Reading => Stage::Reading,
        narrator_engine::Stage::Uploading => Stage::Uploading,
        narrator_engine::Stage::Settling => Stage::Settling,
        narrator_engine::Stage::Retrieving => Stage::Retrieving,
    }
}
