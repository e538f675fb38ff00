use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use narrator_engine::{
    EngineConfig, EngineEvent, EngineHandle, FailureKind, JobOutcome, Stage, SubmitError,
    SubmitSettings,
};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_input(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn quick_settings(endpoint: String) -> SubmitSettings {
    let mut settings = SubmitSettings::new(endpoint);
    settings.settle_delay = Duration::from_millis(200);
    settings
}

/// Poll the engine until the single completion event arrives, collecting
/// stage reports along the way.
async fn wait_for_completion(
    engine: &EngineHandle,
    deadline: Duration,
) -> (Vec<Stage>, Result<JobOutcome, SubmitError>) {
    let started = Instant::now();
    let mut stages = Vec::new();
    loop {
        match engine.try_recv() {
            Some(EngineEvent::Progress(progress)) => stages.push(progress.stage),
            Some(EngineEvent::JobCompleted { result, .. }) => return (stages, result),
            None => {
                assert!(
                    started.elapsed() < deadline,
                    "engine did not complete within {deadline:?}"
                );
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }
    }
}

#[tokio::test]
async fn successful_job_settles_before_completing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "hello.mp3",
            "url": "https://cdn.example/hello.mp3",
        })))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let input = write_input(&temp, "hello.txt", "Hello world");
    let settings = quick_settings(server.uri());
    let settle = settings.settle_delay;
    let engine = EngineHandle::new(EngineConfig::new(settings));

    let started = Instant::now();
    engine.enqueue(1, input);
    let (stages, result) = wait_for_completion(&engine, Duration::from_secs(10)).await;

    assert!(
        started.elapsed() >= settle,
        "completed before the settling delay elapsed"
    );
    let outcome = result.expect("job ok");
    assert_eq!(outcome.name, "hello.mp3");
    assert_eq!(outcome.url, "https://cdn.example/hello.mp3");
    assert_eq!(outcome.saved_path, None);
    assert_eq!(
        stages,
        vec![
            Stage::Queued,
            Stage::Reading,
            Stage::Uploading,
            Stage::Settling,
        ]
    );
}

#[tokio::test]
async fn failed_job_skips_the_settling_delay() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let input = write_input(&temp, "hello.txt", "Hello world");
    let mut settings = SubmitSettings::new(server.uri());
    settings.settle_delay = Duration::from_secs(5);
    let engine = EngineHandle::new(EngineConfig::new(settings));

    let started = Instant::now();
    engine.enqueue(1, input);
    let (stages, result) = wait_for_completion(&engine, Duration::from_secs(4)).await;

    assert!(
        started.elapsed() < Duration::from_secs(2),
        "failure should not wait out the settling delay"
    );
    let err = result.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert!(!stages.contains(&Stage::Settling));
}

#[tokio::test]
async fn missing_input_file_fails_without_any_exchange() {
    let engine = EngineHandle::new(EngineConfig::new(quick_settings(
        // Port 9 is discard; nothing should ever connect.
        "http://127.0.0.1:9/convert".to_string(),
    )));

    engine.enqueue(1, "/no/such/file.txt");
    let (stages, result) = wait_for_completion(&engine, Duration::from_secs(10)).await;

    let err = result.unwrap_err();
    assert_eq!(err.kind, FailureKind::FileRead);
    assert_eq!(stages, vec![Stage::Queued, Stage::Reading]);
}

#[tokio::test]
async fn artifact_is_downloaded_when_output_dir_is_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "hello.mp3",
            "url": format!("{}/audio/hello.mp3", server.uri()),
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/audio/hello.mp3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"ID3fake-audio".to_vec(), "audio/mpeg"),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let input = write_input(&temp, "hello.txt", "Hello world");
    let out = TempDir::new().unwrap();
    let mut config = EngineConfig::new(quick_settings(server.uri()));
    config.output_dir = Some(out.path().to_path_buf());
    let engine = EngineHandle::new(config);

    engine.enqueue(1, input);
    let (stages, result) = wait_for_completion(&engine, Duration::from_secs(10)).await;

    let outcome = result.expect("job ok");
    let saved = outcome.saved_path.expect("artifact saved");
    assert_eq!(saved, out.path().join("hello.mp3"));
    assert_eq!(fs::read(&saved).unwrap(), b"ID3fake-audio");
    assert!(stages.contains(&Stage::Retrieving));
}

#[tokio::test]
async fn retrieval_failure_does_not_fail_the_job() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "hello.mp3",
            "url": format!("{}/audio/hello.mp3", server.uri()),
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let input = write_input(&temp, "hello.txt", "Hello world");
    let out = TempDir::new().unwrap();
    let mut config = EngineConfig::new(quick_settings(server.uri()));
    config.output_dir = Some(out.path().to_path_buf());
    let engine = EngineHandle::new(config);

    engine.enqueue(1, input);
    let (_stages, result) = wait_for_completion(&engine, Duration::from_secs(10)).await;

    let outcome = result.expect("job ok");
    assert_eq!(outcome.name, "hello.mp3");
    assert_eq!(outcome.saved_path, None);
    assert!(!out.path().join("hello.mp3").exists());
}
