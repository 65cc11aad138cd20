use crate::e2e::helpers;

use helpers::{fakes::FAKE_MP3, TestContext};
use hyper::StatusCode;
use reelforge_backend::domain::workflow::{BackendTarget, EngineOrigin};
use reelforge_backend::infrastructure::engines::EngineResult;
use serde_json::json;
use std::path::Path;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_with_default_builtin_provider(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({"text": "Hello"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let audio_path = response.body.as_ref().unwrap()["audio_path"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(audio_path.ends_with(".mp3"));
    assert!(Path::new(&audio_path).starts_with(ctx.temp_dir()));
    assert_eq!(std::fs::read(&audio_path).unwrap(), FAKE_MP3);

    let calls = ctx.synthesizer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].voice, "zh-CN-YunjianNeural");
    assert!(ctx.engine.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_pass_voice_settings_to_builtin_provider(ctx: &TestContext) {
    let output = ctx.output_path("narration.mp3");

    let response = ctx
        .client
        .post(
            "/api/tts/synthesize",
            &json!({
                "text": "你好，世界",
                "workflow": "edge-tts",
                "voice": "zh-CN-XiaoxiaoNeural",
                "rate": "+10%",
                "output_path": output.to_str().unwrap()
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap()["audio_path"],
        json!(output.to_str().unwrap())
    );
    assert!(output.exists());

    let calls = ctx.synthesizer.calls();
    assert_eq!(calls[0].voice, "zh-CN-XiaoxiaoNeural");
    assert_eq!(calls[0].rate, "+10%");
    assert_eq!(calls[0].pitch, "+0Hz");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({"text": ""}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text cannot be empty");
    assert!(ctx.synthesizer.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_run_named_workflow(ctx: &TestContext) {
    ctx.engine.respond_with(EngineResult {
        audios: Some(vec!["/comfy/output/tts_00001.flac".to_string()]),
        ..EngineResult::completed()
    });

    let response = ctx
        .client
        .post(
            "/api/tts/synthesize",
            &json!({
                "text": "Hello",
                "workflow": "narrator",
                "voice": "female_01",
                "params": {"speed": 1.1}
            }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap()["audio_path"],
        "/comfy/output/tts_00001.flac"
    );

    let calls = ctx.engine.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].target,
        BackendTarget::LocalWorkflow {
            file_path: ctx.config.workflows.dir.join("tts_narrator.json"),
        }
    );
    assert_eq!(
        serde_json::Value::Object(calls[0].params.clone()),
        json!({"text": "Hello", "voice": "female_01", "speed": 1.1})
    );
    assert!(ctx.synthesizer.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_resolve_runninghub_descriptor_and_forward_key(ctx: &TestContext) {
    ctx.engine.respond_with(EngineResult {
        files: Some(vec!["https://cdn.example.com/out.wav".to_string()]),
        ..EngineResult::completed()
    });

    let response = ctx
        .client
        .post(
            "/api/tts/synthesize",
            &json!({"text": "Hello", "workflow": "cloud", "runninghub_api_key": "rh-123"}),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap()["audio_path"],
        "https://cdn.example.com/out.wav"
    );

    let calls = ctx.engine.calls();
    assert_eq!(
        calls[0].target,
        BackendTarget::RemoteWorkflow {
            job_id: "1983513964837543938".to_string(),
            engine_origin: EngineOrigin::RunningHub,
        }
    );
    assert_eq!(calls[0].connection.runninghub_api_key.as_deref(), Some("rh-123"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_engine_failure_message(ctx: &TestContext) {
    ctx.engine.respond_with(EngineResult::failed("CUDA out of memory"));

    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({"text": "Hello", "workflow": "narrator"}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error_message("CUDA out of memory");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_missing_audio(ctx: &TestContext) {
    ctx.engine.respond_with(EngineResult {
        outputs: json!({"7": "log.txt"}).as_object().cloned(),
        ..EngineResult::completed()
    });

    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({"text": "Hello", "workflow": "narrator"}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error_message("No audio file generated by workflow");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_for_unknown_workflow(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/tts/synthesize", &json!({"text": "Hello", "workflow": "missing"}))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("missing");
    assert!(ctx.engine.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_tts_workflows(ctx: &TestContext) {
    let response = ctx.client.get("/api/tts/workflows").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["builtins"], json!(["edge", "edge-tts"]));
    assert_eq!(body["workflows"], json!(["tts_cloud.json", "tts_narrator.json"]));
}
