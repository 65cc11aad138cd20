use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use reelforge_backend::domain::workflow::BackendTarget;
use reelforge_backend::infrastructure::engines::EngineResult;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_image_with_default_workflow(ctx: &TestContext) {
    ctx.engine.respond_with(EngineResult {
        images: Some(vec!["/comfy/output/img_00001.png".to_string()]),
        ..EngineResult::completed()
    });

    let response = ctx
        .client
        .post(
            "/api/image/generate",
            &json!({"prompt": "a lighthouse at dusk", "width": 1024, "height": 1024}),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap()["image_path"],
        "/comfy/output/img_00001.png"
    );

    let calls = ctx.engine.calls();
    assert_eq!(
        calls[0].target,
        BackendTarget::LocalWorkflow {
            file_path: ctx.config.workflows.dir.join("image_flux.json"),
        }
    );
    assert_eq!(
        calls[0].params["prompt"],
        json!("Pure white background, a lighthouse at dusk")
    );
    assert_eq!(calls[0].params["width"], json!(1024));
    assert_eq!(calls[0].connection.comfyui_url, "http://127.0.0.1:8188");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_apply_connection_override(ctx: &TestContext) {
    ctx.engine.respond_with(EngineResult {
        outputs: json!({"9": "ComfyUI_00001_.webp"}).as_object().cloned(),
        ..EngineResult::completed()
    });

    let response = ctx
        .client
        .post(
            "/api/image/generate",
            &json!({"prompt": "a cat", "comfyui_url": "http://gpu-box:8188"}),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap()["image_path"],
        "ComfyUI_00001_.webp"
    );
    assert_eq!(ctx.engine.calls()[0].connection.comfyui_url, "http://gpu-box:8188");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_prompt(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/image/generate", &json!({"prompt": "  "}))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.engine.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_image_workflows(ctx: &TestContext) {
    let response = ctx.client.get("/api/image/workflows").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["builtins"], json!([]));
    assert_eq!(body["workflows"], json!(["image_flux.json"]));
}
