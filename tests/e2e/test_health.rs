use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ready_status(ctx: &TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("ready"));
    assert_eq!(body.get("llm_configured").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(
        body.get("tts_default_workflow").and_then(|v| v.as_str()),
        Some(ctx.config.tts.default_workflow.as_str())
    );
    assert_eq!(
        body.get("image_default_workflow").and_then(|v| v.as_str()),
        Some("flux")
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_request_id_in_responses(ctx: &TestContext) {
    let first = ctx.client.get("/health").await.unwrap();
    first.assert_header_exists("x-request-id");

    let second = ctx.client.get("/health/ready").await.unwrap();
    second.assert_header_exists("x-request-id");
    assert_ne!(first.header("x-request-id"), second.header("x-request-id"));

    // Errors carry it too
    let response = ctx
        .client
        .post(
            "/api/tts/synthesize",
            &serde_json::json!({"text": "Hello", "workflow": "nope"}),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_header_exists("x-request-id");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_echo_incoming_request_id(ctx: &TestContext) {
    let response = ctx
        .client
        .get_with_headers("/health", &[("x-request-id", "trace-abc-123")])
        .await
        .unwrap();

    response.assert_header("x-request-id", "trace-abc-123");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_different_endpoints_for_liveness_and_readiness(ctx: &TestContext) {
    let liveness_response = ctx.client.get("/health").await.unwrap();
    liveness_response.assert_status(StatusCode::OK);

    let readiness_response = ctx.client.get("/health/ready").await.unwrap();
    readiness_response.assert_status(StatusCode::OK);

    assert!(liveness_response.body.is_none()); // Plain text
    assert!(readiness_response.body.is_some()); // JSON
}
