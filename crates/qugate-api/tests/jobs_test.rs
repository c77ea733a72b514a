//! Job lifecycle integration tests: submission, status polling, result
//! retrieval, and the uniform error envelopes.
//!
//! Run with: `cargo test -p qugate-api --test jobs_test`

mod helpers;

use helpers::{done_result, setup_test_app, TestApp};
use qugate_core::models::{JobStatus, ResultDoc, StatusMsg};

const TOKEN: &str = "alice-secret-token";
const USER: &str = "alice";

async fn app_with_backend() -> TestApp {
    let app = setup_test_app().await;
    app.register_provider("local1", true).await;
    app.register_device("local1", "fermions", true, false).await;
    app.register_token(TOKEN, USER).await;
    app
}

fn job_payload() -> String {
    serde_json::json!({
        "experiment_0": {
            "instructions": [["load", [0], []], ["measure", [0], []]],
            "num_wires": 1,
            "shots": 5
        }
    })
    .to_string()
}

async fn submit_job(app: &TestApp) -> StatusMsg {
    let response = app
        .server
        .post("/local1_fermions_simulator/post_job")
        .add_header("Authorization", format!("Bearer {TOKEN}"))
        .json(&serde_json::json!({ "job": job_payload() }))
        .await;
    assert_eq!(response.status_code(), 200);
    response.json()
}

#[tokio::test]
async fn test_post_job_returns_initializing_status() {
    let app = app_with_backend().await;

    let status = submit_job(&app).await;
    assert_eq!(status.status, JobStatus::Initializing.as_str());
    assert_eq!(status.detail, "Got your json.");
    assert_ne!(status.job_id, "None");
}

#[tokio::test]
async fn test_resubmission_mints_new_job_id() {
    let app = app_with_backend().await;

    let first = submit_job(&app).await;
    let second = submit_job(&app).await;
    assert_ne!(first.job_id, second.job_id);
}

#[tokio::test]
async fn test_post_job_with_payload_embedded_token() {
    let app = app_with_backend().await;

    let response = app
        .server
        .post("/local1_fermions_simulator/post_job")
        .json(&serde_json::json!({ "job": job_payload(), "token": TOKEN }))
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_invalid_credentials_yield_uniform_401() {
    let app = app_with_backend().await;

    let post = app
        .server
        .post("/local1_fermions_simulator/post_job")
        .add_header("Authorization", "Bearer wrong")
        .json(&serde_json::json!({ "job": job_payload() }))
        .await;
    let status = app
        .server
        .get("/local1_fermions_simulator/get_job_status")
        .add_query_param("job_id", "whatever")
        .add_header("Authorization", "Bearer wrong")
        .await;
    let result = app
        .server
        .get("/local1_fermions_simulator/get_job_result")
        .add_query_param("job_id", "whatever")
        .add_header("Authorization", "Bearer wrong")
        .await;

    for response in [post, status, result] {
        assert_eq!(response.status_code(), 401);
        let body: StatusMsg = response.json();
        assert_eq!(body.error_message, "Invalid credentials!");
        assert_eq!(body.detail, "Invalid credentials!");
        assert_eq!(body.status, "ERROR");
    }
}

#[tokio::test]
async fn test_post_job_undecodable_payload_is_406() {
    let app = app_with_backend().await;

    let response = app
        .server
        .post("/local1_fermions_simulator/post_job")
        .add_header("Authorization", format!("Bearer {TOKEN}"))
        .json(&serde_json::json!({ "job": "{not valid json" }))
        .await;
    assert_eq!(response.status_code(), 406);

    let body: StatusMsg = response.json();
    assert_eq!(body.detail, "The encoding of your json seems not work out!");
}

#[tokio::test]
async fn test_bad_credential_with_undecodable_body_is_still_401() {
    let app = app_with_backend().await;

    // the credential check comes before any payload complaint
    let response = app
        .server
        .post("/local1_fermions_simulator/post_job")
        .add_header("Authorization", "Bearer wrong")
        .text("{not valid json")
        .await;
    assert_eq!(response.status_code(), 401);

    let body: StatusMsg = response.json();
    assert_eq!(body.detail, "Invalid credentials!");
}

#[tokio::test]
async fn test_post_job_undecodable_body_is_406() {
    let app = app_with_backend().await;

    let response = app
        .server
        .post("/local1_fermions_simulator/post_job")
        .add_header("Authorization", format!("Bearer {TOKEN}"))
        .text("{not valid json")
        .await;
    assert_eq!(response.status_code(), 406);

    let body: StatusMsg = response.json();
    assert_eq!(body.detail, "The encoding of your json seems not work out!");
}

#[tokio::test]
async fn test_post_job_unknown_device_is_404() {
    let app = app_with_backend().await;

    let response = app
        .server
        .post("/local1_ghost_simulator/post_job")
        .add_header("Authorization", format!("Bearer {TOKEN}"))
        .json(&serde_json::json!({ "job": job_payload() }))
        .await;
    assert_eq!(response.status_code(), 404);

    let body: StatusMsg = response.json();
    assert_eq!(body.error_message, "Unknown back-end!");
}

#[tokio::test]
async fn test_get_job_status_echoes_submitted_job() {
    let app = app_with_backend().await;
    let submitted = submit_job(&app).await;

    let response = app
        .server
        .get("/local1_fermions_simulator/get_job_status")
        .add_query_param("job_id", &submitted.job_id)
        .add_header("Authorization", format!("Bearer {TOKEN}"))
        .await;
    assert_eq!(response.status_code(), 200);

    let status: StatusMsg = response.json();
    assert_eq!(status.job_id, submitted.job_id);
    assert!(!status.is_done());
}

#[tokio::test]
async fn test_query_token_binding() {
    let app = app_with_backend().await;
    let submitted = submit_job(&app).await;

    let response = app
        .server
        .get("/local1_fermions_simulator/get_job_status")
        .add_query_param("job_id", &submitted.job_id)
        .add_query_param("token", TOKEN)
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_error_status_echoed_at_406() {
    let app = app_with_backend().await;
    let submitted = submit_job(&app).await;

    let mut errored = StatusMsg::error("Compilation failed on the device.");
    errored.job_id = submitted.job_id.clone();
    app.write_status("local1", "fermions", USER, &errored);

    for endpoint in ["get_job_status", "get_job_result"] {
        let response = app
            .server
            .get(&format!("/local1_fermions_simulator/{endpoint}"))
            .add_query_param("job_id", &submitted.job_id)
            .add_header("Authorization", format!("Bearer {TOKEN}"))
            .await;
        assert_eq!(response.status_code(), 406, "endpoint {endpoint}");
        let body: StatusMsg = response.json();
        assert_eq!(body.status, "ERROR");
    }
}

#[tokio::test]
async fn test_get_job_result_before_done_returns_status_record() {
    let app = app_with_backend().await;
    let submitted = submit_job(&app).await;

    let response = app
        .server
        .get("/local1_fermions_simulator/get_job_result")
        .add_query_param("job_id", &submitted.job_id)
        .add_header("Authorization", format!("Bearer {TOKEN}"))
        .await;
    assert_eq!(response.status_code(), 200);

    // still the status envelope, never a result document
    let body: StatusMsg = response.json();
    assert_eq!(body.job_id, submitted.job_id);
    assert_eq!(body.status, JobStatus::Initializing.as_str());
}

#[tokio::test]
async fn test_get_job_result_after_done_returns_result() {
    let app = app_with_backend().await;
    let submitted = submit_job(&app).await;

    let done = StatusMsg {
        job_id: submitted.job_id.clone(),
        status: JobStatus::Done.as_str().to_string(),
        detail: "Job has finished.".to_string(),
        error_message: "None".to_string(),
    };
    app.write_status("local1", "fermions", USER, &done);
    app.write_result(
        "local1",
        "fermions",
        USER,
        &done_result("fermions", &submitted.job_id),
    );

    let response = app
        .server
        .get("/local1_fermions_simulator/get_job_result")
        .add_query_param("job_id", &submitted.job_id)
        .add_header("Authorization", format!("Bearer {TOKEN}"))
        .await;
    assert_eq!(response.status_code(), 200);

    let result: ResultDoc = response.json();
    assert_eq!(result.job_id, submitted.job_id);
    assert!(result.success);
    assert_eq!(result.results.len(), 1);
}

#[tokio::test]
async fn test_unknown_job_id_is_406() {
    let app = app_with_backend().await;

    let response = app
        .server
        .get("/local1_fermions_simulator/get_job_status")
        .add_query_param("job_id", "no-such-job")
        .add_header("Authorization", format!("Bearer {TOKEN}"))
        .await;
    assert_eq!(response.status_code(), 406);
}
