//! Wire contract tests against a mock RunPod server.

use mockito::{Matcher, Server, ServerGuard};
use runpod_lib_rust::client::{RunpodApi, MODELS_QUERY};
use runpod_lib_rust::transport::HttpTransport;
use runpod_lib_rust::{
    ClientConfig, ErrorKind, JobApi, JobRequest, JobStatus, ModelCategory, PollConfig,
    RunpodClient,
};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

const KEY: &str = "test-key";

fn config_for(server: &ServerGuard) -> ClientConfig {
    ClientConfig {
        base_url: server.url(),
        graphql_url: format!("{}/graphql", server.url()),
        http_timeout_secs: 5,
        sync_timeout_secs: 5,
        ..ClientConfig::default()
    }
}

fn api_for(server: &ServerGuard) -> RunpodApi {
    let transport = HttpTransport::new(&config_for(server), KEY.to_string()).unwrap();
    RunpodApi::new(Arc::new(transport), Duration::from_secs(5))
}

#[tokio::test]
async fn test_runsync_returns_remote_object_unchanged() {
    let mut server = Server::new_async().await;
    let body = json!({
        "id": "sync-1",
        "status": "COMPLETED",
        "output": {"image_url": "https://cdn.example/cat.png"},
        "executionTime": 2300,
        "delayTime": 12
    });
    let mock = server
        .mock("POST", "/v2/flux-dev/runsync")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::Json(json!({"input": {"prompt": "a cat"}})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let result = api_for(&server)
        .run_sync("flux-dev", &json!({"prompt": "a cat"}))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(serde_json::to_value(&result).unwrap(), body);
}

#[tokio::test]
async fn test_runsync_failed_job_is_remote_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v2/flux-dev/runsync")
        .with_status(200)
        .with_body(r#"{"id":"sync-2","status":"FAILED","error":"CUDA out of memory"}"#)
        .create_async()
        .await;

    let err = api_for(&server)
        .run_sync("flux-dev", &json!({}))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteFailure);
    assert_eq!(err.message(), "CUDA out of memory");
    assert_eq!(err.context().job_id.as_deref(), Some("sync-2"));
    assert_eq!(err.context().status, Some(JobStatus::Failed));
}

#[tokio::test]
async fn test_run_submits_input_envelope() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v2/whisper-large/run")
        .match_header("authorization", "Bearer test-key")
        .match_header("x-request-id", Matcher::Any)
        .match_body(Matcher::Json(json!({"input": {"audio": "a.wav"}})))
        .with_status(200)
        .with_body(r#"{"id":"job-1","status":"IN_QUEUE"}"#)
        .create_async()
        .await;

    let result = api_for(&server)
        .run_async("whisper-large", &json!({"audio": "a.wav"}))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(result.id, "job-1");
    assert_eq!(result.status, JobStatus::Queued);
    assert!(result.output.is_none());
}

#[tokio::test]
async fn test_status_path_and_failed_result() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v2/sdxl/status/job-9")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_body(r#"{"id":"job-9","status":"FAILED","output":"bad prompt"}"#)
        .create_async()
        .await;

    let result = api_for(&server).get_status("sdxl", "job-9").await.unwrap();

    assert_eq!(result.status, JobStatus::Failed);
    assert!(result.output.is_none());
    assert_eq!(result.error_message(), "bad prompt");
}

#[tokio::test]
async fn test_status_error_body_is_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v2/sdxl/status/gone")
        .with_status(200)
        .with_body(r#"{"error":"request does not exist"}"#)
        .create_async()
        .await;

    let err = api_for(&server).get_status("sdxl", "gone").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "request does not exist");
    assert_eq!(err.context().job_id.as_deref(), Some("gone"));
    assert_eq!(err.context().http_status, None);
}

#[tokio::test]
async fn test_http_status_classification() {
    let cases = [
        (401, ErrorKind::Unauthorized),
        (403, ErrorKind::Forbidden),
        (404, ErrorKind::NotFound),
        (400, ErrorKind::RemoteFailure),
        (429, ErrorKind::RemoteFailure),
        (500, ErrorKind::Network),
        (503, ErrorKind::Network),
    ];
    for (status, expected) in cases {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v2/flux-dev/run")
            .with_status(status)
            .with_body(r#"{"error":"nope"}"#)
            .create_async()
            .await;

        let err = api_for(&server)
            .run_async("flux-dev", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), expected, "HTTP {}", status);
        assert_eq!(err.context().http_status, Some(status as u16));
        assert_eq!(err.context().model_id.as_deref(), Some("flux-dev"));
    }
}

#[tokio::test]
async fn test_unparseable_body_is_malformed() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v2/flux-dev/run")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;
    server
        .mock("GET", "/v2/flux-dev/status/j1")
        .with_status(200)
        .with_body(r#"{"id":"j1","status":"PAUSED"}"#)
        .create_async()
        .await;

    let api = api_for(&server);
    let err = api.run_async("flux-dev", &json!({})).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);

    let err = api.get_status("flux-dev", "j1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[tokio::test]
async fn test_connection_refused_is_network() {
    let config = ClientConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        http_timeout_secs: 2,
        ..ClientConfig::default()
    };
    let transport = HttpTransport::new(&config, KEY.to_string()).unwrap();
    let api = RunpodApi::new(Arc::new(transport), Duration::from_secs(2));

    let err = api.get_status("flux-dev", "j1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_runsync_past_ceiling_is_timeout() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v2/flux-dev/runsync")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_millis(2_500));
            w.write_all(br#"{"id":"slow-1","status":"COMPLETED"}"#)
        })
        .create_async()
        .await;

    let transport = HttpTransport::new(&config_for(&server), KEY.to_string()).unwrap();
    let api = RunpodApi::new(Arc::new(transport), Duration::from_secs(1));

    let err = api.run_sync("flux-dev", &json!({})).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(err.context().model_id.as_deref(), Some("flux-dev"));
}

#[tokio::test]
async fn test_registry_connection_refused_is_network() {
    let config = ClientConfig {
        graphql_url: "http://127.0.0.1:1/graphql".to_string(),
        http_timeout_secs: 2,
        ..ClientConfig::default()
    };
    let transport = HttpTransport::new(&config, KEY.to_string()).unwrap();
    let api = RunpodApi::new(Arc::new(transport), Duration::from_secs(2));

    let err = api.list_models().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_list_models_from_registry() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/graphql")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::Json(json!({"query": MODELS_QUERY})))
        .with_status(200)
        .with_body(
            json!({"data": {"myself": {"endpoints": [
                {"id": "ep-1", "name": "flux-dev"},
                {"id": "ep-2", "name": "llama-3-8b-instruct"},
                {"id": "whisper-v3", "name": ""}
            ]}}})
            .to_string(),
        )
        .create_async()
        .await;

    let models = api_for(&server).list_models().await.unwrap();

    mock.assert_async().await;
    assert_eq!(models.len(), 3);
    assert_eq!(models[0].category, ModelCategory::Image);
    assert_eq!(models[1].category, ModelCategory::Text);
    assert_eq!(models[2].display_name, "whisper-v3");
    assert_eq!(models[2].category, ModelCategory::Audio);
}

#[tokio::test]
async fn test_registry_errors_are_malformed() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(r#"{"data":null,"errors":[{"message":"unauthenticated"}]}"#)
        .create_async()
        .await;

    let err = api_for(&server).list_models().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert!(err.message().contains("unauthenticated"));
}

#[tokio::test]
async fn test_client_end_to_end() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v2/whisper-large/run")
        .with_status(200)
        .with_body(r#"{"id":"e2e-1","status":"IN_QUEUE"}"#)
        .create_async()
        .await;
    let status = server
        .mock("GET", "/v2/whisper-large/status/e2e-1")
        .with_status(200)
        .with_body(r#"{"id":"e2e-1","status":"COMPLETED","output":{"text":"Four score"}}"#)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("POST", "/graphql")
        .with_status(500)
        .with_body("upstream down")
        .create_async()
        .await;

    let client = RunpodClient::builder()
        .config(ClientConfig::default())
        .api_key(KEY)
        .base_url_override(server.url())
        .graphql_url_override(format!("{}/graphql", server.url()))
        .build()
        .unwrap();

    let request = JobRequest::run_and_wait("whisper-large", json!({"audio": "a.wav"}))
        .with_poll_config(PollConfig::new(250, 5_000));
    let result = client.execute(&request).await.unwrap();
    status.assert_async().await;
    assert_eq!(result.output, Some(json!({"text": "Four score"})));

    let snapshot = client.models().await;
    assert_eq!(
        snapshot.source,
        runpod_lib_rust::catalog::SnapshotSource::Fallback
    );
    assert!(client.model("flux-dev").await.is_ok());
}

#[tokio::test]
async fn test_builder_without_key_is_unauthorized() {
    let err = RunpodClient::builder()
        .config(ClientConfig::default())
        .credentials(Box::new(runpod_lib_rust::credentials::StaticCredential::new("")))
        .build()
        .err()
        .expect("an empty key must be rejected");
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}
