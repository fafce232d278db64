//! Integration tests for the demo helper
//!
//! Covers prefix-filtered listing, bulk deletion of matching resources, and
//! the translation of domain errors into HTTP status codes.

mod common;

use common::{test_project, unauthorized_project};
use gce_client::demo::{delete_demo_resources, list_demo_resources, DemoResponse};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Listing writes a JSON object mapping resource name to status
#[tokio::test]
async fn test_list_demo_resources_writes_name_status_map() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/v1beta14/projects/test-project/zones/us-central1-a/instances",
        ))
        .and(query_param("filter", "name eq ^demo.*"))
        .and(query_param("maxResults", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"name": "demoA-1", "status": "RUNNING"},
                {"name": "demoB-2", "status": "STAGING"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let project = test_project(&server.uri());
    let mut response = DemoResponse::new();
    list_demo_resources(&mut response, "demo", |params| {
        project.list_instances(None, params)
    })
    .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type.as_deref(), Some("application/json"));

    let body: serde_json::Value = serde_json::from_str(&response.body).expect("body is JSON");
    assert_eq!(
        body,
        json!({
            "resources": {
                "demoA-1": {"status": "RUNNING"},
                "demoB-2": {"status": "STAGING"}
            }
        })
    );
}

/// Matching resources are removed with one bulk delete and a plain-text
/// confirmation is written
#[tokio::test]
async fn test_delete_demo_resources_bulk_deletes_matches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/v1beta14/projects/test-project/zones/us-central1-a/instances",
        ))
        .and(query_param("filter", "name eq ^demo-.*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "name": "demo-1",
                    "zone": "https://www.googleapis.com/compute/v1beta14/projects/test-project/zones/us-central1-a",
                    "status": "RUNNING"
                },
                {
                    "name": "demo-2",
                    "zone": "https://www.googleapis.com/compute/v1beta14/projects/test-project/zones/us-central1-a",
                    "status": "RUNNING"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let batch_response = concat!(
        "--batch_response\r\n",
        "Content-Type: application/http\r\n",
        "Content-ID: <response-item1>\r\n",
        "\r\n",
        "HTTP/1.1 200 OK\r\n",
        "Content-Type: application/json\r\n",
        "\r\n",
        "{\"kind\": \"compute#operation\", \"operationType\": \"delete\"}\r\n",
        "--batch_response\r\n",
        "Content-Type: application/http\r\n",
        "Content-ID: <response-item2>\r\n",
        "\r\n",
        "HTTP/1.1 200 OK\r\n",
        "Content-Type: application/json\r\n",
        "\r\n",
        "{\"kind\": \"compute#operation\", \"operationType\": \"delete\"}\r\n",
        "--batch_response--\r\n",
    );

    Mock::given(method("POST"))
        .and(path("/batch"))
        .and(body_string_contains("instances/demo-1"))
        .and(body_string_contains("instances/demo-2"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            batch_response.as_bytes().to_vec(),
            "multipart/mixed; boundary=batch_response",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let project = test_project(&server.uri());
    let mut response = DemoResponse::new();
    delete_demo_resources(&mut response, &project, "demo", |params| {
        project.list_instances(None, params)
    })
    .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type.as_deref(), Some("text/plain"));
    assert_eq!(response.body, "deleting resources");
}

/// Zero matching resources perform no delete call and write no output
#[tokio::test]
async fn test_delete_demo_resources_without_matches_is_a_no_op() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/v1beta14/projects/test-project/zones/us-central1-a/instances",
        ))
        .and(query_param("filter", "name eq ^demo-.*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/batch"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let project = test_project(&server.uri());
    let mut response = DemoResponse::new();
    delete_demo_resources(&mut response, &project, "demo", |params| {
        project.list_instances(None, params)
    })
    .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, None);
    assert!(response.body.is_empty());
}

/// A provider failure during listing becomes status 500 with the message
#[tokio::test]
async fn test_list_demo_resources_maps_api_error_to_500() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/v1beta14/projects/test-project/zones/us-central1-a/instances",
        ))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let project = test_project(&server.uri());
    let mut response = DemoResponse::new();
    list_demo_resources(&mut response, "demo", |params| {
        project.list_instances(None, params)
    })
    .await;

    assert_eq!(response.status, 500);
    assert_eq!(
        response.status_message.as_deref(),
        Some("Error listing resources: HttpError: 503 Service Unavailable")
    );
    assert!(response.body.is_empty());
}

/// A token refresh failure becomes status 401 with a fixed message
#[tokio::test]
async fn test_list_demo_resources_maps_token_error_to_401() {
    let server = MockServer::start().await;

    let project = unauthorized_project(&server.uri());
    let mut response = DemoResponse::new();
    list_demo_resources(&mut response, "demo", |params| {
        project.list_instances(None, params)
    })
    .await;

    assert_eq!(response.status, 401);
    assert_eq!(response.status_message.as_deref(), Some("Unauthorized."));
}
