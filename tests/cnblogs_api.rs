//! cnblogs Adapter Integration Tests
//!
//! HTTP-level behavior of `CnblogsClient` against a local mock server.

use std::time::Duration;

use cnblogs_publish::{ApiError, BlogApi, CnblogsClient, Credentials, PostPayload, RemotePost};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> CnblogsClient {
    CnblogsClient::new(server.uri(), Credentials::new("session=abc", "xsrf-123")).unwrap()
}

#[tokio::test]
async fn test_fetch_post_sends_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts/42"))
        .and(header("Cookie", "session=abc"))
        .and(header("X-XSRF-TOKEN", "xsrf-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "title": "Hello",
            "datePublished": "2025-11-22T13:15:00.000Z",
            "blogId": 9,
            "url": "//www.cnblogs.com/me/p/42"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let post = client(&server).fetch_post(42).await.unwrap();
    assert_eq!(
        post,
        RemotePost {
            id: Some(42),
            date_published: Some("2025-11-22T13:15:00.000Z".to_string()),
            author: None,
            blog_id: Some(json!(9)),
            url: Some(json!("//www.cnblogs.com/me/p/42")),
        }
    );
}

#[tokio::test]
async fn test_fetch_post_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts/7"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_post(7).await.unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "missing");
        }
        other => panic!("expected a status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_save_post_create() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/posts"))
        .and(header("X-XSRF-TOKEN", "xsrf-123"))
        .and(header("Referer", format!("{}/posts/edit", server.uri()).as_str()))
        .and(body_partial_json(json!({
            "title": "Hello",
            "postBody": "body",
            "isMarkdown": true,
            "isDraft": false,
            "isPublished": true,
            "tags": ["a", "b"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1001,
            "url": "//www.cnblogs.com/me/p/1001",
            "title": "Hello"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = PostPayload::new("Hello", "body", vec!["a".to_string(), "b".to_string()], false);
    let post = client(&server).save_post(&payload).await.unwrap();

    assert_eq!(post.id, 1001);
    assert_eq!(post.url, "//www.cnblogs.com/me/p/1001");
}

#[tokio::test]
async fn test_save_post_failure_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/posts"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"{"message":"server exploded"}"#),
        )
        .mount(&server)
        .await;

    let payload = PostPayload::new("Hello", "body", vec![], false);
    let err = client(&server).save_post(&payload).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 500, .. }));
    assert!(err.to_string().contains("server exploded"));
}

#[tokio::test]
async fn test_save_post_invalid_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let payload = PostPayload::new("Hello", "body", vec![], false);
    let err = client(&server).save_post(&payload).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_fetch_timeout_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = client(&server).with_timeouts(Duration::from_millis(100), Duration::from_secs(1));
    let err = client.fetch_post(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
