//! Integration tests for the issue events fetcher against a mock GitHub API

use assert_matches::assert_matches;
use gpri_core::http::GitHubApiClient;
use gpri_core::{Error, ErrorKind, RepoSlug};
use mockito::Matcher;
use std::time::Duration;

const EVENTS_PATH: &str = "/repos/octocat/Hello-World/issues/events";
// base64("octocat:token")
const BASIC_AUTH: &str = "Basic b2N0b2NhdDp0b2tlbg==";

fn repo() -> RepoSlug {
    RepoSlug {
        owner: "octocat".to_string(),
        name: "Hello-World".to_string(),
    }
}

fn client(base_url: &str) -> GitHubApiClient {
    GitHubApiClient::new(base_url, "octocat", "token", Duration::from_secs(5))
        .expect("client")
}

const MIXED_FEED: &str = r#"[
  {"id": 106, "event": "merged", "commit_id": "sha-106",
   "issue": {"number": 16, "title": "Newest merge", "labels": [{"name": "feature"}]}},
  {"id": 105, "event": "closed", "commit_id": null,
   "issue": {"number": 16, "title": "Newest merge", "labels": []}},
  {"id": 104, "event": "referenced", "commit_id": "sha-104",
   "issue": {"number": 15, "title": "Referenced", "labels": []}},
  {"id": 103, "event": "merged", "commit_id": "sha-103",
   "issue": {"number": 14, "title": "Older merge", "labels": [{"name": "bug"}, {"name": "p1"}]}},
  {"id": 102, "event": "labeled", "commit_id": null,
   "issue": {"number": 14, "title": "Older merge", "labels": []}}
]"#;

#[tokio::test]
async fn test_fetch_filters_merged_events_in_order() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", EVENTS_PATH)
        .match_query(Matcher::UrlEncoded("per_page".into(), "30".into()))
        .match_header("authorization", BASIC_AUTH)
        .match_header("user-agent", Matcher::Regex("^gpri/".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(MIXED_FEED)
        .expect(1)
        .create_async()
        .await;

    let events = client(&server.url())
        .fetch_merge_events(&repo())
        .await
        .unwrap();

    mock.assert_async().await;
    let ids: Vec<u64> = events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![106, 103]);
    assert_eq!(events[1].commit_id, "sha-103");
    assert_eq!(events[1].issue.label_names(), "bug:p1");
}

#[tokio::test]
async fn test_fetch_tolerates_trailing_slash_in_base_url() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", EVENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let events = client(&format!("{}/", server.url()))
        .fetch_merge_events(&repo())
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_fetch_error_status_with_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", EVENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Bad credentials", "documentation_url": "https://docs.github.com/rest"}"#)
        .create_async()
        .await;

    let err = client(&server.url())
        .fetch_merge_events(&repo())
        .await
        .unwrap_err();

    assert_matches!(err, Error::Api(ref msg) if msg == "HTTP error 401 Unauthorized; error message: Bad credentials");
}

#[tokio::test]
async fn test_fetch_error_status_without_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", EVENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let err = client(&server.url())
        .fetch_merge_events(&repo())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.message(), "HTTP error 404 Not Found");
}

#[tokio::test]
async fn test_fetch_rate_limited() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", EVENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(403)
        .with_header("x-ratelimit-remaining", "0")
        .with_header("x-ratelimit-reset", "1700000000")
        .with_body(r#"{"message": "API rate limit exceeded"}"#)
        .create_async()
        .await;

    let err = client(&server.url())
        .fetch_merge_events(&repo())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    assert!(err.message().contains("1700000000"));
}

#[tokio::test]
async fn test_fetch_forbidden_without_rate_limit_is_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", EVENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(403)
        .with_header("x-ratelimit-remaining", "4999")
        .with_body(r#"{"message": "Resource not accessible by integration"}"#)
        .create_async()
        .await;

    let err = client(&server.url())
        .fetch_merge_events(&repo())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Api);
    assert!(err.message().ends_with("Resource not accessible by integration"));
}

#[tokio::test]
async fn test_fetch_object_body_is_payload_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", EVENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"events": []}"#)
        .create_async()
        .await;

    let err = client(&server.url())
        .fetch_merge_events(&repo())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Payload);
    assert_eq!(
        err.message(),
        "Failed to parse github events: response not an array"
    );
}

#[tokio::test]
async fn test_fetch_truncated_body_is_payload_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", EVENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"[{"id": 1, "event": "merged", "commit_id": "a", "issue": {"#)
        .create_async()
        .await;

    let err = client(&server.url())
        .fetch_merge_events(&repo())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Payload);
}

#[tokio::test]
async fn test_fetch_connection_refused_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr))
        .fetch_merge_events(&repo())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_fetch_timeout_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Accept and hold the connection without answering
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        drop(socket);
    });

    let client = GitHubApiClient::new(
        format!("http://{}", addr),
        "octocat",
        "token",
        Duration::from_millis(300),
    )
    .unwrap();

    let err = client.fetch_merge_events(&repo()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.message().contains("timed out"), "{}", err);

    server.abort();
}
