use std::sync::{Arc, Mutex};

use inkstream_api::types::{BlogStatus, CreateBlogRequest, LoginRequest};
use inkstream_api::{BlogQuery, Client, Error, Query, RateLimitSink};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

/// Records every 429 notification the client forwards.
#[derive(Default)]
struct RecordingSink {
    notifications: Mutex<Vec<Option<u64>>>,
}

impl RateLimitSink for RecordingSink {
    fn on_rate_limited(&self, retry_after: Option<u64>) {
        self.notifications
            .lock()
            .unwrap()
            .push(retry_after);
    }
}

#[tokio::test]
async fn get_blogs_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("blogs.json");

    Mock::given(method("GET"))
        .and(path("/blog"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let page = client.get_blogs(&BlogQuery::published()).await.unwrap();

    assert_eq!(page.blogs.len(), 2);
    assert_eq!(page.cursor.pages, 3);
    assert_eq!(page.cursor.total, 23);

    let first = &page.blogs[0];
    assert_eq!(first.id, "65f1c09a2e8b4c0012ab34cd");
    assert_eq!(first.author.name, "Priya Raman");
    assert_eq!(first.views, 412);
    assert_eq!(first.status, BlogStatus::Published);

    let second = &page.blogs[1];
    assert_eq!(second.id, "b-202");
    assert_eq!(second.author.name, "Jonas Feld");
    assert_eq!(second.author.avatar, "");
    assert_eq!(second.views, 18);
}

#[tokio::test]
async fn get_blogs_passes_filter_params() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("blogs.json");

    Mock::given(method("GET"))
        .and(path("/blog"))
        .and(query_param("page", "2"))
        .and(query_param("status", "published"))
        .and(query_param("tag", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let query = BlogQuery::published().with_tag("rust").with_page(2);
    assert!(client.get_blogs(&query).await.is_ok());
}

#[tokio::test]
async fn server_error_with_envelope_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog"))
        .respond_with(ResponseTemplate::new(500).set_body_string(
            r#"{"success": false, "message": "Database unavailable"}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client.get_blogs(&BlogQuery::default()).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Database unavailable");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn server_error_without_message_uses_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog/missing-slug"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"success": false}"#))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client.get_blog_by_slug("missing-slug").await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Error: 404");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn success_false_on_2xx_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"success": false, "message": "Session expired"}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client.get_blogs(&BlogQuery::default()).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 200);
            assert_eq!(message, "Session expired");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_json_is_a_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client.get_blogs(&BlogQuery::default()).await.unwrap_err();
    assert!(matches!(err, Error::Network));
}

#[tokio::test]
async fn rate_limited_notifies_sink_and_returns_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "10")
                .set_body_string("Too Many Requests"),
        )
        .mount(&mock_server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let client =
        Client::with_base_url(&mock_server.uri()).with_rate_limit_sink(sink.clone());

    let err = client.get_blogs(&BlogQuery::default()).await.unwrap_err();
    assert!(matches!(err, Error::RateLimited));
    assert_eq!(*sink.notifications.lock().unwrap(), vec![Some(10)]);
}

#[tokio::test]
async fn rate_limited_without_retry_after_notifies_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let sink = Arc::new(RecordingSink::default());
    let client =
        Client::with_base_url(&mock_server.uri()).with_rate_limit_sink(sink.clone());

    let err = client.get_blogs(&BlogQuery::default()).await.unwrap_err();
    assert!(matches!(err, Error::RateLimited));
    assert_eq!(*sink.notifications.lock().unwrap(), vec![None]);
}

#[tokio::test]
async fn bearer_token_attached_when_present() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("blogs.json");

    Mock::given(method("GET"))
        .and(path("/blog/my-blogs"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    client.set_token("secret-token");
    let query = inkstream_api::MyBlogsQuery::default();
    assert!(client.get_my_blogs(&query).await.is_ok());
}

#[tokio::test]
async fn anonymous_request_has_no_auth_header() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("blogs.json");

    Mock::given(method("GET"))
        .and(path("/blog"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    client.set_token("secret-token");
    client.clear_token();
    client.get_blogs(&BlogQuery::default()).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn login_returns_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({
            "email": "priya@example.com",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"success": true, "message": "Login successful", "data": {
                "token": "jwt-abc",
                "user": {"id": "u-101", "name": "Priya Raman", "email": "priya@example.com"}
            }}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let session = client
        .login(&LoginRequest {
            email: "priya@example.com".to_string(),
            password: "hunter2".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(session.token, "jwt-abc");
    assert_eq!(session.user.name, "Priya Raman");
}

#[tokio::test]
async fn create_blog_omits_absent_optional_fields() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("blog_single.json");

    Mock::given(method("POST"))
        .and(path("/blog"))
        .and(body_json(serde_json::json!({
            "title": "Ship It Fridays",
            "description": "Why we deploy at the worst possible time.",
            "content": "We used to freeze deploys on Fridays. Then we stopped...",
            "tags": ["devops", "culture"],
            "status": "draft"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let blog = client
        .create_blog(&CreateBlogRequest {
            title: "Ship It Fridays".to_string(),
            description: "Why we deploy at the worst possible time.".to_string(),
            content: "We used to freeze deploys on Fridays. Then we stopped...".to_string(),
            tags: vec!["devops".to_string(), "culture".to_string()],
            cover_image: None,
            status: Some(BlogStatus::Draft),
        })
        .await
        .unwrap();
    assert_eq!(blog.slug, "ship-it-fridays");
}

#[tokio::test]
async fn search_tags_flattens_mixed_shapes() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("tags.json");

    Mock::given(method("GET"))
        .and(path("/blog/tags/search"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let tags = client.search_tags("rust").await.unwrap();
    assert_eq!(tags, vec!["rust", "rustaceans", "rust-embedded"]);
}
