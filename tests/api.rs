//! End-to-end tests driving the full router against a tempfile-backed store.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use blogd::application::posts::PostService;
use blogd::application::store::PostStore;
use blogd::config::CorsSettings;
use blogd::domain::validate::PostDefaults;
use blogd::infra::http::{ApiRateLimiter, ApiState, build_router};
use blogd::infra::store::FileStore;

const TEST_API_KEY: &str = "secret-test-key";
const DEFAULT_AUTHOR: &str = "Editorial Team";

struct TestApp {
    router: Router,
    data_file: PathBuf,
    _dir: TempDir,
}

fn test_app() -> TestApp {
    test_app_with_rate_limit(10_000)
}

fn test_app_with_rate_limit(max_requests: u32) -> TestApp {
    let dir = TempDir::new().expect("tempdir");
    let data_file = dir.path().join("blog-data.txt");

    let store: Arc<dyn PostStore> = Arc::new(FileStore::new(data_file.clone()));
    let posts = Arc::new(PostService::new(
        store,
        PostDefaults {
            author: DEFAULT_AUTHOR.to_string(),
            image: "/api/placeholder/800/400".to_string(),
        },
    ));
    let state = ApiState {
        posts,
        api_key: TEST_API_KEY.into(),
        rate_limiter: Arc::new(ApiRateLimiter::new(Duration::from_secs(60), max_requests)),
    };

    TestApp {
        router: build_router(
            state,
            &CorsSettings {
                allowed_origins: None,
            },
        ),
        data_file,
        _dir: dir,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("request")
}

fn mutate(method: &str, path: &str, key: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request")
}

fn sixty_word_content() -> String {
    vec!["word"; 60].join(" ")
}

fn valid_payload() -> Value {
    json!({
        "title": "Hello World Title Here",
        "excerpt": "A sufficiently long excerpt text",
        "content": sixty_word_content(),
    })
}

#[tokio::test]
async fn health_reports_running() {
    let app = test_app();
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Blog API is running");
    assert!(body["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn empty_collection_lists_as_empty() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/blogs")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn create_then_list_and_get_round_trips() {
    let app = test_app();

    let (status, body) = send(
        &app,
        mutate("POST", "/api/blogs", Some(TEST_API_KEY), Some(&valid_payload())),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Blog post created successfully");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["slug"], "hello-world-title-here");
    assert_eq!(body["data"]["readTime"], "1 min read");
    assert_eq!(body["data"]["featured"], false);
    assert_eq!(body["data"]["author"], DEFAULT_AUTHOR);
    assert_eq!(body["data"]["image"], "/api/placeholder/800/400");
    assert_eq!(body["data"]["tags"], json!([]));

    let (status, body) = send(&app, get("/api/blogs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, body) = send(&app, get("/api/blogs/hello-world-title-here")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Hello World Title Here");
}

#[tokio::test]
async fn missing_api_key_is_rejected_without_side_effects() {
    let app = test_app();

    let (status, body) = send(
        &app,
        mutate("POST", "/api/blogs", None, Some(&valid_payload())),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid or missing API key");
    assert!(!app.data_file.exists());
}

#[tokio::test]
async fn wrong_api_key_is_rejected() {
    let app = test_app();

    let (status, _) = send(
        &app,
        mutate("POST", "/api/blogs", Some("not-the-key"), Some(&valid_payload())),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, mutate("DELETE", "/api/blogs/1", Some("nope"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn api_key_in_query_is_accepted() {
    let app = test_app();

    let (status, _) = send(
        &app,
        mutate(
            "POST",
            &format!("/api/blogs?apiKey={TEST_API_KEY}"),
            None,
            Some(&valid_payload()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn validation_failures_are_itemized() {
    let app = test_app();

    let payload = json!({
        "title": "abc",
        "excerpt": "a perfectly valid excerpt",
        "content": "too short",
    });
    let (status, body) = send(
        &app,
        mutate("POST", "/api/blogs", Some(TEST_API_KEY), Some(&payload)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Validation error");
    assert_eq!(body["details"].as_array().map(Vec::len), Some(2));
    assert!(!app.data_file.exists());
}

#[tokio::test]
async fn ids_are_assigned_monotonically() {
    let app = test_app();

    for expected in 1..=3u64 {
        let payload = json!({
            "title": format!("Distinct Title Number {expected}"),
            "excerpt": "A sufficiently long excerpt text",
            "content": sixty_word_content(),
        });
        let (status, body) = send(
            &app,
            mutate("POST", "/api/blogs", Some(TEST_API_KEY), Some(&payload)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], expected);
    }

    let (_, body) = send(
        &app,
        mutate("DELETE", "/api/blogs/3", Some(TEST_API_KEY), None),
    )
    .await;
    assert_eq!(body["data"]["id"], 3);

    let (_, body) = send(
        &app,
        mutate("POST", "/api/blogs", Some(TEST_API_KEY), Some(&valid_payload())),
    )
    .await;
    assert_eq!(body["data"]["id"], 3);
}

#[tokio::test]
async fn duplicate_titles_disambiguate_slugs() {
    let app = test_app();

    let (_, first) = send(
        &app,
        mutate("POST", "/api/blogs", Some(TEST_API_KEY), Some(&valid_payload())),
    )
    .await;
    let (_, second) = send(
        &app,
        mutate("POST", "/api/blogs", Some(TEST_API_KEY), Some(&valid_payload())),
    )
    .await;

    let first_slug = first["data"]["slug"].as_str().expect("slug");
    let second_slug = second["data"]["slug"].as_str().expect("slug");
    assert_eq!(first_slug, "hello-world-title-here");
    assert_ne!(first_slug, second_slug);
    let suffix = second_slug
        .strip_prefix("hello-world-title-here-")
        .expect("timestamp suffix");
    assert!(suffix.chars().all(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn update_replaces_fields_but_keeps_identity() {
    let app = test_app();

    let (_, created) = send(
        &app,
        mutate("POST", "/api/blogs", Some(TEST_API_KEY), Some(&valid_payload())),
    )
    .await;
    let publish_date = created["data"]["publishDate"].clone();

    let replacement = json!({
        "title": "A Completely New Title",
        "excerpt": "Another sufficiently long excerpt",
        "content": vec!["word"; 250].join(" "),
        "featured": true,
    });
    let (status, body) = send(
        &app,
        mutate("PUT", "/api/blogs/1", Some(TEST_API_KEY), Some(&replacement)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Blog post updated successfully");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["publishDate"], publish_date);
    assert_eq!(body["data"]["slug"], "a-completely-new-title");
    assert_eq!(body["data"]["readTime"], "2 min read");
    assert_eq!(body["data"]["featured"], true);

    let (status, _) = send(&app, get("/api/blogs/hello-world-title-here")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found() {
    let app = test_app();

    let (status, body) = send(
        &app,
        mutate("PUT", "/api/blogs/42", Some(TEST_API_KEY), Some(&valid_payload())),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Blog post not found");
}

#[tokio::test]
async fn non_numeric_id_reads_as_not_found() {
    let app = test_app();

    let (status, _) = send(
        &app,
        mutate("DELETE", "/api/blogs/not-a-number", Some(TEST_API_KEY), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_returns_not_found() {
    let app = test_app();

    let (_, created) = send(
        &app,
        mutate("POST", "/api/blogs", Some(TEST_API_KEY), Some(&valid_payload())),
    )
    .await;
    let slug = created["data"]["slug"].as_str().expect("slug").to_string();

    let (status, body) = send(
        &app,
        mutate("DELETE", "/api/blogs/1", Some(TEST_API_KEY), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Blog post deleted successfully");
    assert_eq!(body["data"]["slug"], slug.as_str());

    let (status, body) = send(&app, get(&format!("/api/blogs/{slug}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Blog post not found");
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/blogs/never-written")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn unmatched_route_returns_envelope_404() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Endpoint not found");
}

#[tokio::test]
async fn unreadable_store_lists_as_empty() {
    let app = test_app();
    std::fs::write(&app.data_file, "no markers in this file\n").expect("seed");

    let (status, body) = send(&app, get("/api/blogs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn requests_over_the_ceiling_are_throttled() {
    let app = test_app_with_rate_limit(2);

    for _ in 0..2 {
        let (status, _) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
}
