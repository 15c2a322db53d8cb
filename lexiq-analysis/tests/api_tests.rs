//! Router integration tests
//!
//! Drives the full axum router (auth middleware, handlers, error envelopes)
//! with `oneshot` requests. Uploads go to a per-test temp directory.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use lexiq_analysis::{build_router, AppState, ServiceSettings};
use lexiq_common::lifecycle::start_all;

struct TestApp {
    state: AppState,
    router: Router,
    _dir: TempDir,
}

async fn test_app(auth_enabled: bool) -> TestApp {
    let dir = TempDir::new().unwrap();
    let settings = ServiceSettings::new(dir.path())
        .with_upload_dir(&dir.path().join("uploads"))
        .with_auth(auth_enabled);
    let state = AppState::new(settings);
    start_all(&state.services()).await.unwrap();
    TestApp {
        router: build_router(state.clone()),
        state,
        _dir: dir,
    }
}

async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn login(app: &TestApp, username: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"username": username, "password": "secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

fn multipart_body(boundary: &str, filename: &str, mime: &str, content: &str) -> String {
    format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
         Content-Type: {m}\r\n\r\n\
         {c}\r\n\
         --{b}--\r\n",
        b = boundary,
        f = filename,
        m = mime,
        c = content
    )
}

async fn upload(app: &TestApp, token: &str, filename: &str, mime: &str, content: &str) -> (StatusCode, Value) {
    let boundary = "lexiqtestboundary";
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/files/upload")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(multipart_body(boundary, filename, mime, content)))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_reports_running_services() {
    let app = test_app(true).await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["analysis"], true);
    assert_eq!(body["services"]["file_processing"], true);
    assert_eq!(body["services"]["database"], true);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_app(true).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/analyze",
        None,
        Some(json!({"content": "the cat"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/api/statistics", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_empty_credentials() {
    let app = test_app(true).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"username": "", "password": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_session_and_logout() {
    let app = test_app(true).await;
    let token = login(&app, "alice").await;

    let (status, body) = send(&app, Method::GET, "/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], lexiq_common::api::derive_user_id("alice"));

    let (status, body) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout successful");

    let (status, _) = send(&app, Method::GET, "/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_analyze_returns_bare_response() {
    let app = test_app(true).await;
    let token = login(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/analyze",
        Some(&token),
        Some(json!({"content": "  the cat  "})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("success").is_none());
    assert_eq!(body["status"], "completed");
    assert_eq!(body["language"], "en");
    assert_eq!(body["domain"], "general");
    assert_eq!(body["terms"].as_array().unwrap().len(), 2);
    assert_eq!(body["terms"][0]["text"], "the");
    assert_eq!(body["terms"][0]["classification"], "valid");
    assert_eq!(body["terms"][1]["start_position"], 4);
    assert_eq!(body["statistics"]["total_terms"], 2);
    assert_eq!(body["statistics"]["valid_terms"], 2);

    let request_id = body["request_id"].as_str().unwrap();
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/analyze/status/{}", request_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["progress"], 100);
}

#[tokio::test]
async fn test_analyze_mixed_classifications() {
    let app = test_app(true).await;
    let token = login(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/analyze",
        Some(&token),
        Some(json!({"content": "a cat2 don't", "domain": "legal"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["domain"], "legal");
    let labels: Vec<&str> = body["terms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["classification"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["critical", "review", "spelling"]);
    assert_eq!(body["statistics"]["critical_terms"], 1);
    assert_eq!(body["statistics"]["review_terms"], 1);
    assert_eq!(body["statistics"]["spelling_errors"], 1);
}

#[tokio::test]
async fn test_analyze_rejects_blank_content() {
    let app = test_app(true).await;
    let token = login(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/analyze",
        Some(&token),
        Some(json!({"content": "   \n"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Content cannot be empty");
}

#[tokio::test]
async fn test_malformed_bodies_get_validation_envelope() {
    let app = test_app(true).await;
    let token = login(&app, "alice").await;

    let (status, body) = send(&app, Method::POST, "/api/analyze", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/analyze/batch")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("[{\"content\": "))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error_code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/projects",
        Some(&token),
        Some(json!({"description": "no name"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_invalid_options_fail_the_run() {
    let app = test_app(true).await;
    let token = login(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/analyze",
        Some(&token),
        Some(json!({"content": "hello", "options": {"max_suggestions": 50}})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_code"], "ANALYSIS_ERROR");
}

#[tokio::test]
async fn test_status_of_unknown_request() {
    let app = test_app(true).await;
    let token = login(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/analyze/status/does-not-exist",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"status": "not_found"}));
}

#[tokio::test]
async fn test_batch_analysis_and_limit() {
    let app = test_app(true).await;
    let token = login(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/analyze/batch",
        Some(&token),
        Some(json!([{"content": "one"}, {"content": "two three"}])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1]["statistics"]["total_terms"], 2);

    let oversized: Vec<Value> = (0..11).map(|_| json!({"content": "word"})).collect();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/analyze/batch",
        Some(&token),
        Some(Value::Array(oversized)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Batch size cannot exceed 10 requests");

    // One bad request rejects the whole batch before anything runs
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/analyze/batch",
        Some(&token),
        Some(json!([{"content": "fine"}, {"content": ""}])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.state.usage.statistics(&lexiq_common::api::derive_user_id("alice")).total_analyses, 2);
}

#[tokio::test]
async fn test_statistics_are_per_user() {
    let app = test_app(true).await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    for content in ["the cat", "hello world again"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/analyze",
            Some(&alice),
            Some(json!({"content": content, "language": "fr"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(&app, Method::GET, "/api/statistics", Some(&alice), None).await;
    assert_eq!(body["data"]["total_analyses"], 2);
    assert_eq!(body["data"]["total_terms_analyzed"], 5);
    assert_eq!(body["data"]["most_used_language"], "fr");

    let (_, body) = send(&app, Method::GET, "/api/statistics", Some(&bob), None).await;
    assert_eq!(body["data"]["total_analyses"], 0);
}

#[tokio::test]
async fn test_projects_are_owner_scoped() {
    let app = test_app(true).await;
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/projects",
        Some(&alice),
        Some(json!({"name": "Contracts", "domain": "legal"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project created successfully");
    assert_eq!(body["data"]["name"], "Contracts");
    let project_id = body["data"]["project_id"].as_str().unwrap().to_string();

    let uri = format!("/api/projects/{}", project_id);
    let (status, _) = send(&app, Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "NOT_FOUND");

    let (_, body) = send(&app, Method::GET, "/api/projects", Some(&bob), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/projects",
        Some(&alice),
        Some(json!({"name": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_configuration_round_trip() {
    let app = test_app(true).await;
    let token = login(&app, "alice").await;

    let (_, body) = send(&app, Method::GET, "/api/config", Some(&token), None).await;
    assert_eq!(body["data"]["language"], "en");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/config",
        Some(&token),
        Some(json!({"language": "de", "domain": "medical"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Configuration updated successfully");

    let (_, body) = send(&app, Method::GET, "/api/config", Some(&token), None).await;
    assert_eq!(body["data"]["language"], "de");
    assert_eq!(body["data"]["domain"], "medical");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/config",
        Some(&token),
        Some(json!({"language": "xx"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feedback_submission() {
    let app = test_app(true).await;
    let token = login(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/feedback",
        Some(&token),
        Some(json!({"feedback_type": "bug", "content": "Scores look off", "rating": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "received");
    assert_eq!(body["data"]["message"], "Thank you for your feedback!");

    let (_, body) = send(&app, Method::GET, "/api/feedback", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/feedback",
        Some(&token),
        Some(json!({"feedback_type": "bug", "content": "x", "rating": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_generation_and_download() {
    let app = test_app(true).await;
    let token = login(&app, "alice").await;

    send(
        &app,
        Method::POST,
        "/api/analyze",
        Some(&token),
        Some(json!({"content": "the cat"})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/reports/generate",
        Some(&token),
        Some(json!({"format": "csv", "title": "Weekly"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Report generated successfully");
    let download_url = body["data"]["download_url"].as_str().unwrap().to_string();
    assert!(body["data"]["file_name"].as_str().unwrap().ends_with(".csv"));

    let request = Request::builder()
        .uri(&download_url)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .starts_with("attachment"));
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(!bytes.is_empty());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/reports/generate",
        Some(&token),
        Some(json!({"format": "pdf", "title": "Weekly"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_then_analyze_file() {
    let app = test_app(true).await;
    let token = login(&app, "alice").await;

    let (status, body) = upload(&app, &token, "notes.txt", "text/plain", "the cat sat").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "File uploaded and processed successfully");
    assert_eq!(body["data"]["file_type"], ".txt");
    assert_eq!(body["data"]["content"], "the cat sat");
    assert_eq!(body["data"]["word_count"], 3);
    assert_eq!(body["data"]["checksum"].as_str().unwrap().len(), 64);
    let file_id = body["data"]["file_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/files/{}/analyze", file_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["statistics"]["total_terms"], 3);

    let uri = format!("/api/files/{}", file_id);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_rejects_unsupported_type() {
    let app = test_app(true).await;
    let token = login(&app, "alice").await;

    let (status, body) = upload(&app, &token, "run.exe", "application/x-msdownload", "MZ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_auth_disabled_runs_anonymously() {
    let app = test_app(false).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/analyze",
        None,
        Some(json!({"content": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["total_terms"], 1);

    let (_, body) = send(&app, Method::GET, "/api/statistics", None, None).await;
    assert_eq!(body["data"]["user_id"], "anonymous");
    assert_eq!(body["data"]["total_analyses"], 1);
}
