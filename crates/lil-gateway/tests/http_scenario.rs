use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use lil_core::CodeFormat;
use lil_gateway::{App, AppState, InterstitialPage};
use lil_generator::RandomGenerator;
use lil_redirector::RedirectorService;
use lil_shortener::{ShortenerService, ShortenerSettings};
use lil_storage::InMemoryLinkStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const BASE_URL: &str = "https://li.l";

fn state() -> AppState {
    let store = Arc::new(InMemoryLinkStore::with_max_search_limit(3));
    let shortener = ShortenerService::new(
        Arc::clone(&store),
        RandomGenerator::default(),
        ShortenerSettings::default(),
    );
    let redirector = RedirectorService::new(store, CodeFormat::default());

    AppState::new(
        Arc::new(shortener),
        Arc::new(redirector),
        InterstitialPage::default(),
        BASE_URL,
        2,
    )
}

async fn send(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    App::service(state.clone())
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

async fn create(state: &AppState, body: Value) -> Response {
    send(state, Method::POST, "/api/new", Some(body)).await
}

#[tokio::test]
async fn create_redirect_interstitial_delete() {
    let state = state();

    let response = create(
        &state,
        json!({ "url": "https://example.com/a", "code": "abc12345" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record = body_json(response).await;
    assert_eq!(record["code"], "abc12345");
    assert_eq!(record["url"], "https://example.com/a");
    assert_eq!(record["short_url"], "https://li.l/abc12345");

    let response = send(&state, Method::GET, "/abc12345", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.com/a"
    );

    let response = send(&state, Method::GET, "/p/abc12345", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("https://example.com/a"));

    let response = send(&state, Method::DELETE, "/api/abc12345", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&state, Method::GET, "/abc12345", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&state, Method::DELETE, "/api/abc12345", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn trailing_slash_is_ignored() {
    let state = state();
    create(&state, json!({ "url": "https://example.com", "code": "abc12345" })).await;

    let response = send(&state, Method::GET, "/abc12345/", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = send(&state, Method::GET, "/p/abc12345/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn generated_code_and_get() {
    let state = state();

    let response = create(&state, json!({ "url": "https://example.com/x", "ttl": 3600 })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let record = body_json(response).await;
    let code = record["code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 8);
    assert!(record["expires_at"].is_string());

    let response = send(&state, Method::GET, &format!("/api/{code}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["url"], "https://example.com/x");
}

#[tokio::test]
async fn create_errors() {
    let state = state();
    create(&state, json!({ "url": "https://example.com", "code": "abc12345" })).await;

    let response = create(&state, json!({ "url": "https://example.com", "code": "abc12345" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_json(response).await["error"].is_string());

    let response = create(&state, json!({ "url": "https://example.com", "code": "bad" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = create(&state, json!({ "url": "ftp://example.com" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn url_with_embedded_newline_is_rejected() {
    let state = state();

    let response = create(
        &state,
        json!({ "url": "https://example.com/a\nb", "code": "abc12345" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&state, Method::GET, "/abc12345", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn zero_ttl_link_is_not_found() {
    let state = state();
    let response = create(
        &state,
        json!({ "url": "https://example.com", "code": "abc12345", "ttl": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&state, Method::GET, "/abc12345", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = send(&state, Method::GET, "/api/abc12345", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_pages_and_clamps() {
    let state = state();
    for code in ["docs1234", "docs5678", "docs9999", "docsabcd", "news1234"] {
        create(&state, json!({ "url": "https://example.com", "code": code })).await;
    }

    // No limit: the configured default of 2.
    let response = send(&state, Method::GET, "/api/search?query=docs", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["links"].as_array().unwrap().len(), 2);
    let cursor = page["next_cursor"].as_str().unwrap().to_string();

    // Oversized limit: clamped to the store maximum of 3.
    let response = send(
        &state,
        Method::GET,
        &format!("/api/search?query=docs&limit=50&cursor={cursor}"),
        None,
    )
    .await;
    let page = body_json(response).await;
    assert_eq!(page["links"].as_array().unwrap().len(), 2);
    assert!(page["next_cursor"].is_null());

    let response = send(&state, Method::GET, "/api/search?limit=50", None).await;
    let page = body_json(response).await;
    assert_eq!(page["links"].as_array().unwrap().len(), 3);

    let response = send(&state, Method::GET, "/api/search?limit=0", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_and_malformed_codes_are_not_found() {
    let state = state();

    for uri in ["/nope1234", "/p/nope1234", "/api/nope1234", "/way-too-long-code", "/api"] {
        let response = send(&state, Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn welcome_and_health() {
    let state = state();

    let response = send(&state, Method::GET, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("lil"));

    let response = send(&state, Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}
