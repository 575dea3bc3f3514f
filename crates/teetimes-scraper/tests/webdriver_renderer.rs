//! Integration tests for `WebDriverRenderer` against a mocked driver endpoint.
//!
//! Each test stands up a `wiremock` server that speaks just enough of the
//! W3C WebDriver protocol for the scenario under test.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use teetimes_scraper::{
    wait_for_time_slots, ExtractSettings, Extraction, PageRenderer, RenderError, RenderSession,
    RenderedDocument, WebDriverConfig, WebDriverRenderer,
};

fn test_renderer(endpoint: &str, max_retries: u32) -> WebDriverRenderer {
    WebDriverRenderer::new(&WebDriverConfig {
        endpoint: endpoint.to_owned(),
        headless: true,
        navigation_timeout_secs: 5,
        max_retries,
        retry_backoff_ms: 0,
    })
    .expect("failed to build test WebDriverRenderer")
}

fn element(id: &str) -> serde_json::Value {
    json!({ "element-6066-11e4-a52e-4f735466cecf": id })
}

async fn mount_new_session(server: &MockServer, session_id: &str) {
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { "sessionId": session_id, "capabilities": {} }
        })))
        .mount(server)
        .await;
}

async fn mount_delete_session(server: &MockServer, session_id: &str, times: u64) {
    Mock::given(method("DELETE"))
        .and(path(format!("/session/{session_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(times)
        .mount(server)
        .await;
}

fn extract_settings(wait_ms: u64) -> ExtractSettings {
    ExtractSettings {
        marker_selector: ".time-meridian".to_owned(),
        wait_budget: Duration::from_millis(wait_ms),
        poll_interval: Duration::from_millis(20),
    }
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_session_extracts_first_and_last_marker() {
    let server = MockServer::start().await;
    mount_new_session(&server, "s1").await;

    Mock::given(method("POST"))
        .and(path("/session/s1/url"))
        .and(body_partial_json(json!({
            "url": "https://golfnow.co.uk/tee-times/facility/100/search"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/session/s1/elements"))
        .and(body_partial_json(
            json!({ "using": "css selector", "value": ".time-meridian" }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [element("e1"), element("e2"), element("e3")]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/session/s1/element/e1/text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "7:00 AM" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/session/s1/element/e3/text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": "5:40 PM" })))
        .mount(&server)
        .await;

    mount_delete_session(&server, "s1", 1).await;

    let renderer = test_renderer(&server.uri(), 0);
    let mut session = renderer.open().await.expect("session should open");
    assert_eq!(session.session_id(), "s1");

    let document = session
        .navigate(&teetimes_scraper::facility_url("golfnow.co.uk", "100"))
        .await
        .expect("navigation should succeed");
    let extraction = wait_for_time_slots(&document, &extract_settings(1_000))
        .await
        .expect("extraction should succeed");

    match extraction {
        Extraction::Found(sample) => {
            assert_eq!(sample.first, "7:00 AM");
            assert_eq!(sample.last, "5:40 PM");
        }
        other => panic!("expected Found, got: {other:?}"),
    }

    drop(document);
    session.close().await.expect("close should succeed");
}

#[tokio::test]
async fn empty_element_list_times_out_within_budget() {
    let server = MockServer::start().await;
    mount_new_session(&server, "s2").await;

    Mock::given(method("POST"))
        .and(path("/session/s2/url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/session/s2/elements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .mount(&server)
        .await;

    mount_delete_session(&server, "s2", 1).await;

    let renderer = test_renderer(&server.uri(), 0);
    let mut session = renderer.open().await.unwrap();
    let document = session.navigate("https://example.test/").await.unwrap();

    let extraction = wait_for_time_slots(&document, &extract_settings(150))
        .await
        .unwrap();
    assert_eq!(extraction, Extraction::TimedOut);

    let markers = document.find_all(".time-meridian").await.unwrap();
    assert!(markers.is_empty());

    session.close().await.unwrap();
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn driver_navigation_error_maps_to_navigation_variant() {
    let server = MockServer::start().await;
    mount_new_session(&server, "s3").await;

    Mock::given(method("POST"))
        .and(path("/session/s3/url"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "value": {
                "error": "unknown error",
                "message": "net::ERR_NAME_NOT_RESOLVED",
                "stacktrace": ""
            }
        })))
        .mount(&server)
        .await;

    mount_delete_session(&server, "s3", 1).await;

    let renderer = test_renderer(&server.uri(), 0);
    let mut session = renderer.open().await.unwrap();
    let result = session.navigate("https://nowhere.invalid/").await;

    match result {
        Err(RenderError::Navigation { url, message }) => {
            assert_eq!(url, "https://nowhere.invalid/");
            assert!(
                message.contains("ERR_NAME_NOT_RESOLVED"),
                "unexpected message: {message}"
            );
        }
        other => panic!("expected Navigation error, got: {other:?}"),
    }

    session.close().await.unwrap();
}

#[tokio::test]
async fn session_refusal_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "value": {
                "error": "session not created",
                "message": "Chrome failed to start"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let renderer = test_renderer(&server.uri(), 3);
    let result = renderer.open().await;

    match result {
        Err(RenderError::SessionStart { message }) => {
            assert!(message.contains("session not created"), "got: {message}");
        }
        other => panic!("expected SessionStart error, got: {other:?}"),
    }
}

#[tokio::test]
async fn gateway_error_on_open_is_retried_and_recovers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    mount_new_session(&server, "s4").await;
    mount_delete_session(&server, "s4", 1).await;

    let renderer = test_renderer(&server.uri(), 1);
    let session = renderer.open().await;
    assert!(session.is_ok(), "expected Ok after retry, got: {session:?}");
    session.unwrap().close().await.unwrap();
}

#[tokio::test]
async fn unparseable_success_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let renderer = test_renderer(&server.uri(), 0);
    let result = renderer.open().await;
    assert!(
        matches!(result, Err(RenderError::Deserialize { .. })),
        "expected Deserialize error, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Session release
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dropped_session_is_deleted_in_background() {
    let server = MockServer::start().await;
    mount_new_session(&server, "s5").await;
    mount_delete_session(&server, "s5", 1).await;

    let renderer = test_renderer(&server.uri(), 0);
    let session = renderer.open().await.unwrap();
    drop(session);

    // Give the spawned delete a chance to run before the server verifies.
    tokio::time::sleep(Duration::from_millis(200)).await;
}

#[tokio::test]
async fn closed_session_is_not_deleted_twice() {
    let server = MockServer::start().await;
    mount_new_session(&server, "s6").await;
    mount_delete_session(&server, "s6", 1).await;

    let renderer = test_renderer(&server.uri(), 0);
    let session = renderer.open().await.unwrap();
    session.close().await.unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
}
