//! End-to-end tests: config file on disk → responder → HTTP router.

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use briefcast_config::AppConfig;
use briefcast_gateway::{FlashBriefingResponder, GatewayState, build_router};
use http_body_util::BodyExt;
use tower::ServiceExt;

const CONFIG: &str = r#"
[gateway]
port = 9000

[flash_briefings]
password = "secret"

[[flash_briefings.morning]]
title = "Hi"
text = "News"

[[flash_briefings.weather]]
title = "Weather for {{ city }}"
text = "Expect {{ forecast | default('clouds') }}."
uid = "weather-1"
audio_url = "https://example.com/weather.mp3"

[flash_briefings.broken]
title = "not a list"

[templates.variables]
city = "Lisbon"
"#;

fn load(content: &str) -> AppConfig {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    AppConfig::load_from(file.path()).unwrap()
}

fn router(config: &AppConfig) -> axum::Router {
    let responder = FlashBriefingResponder::from_config(config).unwrap();
    build_router(Arc::new(GatewayState {
        responder,
        legacy_alexa_route: config.gateway.legacy_alexa_route,
    }))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

#[tokio::test]
async fn e2e_serves_configured_briefing() {
    let config = load(CONFIG);
    assert_eq!(config.gateway.port, 9000);

    let (status, body) = get(router(&config), "/briefings/morning?password=secret").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["titleText"], "Hi");
    assert_eq!(items[0]["mainText"], "News");
    assert!(items[0].get("streamUrl").is_none());
    assert!(items[0].get("redirectionUrl").is_none());

    let date = items[0]["updateDate"].as_str().unwrap();
    assert!(date.ends_with(".0Z"));
    assert_eq!(date.len(), "2024-01-01T00:00:00.0Z".len());
}

#[tokio::test]
async fn e2e_wrong_password_is_401() {
    let config = load(CONFIG);
    let (status, body) = get(router(&config), "/briefings/morning?password=wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.is_empty());
}

#[tokio::test]
async fn e2e_unknown_briefing_is_404() {
    let config = load(CONFIG);
    let (status, body) = get(router(&config), "/briefings/evening?password=secret").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn e2e_malformed_briefing_is_404() {
    let config = load(CONFIG);
    let (status, _) = get(router(&config), "/briefings/broken?password=secret").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn e2e_templates_use_configured_variables() {
    let config = load(CONFIG);
    let (status, body) = get(
        router(&config),
        "/api/alexa/flash_briefings/weather?password=secret",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let item = &json[0];
    assert_eq!(item["titleText"], "Weather for Lisbon");
    assert_eq!(item["mainText"], "Expect clouds.");
    assert_eq!(item["uid"], "weather-1");
    assert_eq!(item["streamUrl"], "https://example.com/weather.mp3");
}

#[tokio::test]
async fn e2e_generated_uids_differ_between_requests() {
    let config = load(CONFIG);
    let app = router(&config);

    let (_, first) = get(app.clone(), "/briefings/morning?password=secret").await;
    let (_, second) = get(app, "/briefings/morning?password=secret").await;

    let first: serde_json::Value = serde_json::from_slice(&first).unwrap();
    let second: serde_json::Value = serde_json::from_slice(&second).unwrap();
    assert_eq!(first[0]["titleText"], second[0]["titleText"]);
    assert_ne!(first[0]["uid"], second[0]["uid"]);
}

#[test]
fn e2e_invalid_template_fails_config_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"
[flash_briefings]
password = "secret"

[[flash_briefings.morning]]
text = "{{ unclosed"
"#,
    )
    .unwrap();

    let err = AppConfig::load_from(file.path()).unwrap_err();
    assert!(err.to_string().contains("flash_briefings.morning[0].text"));
}

#[test]
fn e2e_starter_config_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    assert!(AppConfig::write_default(&path).unwrap());
    assert!(!AppConfig::write_default(&path).unwrap());

    let config = AppConfig::load_from(&path).unwrap();
    let responder = FlashBriefingResponder::from_config(&config).unwrap();
    let items = responder.render("morning").unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title_text.as_deref(), Some("Good morning"));
    assert_eq!(items[0].main_text.as_deref(), Some("Today looks sunny."));
}
