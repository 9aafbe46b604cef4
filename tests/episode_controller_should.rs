use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use resolver::config::AppConfig;
use resolver::server::ApplicationServer;
use resolver::server::services::app_services::AppServices;
use resolver::upstream::{DynUpstreamClient, MockUpstreamClientTrait, UpstreamError};
use serde_json::{Value, json};
use tower::ServiceExt;

const SHOW: &str = "ReooPAxPMsHM4KPMY";

// "/apivtwo/clock?id=1" run backwards through the locator table
const CLOCK_LOCATOR: &str = "175948514e4c4f57175b54575b5307515c0509";

const EPISODE_INDEX: &str =
    r#"{"data":{"show":{"availableEpisodesDetail":{"sub":["2","1"],"dub":[]}}}}"#;

fn episode_body() -> String {
    format!(
        r#"{{"data":{{"episode":{{"sourceUrls":[{{"sourceUrl":"--{}","sourceName":"S-mp4"}}]}}}}}}"#,
        CLOCK_LOCATOR
    )
}

fn app(upstream: MockUpstreamClientTrait) -> axum::Router {
    let config = Arc::new(AppConfig {
        max_attempts: 1,
        ..Default::default()
    });
    let services = AppServices::with_upstream(config, Arc::new(upstream) as DynUpstreamClient);
    ApplicationServer::router(services)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn return_the_resolved_stream() {
    let mut upstream = MockUpstreamClientTrait::new();
    let body = episode_body();
    upstream
        .expect_graphql()
        .withf(|variables, _| variables.contains(r#""translationType":"dub""#))
        .returning(move |_, _| Ok(body.clone()));
    upstream
        .expect_fetch_provider()
        .withf(|url| url == "https://allanime.day/apivtwo/clock.json?id=1")
        .returning(|_| {
            Ok(r#"{"links":[{"link":"https://files.example/ep2.mp4","resolutionStr":"Mp4"}]}"#
                .to_string())
        });

    let (status, body) = get(
        app(upstream),
        &format!("/api/v1/shows/{}/episodes/2/stream?mode=dub&quality=best", SHOW),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "url": "https://files.example/ep2.mp4", "label": "Mp4", "attempts": 1 })
    );
}

#[tokio::test]
async fn answer_404_with_the_reason_when_nothing_resolves() {
    let mut upstream = MockUpstreamClientTrait::new();
    upstream
        .expect_graphql()
        .times(1)
        .returning(|_, _| Ok(r#"{"data":{"episode":null}}"#.to_string()));

    let (status, body) = get(
        app(upstream),
        &format!("/api/v1/shows/{}/episodes/1/stream", SHOW),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "reason": "no_providers", "attempts": 1 }));
}

#[tokio::test]
async fn reject_bad_requests_with_a_json_error() {
    for uri in [
        format!("/api/v1/shows/{}/episodes/1/stream?mode=raw", SHOW),
        format!(
            "/api/v1/shows/{}/episodes/1/stream?quality={}",
            SHOW,
            "1".repeat(17)
        ),
        format!("/api/v1/shows/{}/episodes/0/stream", SHOW),
        format!("/api/v1/shows/{}/episodes/first/stream", SHOW),
    ] {
        // any upstream call would panic the mock
        let (status, body) = get(app(MockUpstreamClientTrait::new()), &uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].is_string(), "{}", uri);
    }
}

#[tokio::test]
async fn list_episodes() {
    let mut upstream = MockUpstreamClientTrait::new();
    upstream
        .expect_graphql()
        .returning(|_, _| Ok(EPISODE_INDEX.to_string()));

    let (status, body) = get(app(upstream), &format!("/api/v1/shows/{}/episodes", SHOW)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "show_id": SHOW, "mode": "sub", "episodes": [1, 2] })
    );
}

#[tokio::test]
async fn answer_404_for_an_empty_episode_list() {
    let mut upstream = MockUpstreamClientTrait::new();
    upstream
        .expect_graphql()
        .returning(|_, _| Ok(EPISODE_INDEX.to_string()));

    let (status, _) = get(
        app(upstream),
        &format!("/api/v1/shows/{}/episodes?mode=dub", SHOW),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn answer_502_when_the_episode_index_is_unreachable() {
    let mut upstream = MockUpstreamClientTrait::new();
    upstream.expect_graphql().returning(|_, _| {
        Err(UpstreamError::Status {
            status: 503,
            url: "https://api.allanime.day/api".to_string(),
        })
    });

    let (status, body) = get(app(upstream), &format!("/api/v1/shows/{}/episodes", SHOW)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({ "error": "upstream unavailable" }));
}

#[tokio::test]
async fn report_degraded_health_when_upstream_is_down() {
    let mut upstream = MockUpstreamClientTrait::new();
    upstream
        .expect_graphql()
        .returning(|_, _| Err(UpstreamError::Format("connection refused".to_string())));

    let (status, body) = get(app(upstream), "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["upstream"]["status"], "degraded");
    assert_eq!(body["environment"], "development");
}
