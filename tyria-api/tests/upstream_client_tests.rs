//! Gw2Client against a mocked upstream over real HTTP

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use tyria_api::{create_api_router, create_schema, ApiConfig, ApiResult, Gw2Client};
use tyria_core::{Cursor, Resolver, UpstreamError, UpstreamSource, DAILY_ENDPOINT};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, prefix: &str) -> ApiResult<Gw2Client> {
    Gw2Client::new(&ApiConfig {
        upstream_base_url: format!("{}{}", server.uri(), prefix),
        ..Default::default()
    })
}

#[tokio::test]
async fn test_requests_join_under_versioned_base() -> ApiResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/achievements/daily"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pve": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "/v2")?;
    let body = client.request("achievements/daily").await?;
    assert_eq!(body, json!({"pve": []}));
    Ok(())
}

#[tokio::test]
async fn test_invalid_ids_404_resolves_to_empty_list() -> ApiResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/achievements"))
        .and(query_param("ids", "999999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"text": "all ids provided are invalid"})),
        )
        .mount(&server)
        .await;

    let resolver = Resolver::new(Arc::new(client_for(&server, "/v2/")?));
    let achievements = resolver
        .achievements(&[999_999], Cursor::default())
        .await?;
    assert!(achievements.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() -> ApiResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/masteries"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>Not Found</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, "/v2/")?;
    match client.request("masteries").await {
        Err(UpstreamError::Decode { endpoint, reason }) => {
            assert_eq!(endpoint, "masteries");
            assert!(reason.starts_with("HTTP 404"), "{}", reason);
        }
        other => panic!("expected decode error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_prerequisites_fetched_level_by_level() -> ApiResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/achievements"))
        .and(query_param("ids", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "name": "Third", "prerequisites": [2]}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/achievements"))
        .and(query_param("ids", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "name": "Second", "prerequisites": [3]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = Resolver::new(Arc::new(client_for(&server, "/v2/")?));
    let achievements = resolver.achievements(&[3], Cursor::default()).await?;

    assert_eq!(achievements.len(), 1);
    let root = &achievements[0];
    assert_eq!(root.name, "Third");
    assert_eq!(root.prerequisites.len(), 1);
    assert_eq!(root.prerequisites[0].name, "Second");
    // The cycle back to 3 is dropped when rendering.
    assert!(root.prerequisites[0].prerequisites.is_empty());
    Ok(())
}

async fn error_code_for(status: u16, body: ResponseTemplate) -> ApiResult<Option<async_graphql::Value>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/achievements"))
        .respond_with(body)
        .mount(&server)
        .await;

    let schema = create_schema(Resolver::new(Arc::new(client_for(&server, "/v2/")?)));
    let response = schema.execute("{ achievementIds }").await;

    assert_eq!(response.errors.len(), 1, "HTTP {}", status);
    Ok(response.errors[0]
        .extensions
        .as_ref()
        .and_then(|ext| ext.get("code"))
        .cloned())
}

#[tokio::test]
async fn test_graphql_error_carries_upstream_code() -> ApiResult<()> {
    let code = error_code_for(200, ResponseTemplate::new(200).set_body_string("oops")).await?;
    assert_eq!(code, Some(async_graphql::Value::from("UPSTREAM_INVALID_RESPONSE")));

    let code = error_code_for(
        503,
        ResponseTemplate::new(503).set_body_json(json!({"text": "API not active"})),
    )
    .await?;
    assert_eq!(code, Some(async_graphql::Value::from("UPSTREAM_UNAVAILABLE")));
    Ok(())
}

#[tokio::test]
async fn test_server_error_with_json_body_is_transport_error() -> ApiResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/achievements/daily"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"text": "API not active"})))
        .mount(&server)
        .await;

    let client = client_for(&server, "/v2/")?;
    match client.request(DAILY_ENDPOINT).await {
        Err(UpstreamError::Transport { endpoint, reason }) => {
            assert_eq!(endpoint, DAILY_ENDPOINT);
            assert!(reason.starts_with("HTTP 503"), "{}", reason);
            assert!(reason.contains("API not active"), "{}", reason);
        }
        other => panic!("expected transport error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_readiness_fails_when_upstream_answers_server_error() -> ApiResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/achievements/daily"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"text": "API not active"})))
        .mount(&server)
        .await;

    let app = create_api_router(
        Resolver::new(Arc::new(client_for(&server, "/v2/")?)),
        &ApiConfig::default(),
    )?;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/ready")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}
