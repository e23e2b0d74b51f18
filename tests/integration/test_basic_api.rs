//! Basic API integration tests

use axum::http::StatusCode;
use axum_test::TestServer;
use fishbone_api::config::AppConfig;
use fishbone_api::routes;
use serde_json::Value;

fn create_test_server() -> TestServer {
    let app_state = routes::create_app_state();
    TestServer::new(routes::create_app(app_state, &AppConfig::default())).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let response = create_test_server().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "fishbone-api");
}

#[tokio::test]
async fn test_openapi_endpoint() {
    let response = create_test_server().get("/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["paths"].get("/diagrams").is_some());
    assert!(body["paths"].get("/diagrams/{diagram_id}").is_some());
    assert!(body["paths"].get("/auth/login").is_some());
    assert!(body["components"]["schemas"].get("Bone").is_some());
    assert!(body["components"]["securitySchemes"].get("bearer_auth").is_some());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = create_test_server().get("/tables").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
