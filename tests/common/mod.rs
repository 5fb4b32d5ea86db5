use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use campanile::config::cors::CorsConfig;
use campanile::config::server::ServerConfig;
use campanile::router::init_router;
use campanile::state::AppState;

pub fn test_app(pool: PgPool) -> Router {
    init_router(AppState {
        db: pool,
        cors_config: CorsConfig::default(),
        server_config: ServerConfig::default(),
    })
}

/// Send a JSON request with acting-identity headers and decode the JSON
/// response.
pub async fn send_as(
    app: &Router,
    method: Method,
    uri: &str,
    role: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-acting-user", Uuid::new_v4().to_string())
        .header("x-acting-role", role);

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

/// Send a request with no identity headers at all.
pub async fn send_anonymous(app: &Router, method: Method, uri: &str) -> StatusCode {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    app.clone().oneshot(request).await.unwrap().status()
}
