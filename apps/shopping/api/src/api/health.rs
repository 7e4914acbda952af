//! Readiness probe backed by a real database ping.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{AppError, errors::handlers::method_not_allowed};
use database::PersistenceGateway;

/// Report whether the database answers a ping
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "Health",
    responses(
        (status = 200, description = "Database reachable", body = String, content_type = "text/plain"),
        (status = 503, response = axum_helpers::errors::responses::ServiceUnavailableResponse)
    )
)]
pub async fn healthz(State(gateway): State<Arc<dyn PersistenceGateway>>) -> Response {
    match gateway.ping().await {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            AppError::ServiceUnavailable("Database connection failed".to_string()).into_response()
        }
    }
}

pub fn router(gateway: Arc<dyn PersistenceGateway>) -> Router {
    Router::new()
        .route("/healthz", get(healthz).fallback(method_not_allowed))
        .with_state(gateway)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use database::{GatewayError, MockPersistenceGateway};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn probe(gateway: MockPersistenceGateway) -> (StatusCode, String) {
        let response = router(Arc::new(gateway))
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_healthz_ok_when_ping_succeeds() {
        let mut gateway = MockPersistenceGateway::new();
        gateway.expect_ping().times(1).returning(|| Ok(()));

        let (status, body) = probe(gateway).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_healthz_unavailable_when_ping_fails() {
        let mut gateway = MockPersistenceGateway::new();
        gateway
            .expect_ping()
            .returning(|| Err(GatewayError::Connection("connection refused".into())));

        let (status, body) = probe(gateway).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("Database connection failed"));
        assert!(!body.contains("refused"));
    }
}
