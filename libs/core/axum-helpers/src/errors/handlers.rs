use axum::response::{IntoResponse, Response};

use super::AppError;

/// Handler for 404 Not Found errors.
///
/// This can be used as a fallback handler in your router.
pub async fn not_found() -> Response {
    AppError::NotFound("The requested resource was not found".to_string()).into_response()
}

/// Handler for 405 Method Not Allowed errors.
///
/// Attach it with `MethodRouter::fallback` so unsupported methods get the
/// JSON error body instead of an empty response.
pub async fn method_not_allowed() -> Response {
    AppError::MethodNotAllowed.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_fallback_statuses() {
        assert_eq!(not_found().await.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            method_not_allowed().await.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
