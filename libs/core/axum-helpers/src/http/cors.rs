use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

/// Environment variable holding comma-separated allowed origins.
pub const CORS_ALLOWED_ORIGIN: &str = "CORS_ALLOWED_ORIGIN";

/// Creates a CORS layer for the given origins.
///
/// - Methods: GET, POST, DELETE, OPTIONS
/// - Headers: Content-Type, Accept
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Parses a comma-separated origin list, ignoring blanks.
pub fn parse_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<HeaderValue>().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid {CORS_ALLOWED_ORIGIN} value '{s}': {e}"),
                )
            })
        })
        .collect()
}

/// Builds the CORS layer from `CORS_ALLOWED_ORIGIN`.
///
/// CORS is usually added by the reverse proxy in front of the service, so an
/// unset or blank variable yields `None`. Invalid origins are an error.
pub fn cors_layer_from_env() -> io::Result<Option<CorsLayer>> {
    let Ok(raw) = std::env::var(CORS_ALLOWED_ORIGIN) else {
        return Ok(None);
    };

    let origins = parse_origins(&raw)?;
    if origins.is_empty() {
        return Ok(None);
    }

    info!("CORS configured with allowed origins: {}", raw);
    Ok(Some(create_cors_layer(origins)))
}
