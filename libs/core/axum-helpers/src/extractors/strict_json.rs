//! JSON body extractor that rejects anything but exactly one well-formed value.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_LENGTH,
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use tower_http::timeout::TimeoutError;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Strict JSON extractor.
///
/// Unlike [`axum::Json`] it:
/// - caps the body at [`MAX_BODY_BYTES`] and answers 413 past that, checking
///   `Content-Length` before reading anything;
/// - does not require a `Content-Type` header;
/// - reports empty bodies, syntax errors, type/field errors and trailing data
///   with distinct 400 messages;
/// - answers 408 when a `RequestBodyTimeoutLayer` cuts off a slow body.
///
/// Unknown fields are only rejected when `T` uses `#[serde(deny_unknown_fields)]`.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::StrictJson;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// #[serde(deny_unknown_fields)]
/// struct CreateItem {
///     name: String,
/// }
///
/// async fn create(StrictJson(input): StrictJson<CreateItem>) -> String {
///     input.name
/// }
/// ```
pub struct StrictJson<T>(pub T);

impl<T, S> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let declared = req
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<usize>().ok());
        if declared.is_some_and(|len| len > MAX_BODY_BYTES) {
            return Err(too_large());
        }

        let bytes = Limited::new(req.into_body(), MAX_BODY_BYTES)
            .collect()
            .await
            .map_err(|e| {
                if e.is::<LengthLimitError>() {
                    too_large()
                } else if timed_out(&*e) {
                    AppError::RequestTimeout(
                        "Request body was not received within the read timeout".to_string(),
                    )
                } else {
                    AppError::BadRequest(format!("Failed to read request body: {e}"))
                }
            })?
            .to_bytes();

        decode(&bytes).map(StrictJson)
    }
}

/// Body read errors arrive wrapped by axum, so the whole source chain is checked.
fn timed_out(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<TimeoutError>() {
            return true;
        }
        current = e.source();
    }
    false
}

fn too_large() -> AppError {
    AppError::PayloadTooLarge("Request body must not be larger than 1MB".to_string())
}

/// Decodes exactly one JSON value of type `T` from `bytes`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::InvalidJson(
            "Request body must not be empty".to_string(),
        ));
    }

    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = <T as serde::Deserialize>::deserialize(&mut deserializer).map_err(describe)?;
    deserializer.end().map_err(|_| {
        AppError::InvalidJson("Request body must only contain a single JSON object".to_string())
    })?;

    Ok(value)
}

fn describe(err: serde_json::Error) -> AppError {
    let message = match err.classify() {
        Category::Syntax => format!(
            "Request body contains badly-formed JSON (at line {}, column {})",
            err.line(),
            err.column()
        ),
        Category::Eof => "Request body contains badly-formed JSON".to_string(),
        Category::Data => format!("Invalid request body: {err}"),
        Category::Io => format!("Failed to read request body: {err}"),
    };
    AppError::InvalidJson(message)
}
