use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::GatewayError;
use thiserror::Error;

/// Message returned when a name or quantity is blank.
pub const EMPTY_FIELDS_MESSAGE: &str = "item name and quantity cannot be empty";

#[derive(Debug, Error)]
pub enum ItemError {
    /// Input decoded fine but breaks a domain rule
    #[error("{0}")]
    Validation(String),

    #[error("Item {0} not found")]
    NotFound(i64),

    /// A storage call failed; `operation` names what the repository was doing
    #[error("Failed to {operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: GatewayError,
    },

    /// Reading rows failed part way through a listing
    #[error("Failed while reading item rows: {0}")]
    Iteration(#[source] GatewayError),
}

impl ItemError {
    pub(crate) fn persistence(operation: &'static str, source: GatewayError) -> Self {
        Self::Persistence { operation, source }
    }
}

pub type ItemResult<T> = Result<T, ItemError>;

/// Convert ItemError to AppError for standardized error responses
impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::Validation(msg) => AppError::Validation(msg),
            ItemError::NotFound(id) => AppError::NotFound(format!("Item {} not found", id)),
            err @ (ItemError::Persistence { .. } | ItemError::Iteration(_)) => {
                AppError::Database(err.to_string())
            }
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                ItemError::Validation(EMPTY_FIELDS_MESSAGE.into()),
                StatusCode::BAD_REQUEST,
            ),
            (ItemError::NotFound(3), StatusCode::NOT_FOUND),
            (
                ItemError::persistence("delete item", GatewayError::Query("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ItemError::Iteration(GatewayError::Iteration("conn reset".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_persistence_error_keeps_operation_and_cause() {
        let err = ItemError::persistence("list items", GatewayError::Connection("refused".into()));
        assert_eq!(
            err.to_string(),
            "Failed to list items: Connection failed: refused"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
