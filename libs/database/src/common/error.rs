/// Error vocabulary of the persistence gateway.
///
/// Driver errors are flattened into these variants so callers never see
/// driver-specific types.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Storage could not be reached or a pooled connection could not be acquired
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The statement reached storage and failed there
    #[error("Query failed: {0}")]
    Query(String),

    /// A single-row query returned nothing
    #[error("Query returned no rows")]
    NoRows,

    /// A column was missing, NULL or of an unexpected type
    #[error("Failed to decode column '{column}': {details}")]
    Decode { column: String, details: String },

    /// Reading the next row from a result cursor failed
    #[error("Row iteration failed: {0}")]
    Iteration(String),

    /// Connection settings could not be turned into a pool
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    pub fn decode(column: &str, details: impl Into<String>) -> Self {
        Self::Decode {
            column: column.to_string(),
            details: details.into(),
        }
    }

    /// Whether the failure means storage is unreachable rather than a bad statement
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_names_column() {
        let err = GatewayError::decode("created_at", "unexpected NULL");
        assert_eq!(
            err.to_string(),
            "Failed to decode column 'created_at': unexpected NULL"
        );
        assert!(!err.is_connection());
    }

    #[test]
    fn test_connection_error_is_connection() {
        assert!(GatewayError::Connection("refused".into()).is_connection());
        assert!(!GatewayError::Query("syntax".into()).is_connection());
    }
}
