use chrono::{DateTime, Utc};

/// Positional statement parameter (`$1`, `$2`, ...) and decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    BigInt(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Null,
}

impl SqlValue {
    /// Short type label used in decode error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::BigInt(_) => "bigint",
            Self::Text(_) => "text",
            Self::Timestamp(_) => "timestamptz",
            Self::Null => "null",
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::BigInt(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
