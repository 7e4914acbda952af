use std::fmt;

use chrono::{DateTime, Utc};

use super::SqlValue;
use crate::common::{GatewayError, GatewayResult};

/// Column access implemented by each backend's native row type.
pub trait RowSource: Send + Sync {
    fn get_i64(&self, column: &str) -> GatewayResult<i64>;
    fn get_text(&self, column: &str) -> GatewayResult<String>;
    fn get_timestamp(&self, column: &str) -> GatewayResult<DateTime<Utc>>;
}

/// Types that can be read out of a [`Row`] column.
pub trait FromColumn: Sized {
    fn from_column(source: &dyn RowSource, column: &str) -> GatewayResult<Self>;
}

impl FromColumn for i64 {
    fn from_column(source: &dyn RowSource, column: &str) -> GatewayResult<Self> {
        source.get_i64(column)
    }
}

impl FromColumn for String {
    fn from_column(source: &dyn RowSource, column: &str) -> GatewayResult<Self> {
        source.get_text(column)
    }
}

impl FromColumn for DateTime<Utc> {
    fn from_column(source: &dyn RowSource, column: &str) -> GatewayResult<Self> {
        source.get_timestamp(column)
    }
}

/// One result row, independent of the driver that produced it.
pub struct Row {
    source: Box<dyn RowSource>,
}

impl Row {
    pub fn new(source: impl RowSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Builds a row from `(column, value)` pairs.
    ///
    /// ```
    /// use database::{Row, SqlValue};
    ///
    /// let row = Row::from_values([("id", SqlValue::BigInt(1)), ("name", "Milk".into())]);
    /// assert_eq!(row.get::<i64>("id").unwrap(), 1);
    /// assert!(row.get::<i64>("name").is_err());
    /// ```
    pub fn from_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, SqlValue)>,
        K: Into<String>,
    {
        Self::new(ValueRow {
            columns: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }

    /// Reads `column` as `T`, failing with [`GatewayError::Decode`] when it
    /// is absent, NULL or of another type.
    pub fn get<T: FromColumn>(&self, column: &str) -> GatewayResult<T> {
        T::from_column(self.source.as_ref(), column)
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row").finish_non_exhaustive()
    }
}

/// In-memory row, used by test doubles and anything that assembles rows by hand.
#[derive(Debug, Clone, Default)]
pub struct ValueRow {
    columns: Vec<(String, SqlValue)>,
}

impl ValueRow {
    fn value(&self, column: &str) -> GatewayResult<&SqlValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .ok_or_else(|| GatewayError::decode(column, "no such column"))
    }

    fn mismatch(column: &str, expected: &str, found: &SqlValue) -> GatewayError {
        GatewayError::decode(
            column,
            format!("expected {expected}, found {}", found.type_name()),
        )
    }
}

impl RowSource for ValueRow {
    fn get_i64(&self, column: &str) -> GatewayResult<i64> {
        match self.value(column)? {
            SqlValue::BigInt(v) => Ok(*v),
            other => Err(Self::mismatch(column, "bigint", other)),
        }
    }

    fn get_text(&self, column: &str) -> GatewayResult<String> {
        match self.value(column)? {
            SqlValue::Text(v) => Ok(v.clone()),
            other => Err(Self::mismatch(column, "text", other)),
        }
    }

    fn get_timestamp(&self, column: &str) -> GatewayResult<DateTime<Utc>> {
        match self.value(column)? {
            SqlValue::Timestamp(v) => Ok(*v),
            other => Err(Self::mismatch(column, "timestamptz", other)),
        }
    }
}

/// Rows returned by a multi-row query.
///
/// Each step yields a `Result` so a failure part-way through a result set is
/// reported to the caller instead of silently ending the iteration.
#[derive(Debug, Default)]
pub struct RowCursor {
    rows: std::vec::IntoIter<GatewayResult<Row>>,
}

impl RowCursor {
    pub fn new(rows: Vec<Row>) -> Self {
        Self::from_results(rows.into_iter().map(Ok).collect())
    }

    pub fn from_results(rows: Vec<GatewayResult<Row>>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl Iterator for RowCursor {
    type Item = GatewayResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}
