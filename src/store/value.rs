use crate::error::{Error, Result};

/// A parameter or column value, the narrow set the engine and the SQL
/// backend agree on.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => Self::Null,
        }
    }
}

/// One parameterized statement handed to the adapter.
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// A fetched row. Values are positional, matching the SELECT column list;
/// a type mismatch means the stored data drifted from the schema.
#[derive(Debug, Clone)]
pub struct Row {
    values: Vec<SqlValue>,
}

impl Row {
    #[must_use]
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    pub fn text(&self, idx: usize) -> Result<&str> {
        match self.values.get(idx) {
            Some(SqlValue::Text(value)) => Ok(value),
            other => Err(Error::MalformedPayload(format!(
                "expected text at column {idx}, got {other:?}"
            ))),
        }
    }

    pub fn integer(&self, idx: usize) -> Result<i64> {
        match self.values.get(idx) {
            Some(SqlValue::Integer(value)) => Ok(*value),
            other => Err(Error::MalformedPayload(format!(
                "expected integer at column {idx}, got {other:?}"
            ))),
        }
    }

    pub fn boolean(&self, idx: usize) -> Result<bool> {
        self.integer(idx).map(|value| value != 0)
    }
}
