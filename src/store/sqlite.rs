use std::path::Path;
use std::sync::Mutex;

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{Connection, OptionalExtension, ToSql, params_from_iter};

use super::StoreAdapter;
use super::schema::SCHEMA;
use super::value::{Row, SqlValue, Statement};
use crate::error::{Error, Result};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            SqlValue::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    let count = row.as_ref().column_count();
    let mut values = Vec::with_capacity(count);
    for idx in 0..count {
        values.push(match row.get_ref(idx)? {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => SqlValue::Text(String::from_utf8_lossy(b).into_owned()),
        });
    }
    Ok(Row::new(values))
}

impl StoreAdapter for SqliteStore {
    fn initialize(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn execute(&self, stmt: &Statement) -> Result<usize> {
        let rows = self
            .conn()
            .execute(&stmt.sql, params_from_iter(stmt.params.iter()))?;
        Ok(rows)
    }

    fn execute_all(&self, stmts: &[Statement]) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        for stmt in stmts {
            tx.execute(&stmt.sql, params_from_iter(stmt.params.iter()))?;
        }

        tx.commit()?;
        Ok(())
    }

    fn fetch_one(&self, stmt: &Statement) -> Result<Option<Row>> {
        let conn = self.conn();
        conn.query_row(&stmt.sql, params_from_iter(stmt.params.iter()), read_row)
            .optional()
            .map_err(Error::from)
    }

    fn fetch_all(&self, stmt: &Statement) -> Result<Vec<Row>> {
        let conn = self.conn();
        let mut prepared = conn.prepare(&stmt.sql)?;

        let rows = prepared.query_map(params_from_iter(stmt.params.iter()), read_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
