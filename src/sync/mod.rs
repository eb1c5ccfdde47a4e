//! The synchronization engine between nested endpoint documents and their
//! normalized relational projection.
//!
//! Writes follow a replace-all-children policy: the parent row is upserted
//! in place, then every child table is cleared for the key and re-inserted
//! from the freshly decomposed document. List elements carry no identity
//! of their own, only position, so saves never diff against stored rows.
//! The whole write goes to the adapter as one batch; on backends with real
//! transactions the batch commits atomically.

mod compose;
mod decompose;
mod key;

pub use decompose::{DocRows, decompose};
pub use key::validate_key;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::store::schema::{CHILD_TABLES, ChildTable, PRODUCTS};
use crate::store::{SqlValue, Statement, StoreAdapter};
use crate::types::{EndpointDoc, EndpointSummary, ImportFailure, ImportReport};

const SELECT_PARENT: &str = "SELECT name, path, status, description, category, purpose, rank, methods
     FROM endpoints WHERE key = ?1";

const UPSERT_PARENT: &str = "INSERT INTO endpoints (key, name, path, status, description, category, purpose, rank, methods, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
     ON CONFLICT (key) DO UPDATE SET
        name = excluded.name,
        path = excluded.path,
        status = excluded.status,
        description = excluded.description,
        category = excluded.category,
        purpose = excluded.purpose,
        rank = excluded.rank,
        methods = excluded.methods,
        updated_at = excluded.updated_at";

/// Stateless between calls; holds nothing but the adapter handle. Two
/// concurrent saves for the same key are not coordinated: last writer
/// wins.
pub struct SyncEngine {
    store: Arc<dyn StoreAdapter>,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn StoreAdapter>) -> Self {
        Self { store }
    }

    pub fn initialize(&self) -> Result<()> {
        self.store.initialize()
    }

    pub fn close(&self) -> Result<()> {
        self.store.close()
    }

    /// Replaces the stored projection of `key` with `doc`.
    pub fn save_one(&self, key: &str, doc: &EndpointDoc) -> Result<()> {
        validate_key(key)?;
        let rows = decompose(doc)?;
        let now = format_datetime(&Utc::now());

        let mut batch = Vec::new();

        let mut parent_params: Vec<SqlValue> = Vec::with_capacity(11);
        parent_params.push(key.into());
        parent_params.extend(rows.parent);
        parent_params.push(now.clone().into());
        parent_params.push(now.into());
        batch.push(Statement::new(UPSERT_PARENT, parent_params));

        for table in CHILD_TABLES {
            batch.push(delete_children(table, key));
        }
        for (table, table_rows) in rows.children {
            for row in table_rows {
                batch.push(insert_child(table, key, row));
            }
        }

        self.store.execute_all(&batch)
    }

    /// Fetches and reassembles one document, or `None` when the key has no
    /// parent row. A stored payload that fails to deserialize surfaces as
    /// `MalformedPayload`, never as absence.
    pub fn get_one(&self, key: &str) -> Result<Option<EndpointDoc>> {
        let parent = self
            .store
            .fetch_one(&Statement::new(SELECT_PARENT, vec![key.into()]))?;
        let Some(parent) = parent else {
            return Ok(None);
        };

        let mut children = HashMap::new();
        for table in CHILD_TABLES {
            children.insert(table.name, self.store.fetch_all(&select_children(table, key))?);
        }

        compose::compose(key, &parent, &children).map(Some)
    }

    /// Parent-row fields plus products for every endpoint, ordered by rank
    /// ascending, creation order on ties.
    pub fn get_summary_list(&self) -> Result<Vec<EndpointSummary>> {
        let parents = self.store.fetch_all(&Statement::new(
            "SELECT key, name, path, status, description, category, purpose, rank, methods, created_at, updated_at
             FROM endpoints ORDER BY rank ASC, rowid ASC",
            vec![],
        ))?;

        let mut summaries = Vec::with_capacity(parents.len());
        for parent in &parents {
            let key = parent.text(0)?;
            let products = self.store.fetch_all(&select_children(&PRODUCTS, key))?;
            summaries.push(compose::compose_summary(parent, &products)?);
        }
        Ok(summaries)
    }

    /// Removes the parent row and every child row sharing its key. The
    /// engine cascades; the schema does not.
    pub fn delete_one(&self, key: &str) -> Result<bool> {
        let existing = self.store.fetch_one(&Statement::new(
            "SELECT key FROM endpoints WHERE key = ?1",
            vec![key.into()],
        ))?;
        if existing.is_none() {
            return Ok(false);
        }

        let mut batch: Vec<Statement> = CHILD_TABLES
            .iter()
            .map(|table| delete_children(table, key))
            .collect();
        batch.push(Statement::new(
            "DELETE FROM endpoints WHERE key = ?1",
            vec![key.into()],
        ));

        self.store.execute_all(&batch)?;
        Ok(true)
    }

    /// Best-effort bulk load: one failed document never aborts the batch.
    /// Each failure is logged and reported back to the caller.
    pub fn import_all(&self, docs: &BTreeMap<String, EndpointDoc>) -> ImportReport {
        let mut report = ImportReport::default();
        for (key, doc) in docs {
            match self.save_one(key, doc) {
                Ok(()) => report.succeeded.push(key.clone()),
                Err(e) => {
                    tracing::warn!("import of '{key}' failed: {e}");
                    report.failed.push(ImportFailure {
                        key: key.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        report
    }

    /// Materializes every stored document. Unlike `import_all` this aborts
    /// on the first failure: a partial export that silently drops entries
    /// is worse than a loud one.
    pub fn export_all(&self) -> Result<BTreeMap<String, EndpointDoc>> {
        let keys = self.store.fetch_all(&Statement::new(
            "SELECT key FROM endpoints ORDER BY key ASC",
            vec![],
        ))?;

        let mut docs = BTreeMap::new();
        for row in keys {
            let key = row.text(0)?.to_string();
            // A key listed a moment ago can only vanish to a concurrent
            // delete; treat it as gone rather than failing the export.
            if let Some(doc) = self.get_one(&key)? {
                docs.insert(key, doc);
            }
        }
        Ok(docs)
    }
}

fn delete_children(table: &ChildTable, key: &str) -> Statement {
    Statement::new(
        format!("DELETE FROM {} WHERE endpoint_key = ?1", table.name),
        vec![key.into()],
    )
}

fn insert_child(table: &ChildTable, key: &str, row: Vec<SqlValue>) -> Statement {
    let mut columns = vec!["endpoint_key"];
    columns.extend_from_slice(table.columns);
    if let Some(order) = table.order_column {
        columns.push(order);
    }

    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name,
        columns.join(", "),
        placeholders.join(", ")
    );

    let mut params = Vec::with_capacity(columns.len());
    params.push(key.into());
    params.extend(row);
    Statement::new(sql, params)
}

fn select_children(table: &ChildTable, key: &str) -> Statement {
    let order = match table.order_column {
        Some(column) => format!("{column} ASC, rowid ASC"),
        None => "rowid ASC".to_string(),
    };
    Statement::new(
        format!(
            "SELECT {} FROM {} WHERE endpoint_key = ?1 ORDER BY {}",
            table.columns.join(", "),
            table.name,
            order
        ),
        vec![key.into()],
    )
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::{HEADERS, VALIDATION_NOTES};

    #[test]
    fn test_insert_child_sql_includes_order_column() {
        let stmt = insert_child(&HEADERS, "k", vec!["X".into(), "1".into(), "".into(), 0i64.into()]);
        assert_eq!(
            stmt.sql,
            "INSERT INTO endpoint_headers (endpoint_key, name, value, description, header_order) VALUES (?1, ?2, ?3, ?4, ?5)"
        );
        assert_eq!(stmt.params.len(), 5);
        assert_eq!(stmt.params[0], "k".into());
    }

    #[test]
    fn test_select_children_orders_by_sequence_then_rowid() {
        let stmt = select_children(&VALIDATION_NOTES, "k");
        assert_eq!(
            stmt.sql,
            "SELECT note FROM endpoint_validation_notes WHERE endpoint_key = ?1 ORDER BY note_order ASC, rowid ASC"
        );

        let stmt = select_children(&PRODUCTS, "k");
        assert_eq!(
            stmt.sql,
            "SELECT product FROM endpoint_products WHERE endpoint_key = ?1 ORDER BY rowid ASC"
        );
    }

    #[test]
    fn test_parse_datetime_handles_both_formats() {
        let rfc = parse_datetime("2026-08-07T10:00:00+00:00");
        let sqlite = parse_datetime("2026-08-07 10:00:00");
        assert_eq!(rfc, sqlite);
    }
}
