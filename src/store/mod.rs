pub mod schema;
mod sqlite;
mod value;

pub use sqlite::SqliteStore;
pub use value::{Row, SqlValue, Statement};

use crate::error::Result;

/// StoreAdapter is the boundary between the synchronization engine and
/// whatever executes SQL. It knows nothing about endpoint documents; it
/// runs parameterized statements and returns rows.
pub trait StoreAdapter: Send + Sync {
    /// Idempotent schema bootstrap, run once at startup.
    fn initialize(&self) -> Result<()>;

    fn execute(&self, stmt: &Statement) -> Result<usize>;

    /// Applies statements as a single transaction where the backend
    /// supports one. This default applies them one at a time, so a failure
    /// part-way leaves earlier statements in place; backends with real
    /// transactions must override it.
    fn execute_all(&self, stmts: &[Statement]) -> Result<()> {
        for stmt in stmts {
            self.execute(stmt)?;
        }
        Ok(())
    }

    fn fetch_one(&self, stmt: &Statement) -> Result<Option<Row>>;

    fn fetch_all(&self, stmt: &Statement) -> Result<Vec<Row>>;

    fn close(&self) -> Result<()>;
}
