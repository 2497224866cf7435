//! SQLite-backed persistence.

pub mod gap_store;

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use recess_domain::{GapError, Result};

pub use gap_store::SqliteGapStore;

/// Open a pooled SQLite database at `path`
///
/// Applies the connection pragmas every connection needs: WAL for
/// concurrent readers, a busy timeout so writers queue instead of
/// failing immediately.
pub fn open_pool(path: &Path) -> Result<Pool<SqliteConnectionManager>> {
    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.query_row("PRAGMA journal_mode=WAL", [], |_row| Ok(()))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(())
    });

    Pool::builder()
        .max_size(8)
        .build(manager)
        .map_err(|err| GapError::Storage(format!("open pool: {err}")))
}
