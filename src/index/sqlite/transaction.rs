//! RAII transaction over the cache connection.

use crate::index::CacheResult;
use rusqlite::Connection;

/// A write transaction that rolls back on drop unless committed.
///
/// All row writers for a sync pass hang off this type so that a pass
/// commits as a whole or not at all.
pub struct Transaction<'a> {
    conn: &'a Connection,
    finished: bool,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            finished: false,
        }
    }

    pub(crate) fn conn(&self) -> &Connection {
        self.conn
    }

    /// Commits every write made through this transaction.
    pub fn commit(mut self) -> CacheResult<()> {
        self.conn.execute_batch("COMMIT")?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            // Errors cannot surface from drop
            let _ = self.conn.execute_batch("ROLLBACK");
        }
    }
}
