//! Session and transaction management over a pluggable connection.
//!
//! The [`Connection`] trait is the driver boundary: anything that can
//! execute parameterized statements, fetch results and toggle autocommit can
//! back a [`Session`]. Connection acquisition (DSN parsing, credentials,
//! encoding negotiation) happens outside this crate.

use tracing::{debug, warn};

use crate::error::{FerryError, Result};
use crate::value::{Row, Value};

/// Driver-side connection surface required by the session.
///
/// Implementations report a dead link as [`FerryError::Connection`] and a
/// rejected statement (including constraint violations) as
/// [`FerryError::Execution`]; the distinction matters for the existence
/// probe, which must not read a connectivity failure as table absence.
pub trait Connection {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<()>;

    /// Executes one statement once per parameter row, as a single batch.
    fn execute_many(&mut self, sql: &str, batches: &[Row]) -> Result<()>;

    /// Pulls one row from the most recent result.
    fn fetch_one(&mut self) -> Result<Option<Row>>;

    /// Pulls all remaining rows from the most recent result.
    fn fetch_all(&mut self) -> Result<Vec<Row>>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;

    fn set_autocommit(&mut self, enabled: bool) -> Result<()>;
}

/// Owns exactly one connection and a transaction-nesting counter.
///
/// The scoped [`transaction`](Session::transaction) form is reentrant: only
/// the outermost scope commits or rolls back the underlying connection;
/// inner scopes just move the counter. Direct [`commit`](Session::commit) /
/// [`rollback`](Session::rollback) always hit the connection regardless of
/// depth. Dropping the session releases the connection.
pub struct Session<C: Connection> {
    conn: C,
    tx_depth: u32,
}

impl<C: Connection> Session<C> {
    pub fn new(conn: C) -> Self {
        Self { conn, tx_depth: 0 }
    }

    pub fn execute(&mut self, sql: &str, params: &[Value]) -> Result<()> {
        debug!("Executing: {}", sql);
        self.conn.execute(sql, params)
    }

    pub fn execute_many(&mut self, sql: &str, batches: &[Row]) -> Result<()> {
        debug!("Executing batch of {}: {}", batches.len(), sql);
        self.conn.execute_many(sql, batches)
    }

    pub fn fetch_one(&mut self) -> Result<Option<Row>> {
        self.conn.fetch_one()
    }

    pub fn fetch_all(&mut self) -> Result<Vec<Row>> {
        self.conn.fetch_all()
    }

    /// Commits on the real connection, regardless of nesting depth.
    pub fn commit(&mut self) -> Result<()> {
        self.conn.commit()
    }

    /// Rolls back on the real connection, regardless of nesting depth.
    pub fn rollback(&mut self) -> Result<()> {
        self.conn.rollback()
    }

    pub fn transaction_depth(&self) -> u32 {
        self.tx_depth
    }

    /// Runs `f` inside a scoped transaction.
    ///
    /// The outermost entry disables autocommit. On success the outermost
    /// scope commits; on failure it rolls back before the error propagates.
    /// Depth is decremented and autocommit restored on every exit path.
    pub fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.tx_depth += 1;
        if self.tx_depth == 1 {
            if let Err(e) = self.conn.set_autocommit(false) {
                self.tx_depth -= 1;
                return Err(e);
            }
        }

        let outcome = match f(self) {
            Ok(value) => {
                if self.tx_depth == 1 {
                    self.conn.commit().map(|_| value)
                } else {
                    Ok(value)
                }
            }
            Err(e) => {
                if self.tx_depth == 1 {
                    if let Err(rb) = self.conn.rollback() {
                        warn!("Rollback failed after error: {}", rb);
                    }
                }
                Err(e)
            }
        };

        self.tx_depth -= 1;
        if self.tx_depth == 0 {
            if let Err(e) = self.conn.set_autocommit(true) {
                warn!("Failed to restore autocommit: {}", e);
            }
        }
        outcome
    }

    /// Probes for a table with `SELECT 1 ... LIMIT 1`.
    ///
    /// A rejected statement means the table is absent. A connectivity
    /// failure propagates; it is never swallowed as absence.
    pub fn table_exists(&mut self, table: &str) -> Result<bool> {
        let probe = format!("SELECT 1 FROM {} LIMIT 1", table);
        match self.execute(&probe, &[]) {
            Ok(()) => Ok(true),
            Err(FerryError::Execution { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Consumes the session, returning the connection.
    pub fn into_inner(self) -> C {
        self.conn
    }
}
