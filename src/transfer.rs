//! Bulk-transfer engine - moves a tabular dataset into a destination table.
//!
//! Orchestrates existence probe, conflict policy, optional table creation
//! and chunked parameterized insertion, all under one session. Chunk commits
//! are final: a mid-transfer failure aborts remaining chunks but never rolls
//! back chunks already committed. That at-least-once, no-cross-chunk-
//! atomicity contract is deliberate.

use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::error::{FerryError, Result};
use crate::infer::infer_table_spec;
use crate::session::{Connection, Session};
use crate::stmt;

/// Conflict policy applied when the destination table already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IfExists {
    /// Abort with `TableAlreadyExists` before any DDL or DML.
    Fail,
    /// Drop and recreate the table from the inferred schema.
    Replace,
    /// Insert into the existing table, trusting its column order to match
    /// the source's.
    Append,
}

impl Default for IfExists {
    fn default() -> Self {
        IfExists::Fail
    }
}

/// Transfer tuning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferOptions {
    pub if_exists: IfExists,
    /// Rows per insert batch. `None` means one batch with all rows;
    /// `Some(0)` is rejected before any statement is issued.
    pub chunk_size: Option<usize>,
}

/// Outcome of a completed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReport {
    pub table: String,
    pub rows: usize,
    pub batches: usize,
    /// Whether the destination table was created by this transfer.
    pub created: bool,
}

/// Transfers all rows of `data` into `table` under the session's
/// transactional semantics.
///
/// Validation (`InvalidChunkSize`, `EmptySource`) happens before the
/// existence probe; the probe itself treats a rejected statement as absence
/// and propagates connectivity failures. Row order is preserved exactly as
/// read from the source, within and across chunks.
pub fn transfer<C: Connection>(
    session: &mut Session<C>,
    data: &Dataset,
    table: &str,
    options: &TransferOptions,
) -> Result<TransferReport> {
    if options.chunk_size == Some(0) {
        return Err(FerryError::InvalidChunkSize);
    }
    if data.is_empty() {
        return Err(FerryError::EmptySource);
    }

    let present = session.table_exists(table)?;
    let created = match (present, options.if_exists) {
        (true, IfExists::Fail) => {
            return Err(FerryError::TableAlreadyExists {
                table: table.to_string(),
            })
        }
        (true, IfExists::Replace) => {
            info!("Replacing existing table '{}'", table);
            session.execute(&stmt::drop_table(table), &[])?;
            session.commit()?;
            create_destination(session, data, table)?;
            true
        }
        (true, IfExists::Append) => false,
        (false, _) => {
            create_destination(session, data, table)?;
            true
        }
    };

    let columns = data.column_names();
    let template = stmt::insert_template(table, &columns);
    let chunk_size = options.chunk_size.unwrap_or(data.len());

    let mut batches = 0;
    for chunk in data.rows().chunks(chunk_size) {
        session.execute_many(&template, chunk)?;
        session.commit()?;
        batches += 1;
        debug!("Committed batch {} ({} rows)", batches, chunk.len());
    }

    info!(
        "Transferred {} rows into '{}' in {} batches",
        data.len(),
        table,
        batches
    );
    Ok(TransferReport {
        table: table.to_string(),
        rows: data.len(),
        batches,
        created,
    })
}

/// Loads a CSV source and transfers it in one call.
pub fn transfer_csv<C: Connection, R: Read>(
    session: &mut Session<C>,
    reader: R,
    table: &str,
    options: &TransferOptions,
) -> Result<TransferReport> {
    let data = Dataset::from_csv(reader)?;
    transfer(session, &data, table, options)
}

fn create_destination<C: Connection>(
    session: &mut Session<C>,
    data: &Dataset,
    table: &str,
) -> Result<()> {
    let spec = infer_table_spec(table, data)?;
    let sql = stmt::create_table(&spec, spec.columns());
    session.execute(&sql, &[])?;
    session.commit()
}
