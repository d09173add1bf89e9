//! End-to-end transfer scenarios against a recording mock connection.

use sqlferry::{
    transfer, transfer_csv, ColumnMeta, Connection, Dataset, FerryError, IfExists, Result, Row,
    Session, TransferOptions, Value, ValueType,
};

/// Records every statement the engine issues.
#[derive(Default)]
struct RecordingConn {
    table_present: bool,
    connection_dead: bool,
    fail_batches_after: Option<usize>,
    statements: Vec<String>,
    batches: Vec<(String, Vec<Row>)>,
    commits: usize,
}

impl RecordingConn {
    fn with_table_present() -> Self {
        Self {
            table_present: true,
            ..Default::default()
        }
    }

    fn ddl_statements(&self) -> Vec<&String> {
        self.statements
            .iter()
            .filter(|s| s.starts_with("CREATE TABLE") || s.starts_with("DROP TABLE"))
            .collect()
    }
}

impl Connection for RecordingConn {
    fn execute(&mut self, sql: &str, _params: &[Value]) -> Result<()> {
        if self.connection_dead {
            return Err(FerryError::Connection {
                message: "connection reset".into(),
            });
        }
        if sql.starts_with("SELECT 1 FROM") {
            if !self.table_present {
                return Err(FerryError::Execution {
                    statement: sql.to_string(),
                    message: "table not found".into(),
                });
            }
            self.statements.push(sql.to_string());
            return Ok(());
        }
        if sql.starts_with("DROP TABLE") {
            self.table_present = false;
        }
        if sql.starts_with("CREATE TABLE") {
            self.table_present = true;
        }
        self.statements.push(sql.to_string());
        Ok(())
    }

    fn execute_many(&mut self, sql: &str, batch: &[Row]) -> Result<()> {
        if let Some(limit) = self.fail_batches_after {
            if self.batches.len() >= limit {
                return Err(FerryError::Execution {
                    statement: sql.to_string(),
                    message: "constraint violation".into(),
                });
            }
        }
        self.batches.push((sql.to_string(), batch.to_vec()));
        Ok(())
    }

    fn fetch_one(&mut self) -> Result<Option<Row>> {
        Ok(None)
    }

    fn fetch_all(&mut self) -> Result<Vec<Row>> {
        Ok(Vec::new())
    }

    fn commit(&mut self) -> Result<()> {
        self.commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        Ok(())
    }

    fn set_autocommit(&mut self, _enabled: bool) -> Result<()> {
        Ok(())
    }
}

fn sample_source() -> Dataset {
    let mut ds = Dataset::new(vec![
        ColumnMeta::new("id", ValueType::Int),
        ColumnMeta::new("name", ValueType::Str),
        ColumnMeta::new("score", ValueType::Float),
    ]);
    for (id, name, score) in [(1, "Alice", 4.5), (2, "Bob", 3.0), (3, "Cara", 5.0)] {
        ds.push_row(vec![
            Value::Integer(id),
            Value::Text(name.into()),
            Value::Float(score),
        ])
        .unwrap();
    }
    ds
}

#[test]
fn creates_table_and_inserts_in_two_batches() {
    let mut session = Session::new(RecordingConn::default());
    let options = TransferOptions {
        if_exists: IfExists::Fail,
        chunk_size: Some(2),
    };

    let report = transfer(&mut session, &sample_source(), "people", &options).unwrap();
    assert_eq!(report.rows, 3);
    assert_eq!(report.batches, 2);
    assert!(report.created);

    let conn = session.into_inner();
    assert_eq!(
        conn.statements,
        vec![
            "CREATE TABLE IF NOT EXISTS people \
             (id INTEGER, name VARCHAR(255), score FLOAT)"
                .to_string()
        ]
    );

    assert_eq!(conn.batches.len(), 2);
    let template = "INSERT INTO people (id, name, score) VALUES (?, ?, ?)";
    assert_eq!(conn.batches[0].0, template);
    assert_eq!(conn.batches[1].0, template);
    assert_eq!(conn.batches[0].1.len(), 2);
    assert_eq!(conn.batches[1].1.len(), 1);

    // Row order preserved across batches.
    assert_eq!(conn.batches[0].1[0][0], Value::Integer(1));
    assert_eq!(conn.batches[0].1[1][0], Value::Integer(2));
    assert_eq!(conn.batches[1].1[0][0], Value::Integer(3));

    // CREATE commit plus one commit per batch.
    assert_eq!(conn.commits, 3);
}

#[test]
fn fail_policy_on_existing_table_issues_nothing() {
    let mut session = Session::new(RecordingConn::with_table_present());
    let options = TransferOptions {
        if_exists: IfExists::Fail,
        chunk_size: Some(2),
    };

    let err = transfer(&mut session, &sample_source(), "people", &options).unwrap_err();
    assert!(matches!(
        err,
        FerryError::TableAlreadyExists { ref table } if table == "people"
    ));

    let conn = session.into_inner();
    assert!(conn.ddl_statements().is_empty());
    assert!(conn.batches.is_empty());
    assert_eq!(conn.commits, 0);
}

#[test]
fn replace_policy_drops_then_creates_exactly_once() {
    let mut session = Session::new(RecordingConn::with_table_present());
    let options = TransferOptions {
        if_exists: IfExists::Replace,
        chunk_size: None,
    };

    let report = transfer(&mut session, &sample_source(), "people", &options).unwrap();
    assert!(report.created);
    assert_eq!(report.batches, 1);

    let conn = session.into_inner();
    let ddl = conn.ddl_statements();
    assert_eq!(ddl.len(), 2);
    assert!(ddl[0].starts_with("DROP TABLE people"));
    assert!(ddl[1].starts_with("CREATE TABLE IF NOT EXISTS people"));
}

#[test]
fn append_policy_issues_no_ddl() {
    let mut session = Session::new(RecordingConn::with_table_present());
    let options = TransferOptions {
        if_exists: IfExists::Append,
        chunk_size: None,
    };

    let report = transfer(&mut session, &sample_source(), "people", &options).unwrap();
    assert!(!report.created);

    let conn = session.into_inner();
    assert!(conn.ddl_statements().is_empty());
    assert_eq!(conn.batches.len(), 1);
    assert_eq!(conn.batches[0].1.len(), 3);
}

#[test]
fn zero_chunk_size_rejected_before_any_probe() {
    let mut session = Session::new(RecordingConn::default());
    let options = TransferOptions {
        if_exists: IfExists::Fail,
        chunk_size: Some(0),
    };

    let err = transfer(&mut session, &sample_source(), "people", &options).unwrap_err();
    assert!(matches!(err, FerryError::InvalidChunkSize));

    let conn = session.into_inner();
    assert!(conn.statements.is_empty());
    assert!(conn.batches.is_empty());
}

#[test]
fn empty_source_rejected_before_any_mutation() {
    let empty = Dataset::new(vec![ColumnMeta::new("id", ValueType::Int)]);
    let mut session = Session::new(RecordingConn::default());

    let err = transfer(&mut session, &empty, "people", &TransferOptions::default()).unwrap_err();
    assert!(matches!(err, FerryError::EmptySource));
    assert!(session.into_inner().statements.is_empty());
}

#[test]
fn dead_connection_during_probe_propagates() {
    let mut session = Session::new(RecordingConn {
        connection_dead: true,
        ..Default::default()
    });

    let err = transfer(&mut session, &sample_source(), "people", &TransferOptions::default())
        .unwrap_err();
    assert!(matches!(err, FerryError::Connection { .. }));
}

#[test]
fn mid_transfer_failure_keeps_committed_chunks() {
    let mut session = Session::new(RecordingConn {
        fail_batches_after: Some(1),
        ..Default::default()
    });
    let options = TransferOptions {
        if_exists: IfExists::Fail,
        chunk_size: Some(1),
    };

    let err = transfer(&mut session, &sample_source(), "people", &options).unwrap_err();
    assert!(matches!(err, FerryError::Execution { .. }));

    let conn = session.into_inner();
    // First chunk committed and final; no rollback of completed work.
    assert_eq!(conn.batches.len(), 1);
    assert_eq!(conn.commits, 2); // CREATE commit + first chunk commit
}

#[test]
fn csv_source_end_to_end() {
    let csv = "id,name,notes\n1,Alice,hello\n2,Bob,\n";
    let mut session = Session::new(RecordingConn::default());

    let report =
        transfer_csv(&mut session, csv.as_bytes(), "notes", &TransferOptions::default()).unwrap();
    assert_eq!(report.rows, 2);
    assert_eq!(report.batches, 1);

    let conn = session.into_inner();
    assert_eq!(
        conn.statements,
        vec![
            "CREATE TABLE IF NOT EXISTS notes \
             (id INTEGER, name VARCHAR(255), notes VARCHAR(255))"
                .to_string()
        ]
    );
    assert_eq!(conn.batches[0].1[1][2], Value::Null);
}
