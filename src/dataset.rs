//! Tabular source - ordered columns with typed tags plus row storage.
//!
//! The transfer engine consumes a [`Dataset`]: an already-materialized
//! tabular source with a fixed column order that is preserved through schema
//! inference and insertion. A CSV loader is provided for the common case;
//! any other producer can assemble a `Dataset` directly.

use std::io::Read;

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FerryError, Result};
use crate::typemap::ValueType;
use crate::value::{Row, Value};

/// Name and resolved value-type tag of one source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    pub value_type: ValueType,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

/// An ordered, materialized tabular dataset.
///
/// Row order is file order and is never reordered, deduplicated or merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<ColumnMeta>,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<ColumnMeta>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row; its width must match the column count.
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(FerryError::RowWidthMismatch {
                columns: self.columns.len(),
                values: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Non-null values observed in one column, for length inspection.
    pub fn non_null_values(&self, column: usize) -> impl Iterator<Item = &Value> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(column))
            .filter(|v| !v.is_null())
    }

    /// Loads a dataset from CSV with a header row.
    ///
    /// Cells coerce as: empty -> null, `true`/`false` (case-insensitive) ->
    /// boolean, then integer, then float, else text. Column tags unify over
    /// all observed cells (int with float widens to double; any mix with
    /// text becomes text) and cells are re-coerced to the unified tag so a
    /// column binds uniformly.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows: Vec<Row> = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let row: Row = (0..headers.len())
                .map(|idx| coerce_cell(record.get(idx).unwrap_or("")))
                .collect();
            rows.push(row);
        }

        let tags: Vec<ValueType> = (0..headers.len())
            .map(|idx| {
                rows.iter()
                    .filter_map(|row| ValueType::of(&row[idx]))
                    .fold(None, |acc: Option<ValueType>, vt| {
                        Some(match acc {
                            Some(prev) => prev.unify(vt),
                            None => vt,
                        })
                    })
                    .unwrap_or(ValueType::Str)
            })
            .collect();

        for row in &mut rows {
            for (idx, tag) in tags.iter().enumerate() {
                row[idx] = recoerce(std::mem::replace(&mut row[idx], Value::Null), *tag);
            }
        }

        let columns: Vec<ColumnMeta> = headers
            .into_iter()
            .zip(tags)
            .map(|(name, value_type)| ColumnMeta { name, value_type })
            .collect();

        debug!(
            "Loaded CSV source: {} columns, {} rows",
            columns.len(),
            rows.len()
        );
        Ok(Self { columns, rows })
    }
}

fn coerce_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Text(trimmed.to_string())
}

/// Re-coerces a cell to its column's unified tag.
fn recoerce(value: Value, tag: ValueType) -> Value {
    match (tag, value) {
        (ValueType::Double, Value::Integer(i)) => Value::Float(i as f64),
        (ValueType::Str, Value::Integer(i)) => Value::Text(i.to_string()),
        (ValueType::Str, Value::Float(f)) => Value::Text(f.to_string()),
        (ValueType::Str, Value::Boolean(b)) => Value::Text(b.to_string()),
        (_, v) => v,
    }
}
