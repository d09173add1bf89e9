//! Statement builder - pure SQL text assembly, no I/O.
//!
//! Identifiers, keywords and caller-supplied raw condition strings are
//! inlined; values are bound through placeholders on the parameterized path
//! ([`insert_template`], [`update`]). The literal forms ([`insert`],
//! [`update_literal`]) exist for compatibility with hand-built statements and
//! use the unescaped quoting rule of [`Value::to_literal`] - treat them as
//! unsafe for untrusted input.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{FerryError, Result};
use crate::schema::{ColumnDef, TableRef};
use crate::typemap::ValueType;
use crate::value::Value;

/// Supported join variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Natural,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Natural => "NATURAL",
        };
        f.write_str(name)
    }
}

impl FromStr for JoinType {
    type Err = FerryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "INNER" => Ok(JoinType::Inner),
            "LEFT" => Ok(JoinType::Left),
            "RIGHT" => Ok(JoinType::Right),
            "NATURAL" => Ok(JoinType::Natural),
            _ => Err(FerryError::UnsupportedJoinType {
                name: s.to_string(),
            }),
        }
    }
}

/// `CREATE TABLE IF NOT EXISTS name (col clauses)`.
///
/// Column clauses render in slice order; that order must match the INSERT
/// column order used later for the same table.
pub fn create_table<T: TableRef + ?Sized>(table: &T, columns: &[ColumnDef]) -> String {
    let clauses = columns.iter().map(|c| c.render()).join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        table.table_name(),
        clauses
    )
}

pub fn drop_table<T: TableRef + ?Sized>(table: &T) -> String {
    format!("DROP TABLE {}", table.table_name())
}

pub fn rename_table<T: TableRef + ?Sized>(table: &T, new_name: &str) -> String {
    format!("ALTER TABLE {} RENAME TO {}", table.table_name(), new_name)
}

/// `ALTER TABLE ... ADD COLUMN`; the type tag must resolve in the type mapper.
pub fn add_column<T: TableRef + ?Sized>(table: &T, column: &str, type_tag: &str) -> Result<String> {
    let vt = ValueType::parse(type_tag)?;
    Ok(format!(
        "ALTER TABLE {} ADD COLUMN {} {}",
        table.table_name(),
        column,
        vt.sql_type()
    ))
}

pub fn drop_column<T: TableRef + ?Sized>(table: &T, column: &str) -> String {
    format!("ALTER TABLE {} DROP COLUMN {}", table.table_name(), column)
}

pub fn modify_column<T: TableRef + ?Sized>(
    table: &T,
    column: &str,
    type_tag: &str,
) -> Result<String> {
    let vt = ValueType::parse(type_tag)?;
    Ok(format!(
        "ALTER TABLE {} MODIFY COLUMN {} {}",
        table.table_name(),
        column,
        vt.sql_type()
    ))
}

pub fn rename_column<T: TableRef + ?Sized>(
    table: &T,
    old_name: &str,
    new_name: &str,
    type_tag: &str,
) -> Result<String> {
    let vt = ValueType::parse(type_tag)?;
    Ok(format!(
        "ALTER TABLE {} CHANGE COLUMN {} {} {}",
        table.table_name(),
        old_name,
        new_name,
        vt.sql_type()
    ))
}

pub fn add_primary_key<T: TableRef + ?Sized>(table: &T, columns: &[&str]) -> String {
    format!(
        "ALTER TABLE {} ADD PRIMARY KEY ({})",
        table.table_name(),
        columns.join(", ")
    )
}

pub fn add_foreign_key<T: TableRef + ?Sized>(
    table: &T,
    column: &str,
    ref_table: &str,
    ref_column: &str,
) -> String {
    format!(
        "ALTER TABLE {} ADD FOREIGN KEY ({}) REFERENCES {} ({})",
        table.table_name(),
        column,
        ref_table,
        ref_column
    )
}

pub fn create_database(name: &str) -> String {
    format!("CREATE DATABASE {}", name)
}

pub fn drop_database(name: &str) -> String {
    format!("DROP DATABASE {}", name)
}

pub fn use_database(name: &str) -> String {
    format!("USE {}", name)
}

/// Builds a WHERE clause from an ordered condition list.
///
/// An empty list (or all-empty strings) yields an empty string so callers
/// never emit a dangling `WHERE`; multiple conditions join with ` AND ` in
/// input order.
pub fn where_clause(conditions: &[&str]) -> String {
    let joined = conditions
        .iter()
        .filter(|c| !c.is_empty())
        .join(" AND ");
    if joined.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", joined)
    }
}

pub fn select(columns: &[&str], tables: &[&str], conditions: &[&str]) -> String {
    format!(
        "SELECT {} FROM {} {}",
        columns.join(", "),
        tables.join(", "),
        where_clause(conditions)
    )
    .trim_end()
    .to_string()
}

/// Literal-form INSERT. Arity is checked by count, not byte length.
pub fn insert<T: TableRef + ?Sized>(
    table: &T,
    columns: &[&str],
    values: &[Value],
) -> Result<String> {
    check_arity(columns.len(), values.len())?;
    let rendered = values.iter().map(Value::to_literal).join(", ");
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.table_name(),
        columns.join(", "),
        rendered
    ))
}

/// Parameterized INSERT template with one placeholder per column, for reuse
/// across many rows.
pub fn insert_template<T: TableRef + ?Sized>(table: &T, columns: &[&str]) -> String {
    let placeholders = columns.iter().map(|_| "?").join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.table_name(),
        columns.join(", "),
        placeholders
    )
}

/// Parameterized UPDATE: `col = ?` pairs plus the ordered parameter list.
pub fn update<T: TableRef + ?Sized>(
    table: &T,
    columns: &[&str],
    values: &[Value],
    conditions: &[&str],
) -> Result<(String, Vec<Value>)> {
    check_arity(columns.len(), values.len())?;
    let set_clause = columns.iter().map(|c| format!("{} = ?", c)).join(", ");
    let sql = format!(
        "UPDATE {} SET {} {}",
        table.table_name(),
        set_clause,
        where_clause(conditions)
    )
    .trim_end()
    .to_string();
    Ok((sql, values.to_vec()))
}

/// Literal-form UPDATE; same quoting caveats as [`insert`].
pub fn update_literal<T: TableRef + ?Sized>(
    table: &T,
    columns: &[&str],
    values: &[Value],
    conditions: &[&str],
) -> Result<String> {
    check_arity(columns.len(), values.len())?;
    let set_clause = columns
        .iter()
        .zip(values)
        .map(|(c, v)| format!("{} = {}", c, v.to_literal()))
        .join(", ");
    Ok(format!(
        "UPDATE {} SET {} {}",
        table.table_name(),
        set_clause,
        where_clause(conditions)
    )
    .trim_end()
    .to_string())
}

pub fn delete<T: TableRef + ?Sized>(table: &T, conditions: &[&str]) -> String {
    format!(
        "DELETE FROM {} {}",
        table.table_name(),
        where_clause(conditions)
    )
    .trim_end()
    .to_string()
}

pub fn like(pattern: &str) -> String {
    format!("LIKE '{}'", pattern)
}

pub fn union(query1: &str, query2: &str) -> String {
    format!("{} UNION {}", query1, query2)
}

pub fn order_by(column: &str, ascending: bool) -> String {
    let direction = if ascending { "ASC" } else { "DESC" };
    format!("ORDER BY {} {}", column, direction)
}

pub fn group_by(columns: &[&str]) -> String {
    format!("GROUP BY {}", columns.join(", "))
}

/// Join expression for use as a SELECT table argument.
pub fn join<A: TableRef + ?Sized, B: TableRef + ?Sized>(
    table1: &A,
    table2: &B,
    join_type: JoinType,
    conditions: &[&str],
) -> String {
    let on_clause = {
        let joined = conditions
            .iter()
            .filter(|c| !c.is_empty())
            .join(" AND ");
        if joined.is_empty() {
            String::new()
        } else {
            format!("ON {}", joined)
        }
    };
    format!(
        "{} {} JOIN {} {}",
        table1.table_name(),
        join_type,
        table2.table_name(),
        on_clause
    )
    .trim_end()
    .to_string()
}

fn check_arity(columns: usize, values: usize) -> Result<()> {
    if columns != values {
        return Err(FerryError::ArityMismatch { columns, values });
    }
    Ok(())
}
