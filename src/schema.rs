//! Declarative table schema - explicit column registration instead of
//! attribute scanning.
//!
//! A [`TableSpec`] is built by registering [`ColumnDef`]s in order; that
//! order is load-bearing: it fixes both the CREATE TABLE column order and
//! the positional binding order of every INSERT issued for the table.

use serde::{Deserialize, Serialize};

use crate::error::{FerryError, Result};
use crate::session::{Connection, Session};
use crate::stmt;
use crate::typemap::ValueType;
use crate::value::Value;

/// Anything that can stand in for a table name in a statement.
///
/// Implemented by plain strings and by [`TableSpec`], so builder calls accept
/// either without runtime attribute probing.
pub trait TableRef {
    fn table_name(&self) -> &str;
}

impl TableRef for str {
    fn table_name(&self) -> &str {
        self
    }
}

impl TableRef for String {
    fn table_name(&self) -> &str {
        self
    }
}

impl TableRef for TableSpec {
    fn table_name(&self) -> &str {
        &self.name
    }
}

impl<T: TableRef + ?Sized> TableRef for &T {
    fn table_name(&self) -> &str {
        (**self).table_name()
    }
}

/// A named, typed column description used for DDL generation and positional
/// value binding. Immutable once rendered into a CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub value_type: ValueType,
    /// Explicit length for bounded character types; defaults to 255.
    pub length: Option<u32>,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub auto_increment: bool,
    pub default: Option<Value>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            length: None,
            nullable: true,
            primary_key: false,
            unique: false,
            auto_increment: false,
            default: None,
        }
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Renders the column clause for CREATE TABLE.
    ///
    /// Flags follow `name TYPE [NOT NULL] [PRIMARY KEY] [AUTO_INCREMENT]
    /// [UNIQUE] [DEFAULT ...]`; absent flags leave no stray whitespace.
    pub(crate) fn render(&self) -> String {
        let mut clause = format!("{} {}", self.name, self.rendered_type());
        if !self.nullable {
            clause.push_str(" NOT NULL");
        }
        if self.primary_key {
            clause.push_str(" PRIMARY KEY");
        }
        if self.auto_increment {
            clause.push_str(" AUTO_INCREMENT");
        }
        if self.unique {
            clause.push_str(" UNIQUE");
        }
        if let Some(default) = &self.default {
            clause.push_str(" DEFAULT ");
            clause.push_str(&default.to_literal());
        }
        clause
    }

    fn rendered_type(&self) -> String {
        if self.value_type.takes_length() {
            format!("{}({})", self.value_type.sql_type(), self.length.unwrap_or(255))
        } else {
            self.value_type.sql_type().to_string()
        }
    }
}

/// An ordered table definition: name plus column sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSpec {
    name: String,
    columns: Vec<ColumnDef>,
}

impl TableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Registers a column, rejecting duplicate names.
    pub fn column(mut self, column: ColumnDef) -> Result<Self> {
        self.push_column(column)?;
        Ok(self)
    }

    pub fn push_column(&mut self, column: ColumnDef) -> Result<()> {
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(FerryError::DuplicateColumn { name: column.name });
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Creates this table and commits.
    pub fn create<C: Connection>(&self, session: &mut Session<C>) -> Result<()> {
        let sql = stmt::create_table(self.name.as_str(), &self.columns);
        session.execute(&sql, &[])?;
        session.commit()
    }

    /// Drops this table and commits.
    pub fn drop<C: Connection>(&self, session: &mut Session<C>) -> Result<()> {
        let sql = stmt::drop_table(self.name.as_str());
        session.execute(&sql, &[])?;
        session.commit()
    }

    /// Probes for the table with `SELECT 1 ... LIMIT 1`.
    ///
    /// A rejected statement means the table is absent; a dead connection
    /// propagates instead of being read as absence.
    pub fn exists<C: Connection>(&self, session: &mut Session<C>) -> Result<bool> {
        session.table_exists(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_clause_omits_absent_flags() {
        let col = ColumnDef::new("id", ValueType::Int);
        assert_eq!(col.render(), "id INTEGER");

        let col = ColumnDef::new("id", ValueType::Int)
            .not_null()
            .primary_key()
            .auto_increment();
        assert_eq!(col.render(), "id INTEGER NOT NULL PRIMARY KEY AUTO_INCREMENT");

        let col = ColumnDef::new("email", ValueType::Str).length(100).unique();
        assert_eq!(col.render(), "email VARCHAR(100) UNIQUE");
    }

    #[test]
    fn bounded_text_defaults_to_255() {
        let col = ColumnDef::new("name", ValueType::Str);
        assert_eq!(col.render(), "name VARCHAR(255)");
    }

    #[test]
    fn default_values_render_as_literals() {
        let col = ColumnDef::new("active", ValueType::Bool).default_value(Value::Boolean(true));
        assert_eq!(col.render(), "active BOOLEAN DEFAULT TRUE");
    }

    #[test]
    fn duplicate_columns_rejected() {
        let spec = TableSpec::new("employees")
            .column(ColumnDef::new("id", ValueType::Int))
            .unwrap();
        let err = spec.column(ColumnDef::new("id", ValueType::Str)).unwrap_err();
        assert!(matches!(err, FerryError::DuplicateColumn { ref name } if name == "id"));
    }

    #[test]
    fn column_order_is_registration_order() {
        let spec = TableSpec::new("t")
            .column(ColumnDef::new("b", ValueType::Int))
            .unwrap()
            .column(ColumnDef::new("a", ValueType::Int))
            .unwrap();
        assert_eq!(spec.column_names(), vec!["b", "a"]);
    }
}
