//! Fluent query builders over the statement-builder primitives.
//!
//! [`Select`] produces plain SQL text; [`Insert`] and [`Update`] carry their
//! values out as ordered parameter lists so nothing user-supplied is inlined.

use itertools::Itertools;

use crate::error::Result;
use crate::schema::TableRef;
use crate::session::{Connection, Session};
use crate::stmt::JoinType;
use crate::value::Value;

/// Fluent SELECT builder.
#[derive(Debug, Clone)]
pub struct Select {
    columns: Vec<String>,
    from: String,
    joins: Vec<(JoinType, String, String)>,
    wheres: Vec<String>,
    group_by: Vec<String>,
    having: Vec<String>,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Select {
    /// Starts a query against `table`; columns default to `*`.
    pub fn new<T: TableRef + ?Sized>(table: &T) -> Self {
        Self {
            columns: Vec::new(),
            from: table.table_name().to_string(),
            joins: Vec::new(),
            wheres: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn column(mut self, column: &str) -> Self {
        self.columns.push(column.to_string());
        self
    }

    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    pub fn join<T: TableRef + ?Sized>(
        mut self,
        table: &T,
        condition: &str,
        join_type: JoinType,
    ) -> Self {
        self.joins.push((
            join_type,
            table.table_name().to_string(),
            condition.to_string(),
        ));
        self
    }

    pub fn and_where(mut self, condition: &str) -> Self {
        self.wheres.push(condition.to_string());
        self
    }

    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by.push(column.to_string());
        self
    }

    pub fn and_having(mut self, condition: &str) -> Self {
        self.having.push(condition.to_string());
        self
    }

    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by.push(column.to_string());
        self
    }

    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(count);
        self
    }

    pub fn offset(mut self, count: u64) -> Self {
        self.offset = Some(count);
        self
    }

    pub fn build(&self) -> String {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.iter().join(", ")
        };
        let mut sql = format!("SELECT {} FROM {}", columns, self.from);

        for (join_type, table, condition) in &self.joins {
            sql.push_str(&format!(" {} JOIN {} ON {}", join_type, table, condition));
        }
        if !self.wheres.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.wheres.iter().join(" AND "));
        }
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.iter().join(", "));
        }
        if !self.having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.having.iter().join(" AND "));
        }
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.iter().join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }
        sql
    }

    pub fn execute<C: Connection>(&self, session: &mut Session<C>) -> Result<()> {
        session.execute(&self.build(), &[])
    }
}

/// Fluent parameterized INSERT builder.
#[derive(Debug, Clone)]
pub struct Insert {
    table: String,
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Insert {
    pub fn new<T: TableRef + ?Sized>(table: &T) -> Self {
        Self {
            table: table.table_name().to_string(),
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn value(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.columns.push(column.to_string());
        self.values.push(value.into());
        self
    }

    pub fn build(&self) -> (String, Vec<Value>) {
        let placeholders = self.columns.iter().map(|_| "?").join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.columns.iter().join(", "),
            placeholders
        );
        (sql, self.values.clone())
    }

    pub fn execute<C: Connection>(&self, session: &mut Session<C>) -> Result<()> {
        let (sql, params) = self.build();
        session.execute(&sql, &params)
    }
}

/// Fluent parameterized UPDATE builder.
#[derive(Debug, Clone)]
pub struct Update {
    table: String,
    sets: Vec<(String, Value)>,
    wheres: Vec<String>,
}

impl Update {
    pub fn new<T: TableRef + ?Sized>(table: &T) -> Self {
        Self {
            table: table.table_name().to_string(),
            sets: Vec::new(),
            wheres: Vec::new(),
        }
    }

    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.sets.push((column.to_string(), value.into()));
        self
    }

    pub fn and_where(mut self, condition: &str) -> Self {
        self.wheres.push(condition.to_string());
        self
    }

    pub fn build(&self) -> (String, Vec<Value>) {
        let set_clause = self.sets.iter().map(|(c, _)| format!("{} = ?", c)).join(", ");
        let mut sql = format!("UPDATE {} SET {}", self.table, set_clause);
        if !self.wheres.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.wheres.iter().join(" AND "));
        }
        let params = self.sets.iter().map(|(_, v)| v.clone()).collect();
        (sql, params)
    }

    pub fn execute<C: Connection>(&self, session: &mut Session<C>) -> Result<()> {
        let (sql, params) = self.build();
        session.execute(&sql, &params)
    }
}

/// Fluent DELETE builder.
#[derive(Debug, Clone)]
pub struct Delete {
    table: String,
    wheres: Vec<String>,
}

impl Delete {
    pub fn new<T: TableRef + ?Sized>(table: &T) -> Self {
        Self {
            table: table.table_name().to_string(),
            wheres: Vec::new(),
        }
    }

    pub fn and_where(mut self, condition: &str) -> Self {
        self.wheres.push(condition.to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut sql = format!("DELETE FROM {}", self.table);
        if !self.wheres.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.wheres.iter().join(" AND "));
        }
        sql
    }

    pub fn execute<C: Connection>(&self, session: &mut Session<C>) -> Result<()> {
        session.execute(&self.build(), &[])
    }
}
