//! sqlferry - SQL statement building, schema inference and CSV-to-table
//! bulk transfer over a pluggable database connection.
//!
//! The crate is organized leaves-first:
//!
//! - [`stmt`]: pure SQL text assembly (DDL, DML, clause helpers)
//! - [`typemap`]: source value-type tags to destination SQL types
//! - [`schema`]: explicit column/table declarations
//! - [`dataset`] / [`infer`]: tabular sources and schema inference
//! - [`session`]: one connection, reentrant scoped transactions
//! - [`transfer`]: chunked, conflict-policy-aware bulk insertion
//! - [`query`]: fluent SELECT/INSERT/UPDATE/DELETE builders
//!
//! Connection acquisition is out of scope: bring any [`session::Connection`]
//! implementation and the rest of the crate drives it.

pub mod dataset;
pub mod error;
pub mod infer;
pub mod query;
pub mod schema;
pub mod session;
pub mod stmt;
pub mod transfer;
pub mod typemap;
pub mod value;

pub use dataset::{ColumnMeta, Dataset};
pub use error::{FerryError, Result};
pub use infer::infer_table_spec;
pub use query::{Delete, Insert, Select, Update};
pub use schema::{ColumnDef, TableRef, TableSpec};
pub use session::{Connection, Session};
pub use stmt::JoinType;
pub use transfer::{transfer, transfer_csv, IfExists, TransferOptions, TransferReport};
pub use typemap::ValueType;
pub use value::{Row, Value};
