use thiserror::Error;

#[derive(Error, Debug)]
pub enum FerryError {
    #[error("Unsupported data type: {tag}")]
    UnsupportedType { tag: String },

    #[error("Unsupported join type: {name}")]
    UnsupportedJoinType { name: String },

    #[error("Column/value count mismatch: {columns} columns, {values} values")]
    ArityMismatch { columns: usize, values: usize },

    #[error("Chunk size cannot be zero")]
    InvalidChunkSize,

    #[error("Source dataset contains no rows")]
    EmptySource,

    #[error("Table '{table}' already exists")]
    TableAlreadyExists { table: String },

    #[error("Duplicate column '{name}' in table spec")]
    DuplicateColumn { name: String },

    #[error("Row width mismatch: expected {columns} values, got {values}")]
    RowWidthMismatch { columns: usize, values: usize },

    #[error("Connection failure: {message}")]
    Connection { message: String },

    #[error("Statement rejected: {message} (statement: {statement})")]
    Execution { statement: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FerryError>;
