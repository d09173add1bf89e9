//! Schema inference - derives an ordered table spec from a dataset.

use tracing::debug;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::schema::{ColumnDef, TableSpec};
use crate::typemap::ValueType;
use crate::value::Value;

/// Maximum character length a bounded text column may hold before it is
/// widened to unbounded text.
const BOUNDED_TEXT_LIMIT: usize = 255;

/// Infers a [`TableSpec`] from a dataset, in source column order.
///
/// Bounded text columns whose observed values exceed 255 characters are
/// re-classified as unbounded text; the re-classification only ever widens.
/// The resulting column order must be reused verbatim for the INSERT column
/// list, since insertion binds positionally.
pub fn infer_table_spec(table: &str, data: &Dataset) -> Result<TableSpec> {
    let mut spec = TableSpec::new(table);
    for (idx, column) in data.columns().iter().enumerate() {
        let mut value_type = column.value_type;
        if value_type.takes_length() && exceeds_bounded_length(data, idx) {
            debug!(
                "Widening column '{}' to TEXT: observed value over {} chars",
                column.name, BOUNDED_TEXT_LIMIT
            );
            value_type = ValueType::Text;
        }
        let mut def = ColumnDef::new(&column.name, value_type);
        if value_type.takes_length() {
            def = def.length(BOUNDED_TEXT_LIMIT as u32);
        }
        spec.push_column(def)?;
    }
    Ok(spec)
}

fn exceeds_bounded_length(data: &Dataset, column: usize) -> bool {
    data.non_null_values(column).any(|v| match v {
        Value::Text(s) => s.chars().count() > BOUNDED_TEXT_LIMIT,
        _ => false,
    })
}
