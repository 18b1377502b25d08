//! Column-wise view of a DataFrame.

use pii_model::{CellValue, ColumnMapping, FieldValue};
use polars::prelude::{AnyValue, DataFrame};

use crate::error::Result;
use crate::polars_utils::any_to_cell;

/// Convert a table into an ordered column-name to cell-list mapping.
///
/// Column order follows the frame; every value is a [`FieldValue::List`]
/// with one cell per row.
pub fn frame_to_column_mapping(df: &DataFrame) -> Result<ColumnMapping> {
    let mut mapping = ColumnMapping::new();
    for column in df.get_columns() {
        let mut cells: Vec<CellValue> = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            cells.push(any_to_cell(column.get(idx).unwrap_or(AnyValue::Null)));
        }
        mapping.insert(column.name().as_str(), FieldValue::List(cells))?;
    }
    Ok(mapping)
}
