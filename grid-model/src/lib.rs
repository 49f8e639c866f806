//! FILENAME: grid-model/src/lib.rs
//! Row and column model for the virtualized pivot-grid adapter.
//!
//! This crate is the pure data layer, free of any fetch or layout
//! concerns:
//! - `column`: column specs and the schema they form
//! - `value`: typed cell values and JSON coercion
//! - `row`: the flattened, tree-aware row model
//! - `transform`: flat pivot records -> row model
//! - `format`: the display-string contract

pub mod column;
pub mod format;
pub mod row;
pub mod transform;
pub mod value;

// Re-export commonly used types at the crate root
pub use column::{split_column_path, ColumnSpec, ColumnType, Schema, COLUMN_PATH_DELIMITER};
pub use format::{format_cell, format_decimal, format_integer, NULL_PLACEHOLDER};
pub use row::{PivotRow, RowPage, RowPath};
pub use transform::{transform_page, Record, ROOT_LABEL, ROW_PATH_KEY, TOTAL_LABEL};
pub use value::CellValue;
