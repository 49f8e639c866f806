//! FILENAME: grid-model/src/row.rs
//! PURPOSE: The flattened row model produced by the transformer.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::column::ColumnType;
use crate::value::CellValue;

/// Tree ancestry of a row. Most pivots nest only a few levels deep, so
/// paths are stored inline.
pub type RowPath = SmallVec<[String; 4]>;

/// One renderable row of the grid. Immutable once constructed; a row is
/// only ever replaced wholesale when a newer page covers its index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    /// Ancestor labels, root-prefixed (`["ROOT", "West", "Q1"]`).
    /// Empty for flat (non-tree) results.
    pub row_path: RowPath,

    /// One value per visible column, in schema order. For tree results
    /// the first entry is the row's own label.
    pub row_data: Vec<CellValue>,

    /// True when no deeper-nested row follows this one.
    pub is_leaf: bool,
}

impl PivotRow {
    /// Nesting depth excluding the synthetic root.
    pub fn depth(&self) -> usize {
        self.row_path.len().saturating_sub(1)
    }
}

/// One transformed page of rows plus the column layout observed in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowPage {
    pub rows: Vec<PivotRow>,
    pub is_tree: bool,
    pub column_paths: Vec<Vec<String>>,
    pub column_types: Vec<ColumnType>,
}
