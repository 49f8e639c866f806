//! FILENAME: grid-model/src/column.rs
//! PURPOSE: Column specifications and the schema they form.
//! CONTEXT: A schema is an ordered list of column specs built once per
//! load from the data source's name -> type mapping. Column indices are
//! stable within one schema version and act as the join key between
//! rows and columns. Schemas compare by full structural equality; that
//! comparison is what decides between a cheap data refresh and a full
//! rebuild.

use serde::{Deserialize, Serialize};

/// Delimiter the data source uses when it joins a multi-level column
/// path into a single record key (e.g. `"West, Sales"`).
pub const COLUMN_PATH_DELIMITER: char = ',';

// ============================================================================
// COLUMN TYPES
// ============================================================================

/// The type vocabulary exposed by the data source schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    String,
    Boolean,
    Date,
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::String
    }
}

// ============================================================================
// COLUMN SPEC
// ============================================================================

/// Describes one column of the loaded result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Position within the schema (0-based). Stable for the lifetime of
    /// one schema version.
    pub index: usize,

    /// The header path before joining (one segment per pivot level).
    pub header_path: Vec<String>,

    /// The joined display label.
    pub header_label: String,

    /// Declared value type.
    pub ty: ColumnType,
}

impl ColumnSpec {
    /// Builds a spec from the raw record key the source uses for this
    /// column. The key is split on the path delimiter with segments
    /// trimmed; the label keeps the source's own spelling.
    pub fn from_key(index: usize, key: &str, ty: ColumnType) -> Self {
        let header_path = split_column_path(key);
        ColumnSpec {
            index,
            header_label: key.to_string(),
            header_path,
            ty,
        }
    }

    /// Last segment of the header path. Used as the fallback key when
    /// restoring memoized widths for columns that moved between pivots.
    pub fn last_segment(&self) -> &str {
        self.header_path
            .last()
            .map(String::as_str)
            .unwrap_or(&self.header_label)
    }
}

/// Splits a joined column key into trimmed path segments.
pub fn split_column_path(key: &str) -> Vec<String> {
    key.split(COLUMN_PATH_DELIMITER)
        .map(|s| s.trim().to_string())
        .collect()
}

// ============================================================================
// SCHEMA
// ============================================================================

/// An ordered sequence of column specs. Equality is full structural
/// equality (name, header path, type, order), which is exactly the
/// predicate the reconciler needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnSpec>,
}

impl Schema {
    /// Builds a schema from the source's ordered name -> type pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, ColumnType)>) -> Self {
        let columns = pairs
            .into_iter()
            .enumerate()
            .map(|(index, (name, ty))| ColumnSpec::from_key(index, &name, ty))
            .collect();
        Schema { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ColumnSpec> {
        self.columns.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter()
    }

    /// Looks up the declared type for a raw record key.
    pub fn type_of(&self, key: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.header_label == key)
            .map(|c| c.ty)
    }
}
