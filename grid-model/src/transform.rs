//! FILENAME: grid-model/src/transform.rs
//! PURPOSE: Converts one page of flat pivot-result records into the
//! tree-aware row model.
//!
//! The data source emits each row as a JSON object mapping joined
//! column-path keys to scalars, with an optional reserved key carrying
//! the row's tree path. This module flattens that into `PivotRow`s:
//!
//! 1. Tree detection from the first record only.
//! 2. Column paths derived from the first record's keys, in key order.
//! 3. Row paths root-prefixed; the aggregate root row is labeled
//!    "TOTAL" when its own path is empty.
//! 4. A row is a leaf iff the next row does not nest deeper.

use serde_json::Value;

use crate::column::{split_column_path, ColumnType, Schema};
use crate::row::{PivotRow, RowPage, RowPath};
use crate::value::CellValue;

/// Reserved record key carrying the row's tree path.
pub const ROW_PATH_KEY: &str = "__ROW_PATH__";

/// Synthetic label prefixed to every tree path.
pub const ROOT_LABEL: &str = "ROOT";

/// Label given to the aggregate root row (empty path at index 0).
pub const TOTAL_LABEL: &str = "TOTAL";

/// A raw record as returned by the data source.
pub type Record = serde_json::Map<String, Value>;

/// Transforms one fetched page of records. `schema` supplies declared
/// column types; keys missing from it coerce as strings.
pub fn transform_page(records: &[Record], schema: &Schema) -> RowPage {
    let first = match records.first() {
        Some(first) => first,
        None => return RowPage::default(),
    };

    let is_tree = first.contains_key(ROW_PATH_KEY);

    // Column layout comes from the first record, in original key order.
    let column_keys: Vec<&String> = first.keys().filter(|k| *k != ROW_PATH_KEY).collect();
    let column_paths: Vec<Vec<String>> = column_keys
        .iter()
        .map(|k| split_column_path(k.as_str()))
        .collect();
    let column_types: Vec<ColumnType> = column_keys
        .iter()
        .map(|k| schema.type_of(k.as_str()).unwrap_or_default())
        .collect();

    let raw_paths: Vec<Vec<String>> = records.iter().map(raw_tree_path).collect();

    let mut rows = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let raw = &raw_paths[i];

        let (row_path, label) = if is_tree {
            let mut path = RowPath::new();
            path.push(ROOT_LABEL.to_string());
            path.extend(raw.iter().cloned());
            let label = match raw.last() {
                Some(last) => last.clone(),
                None if i == 0 => TOTAL_LABEL.to_string(),
                None => String::new(),
            };
            (path, label)
        } else {
            (RowPath::new(), String::new())
        };

        // Leaf iff depth does not increase going to the next row.
        let is_leaf = match raw_paths.get(i + 1) {
            Some(next) => raw.len() >= next.len(),
            None => true,
        };

        let mut row_data = Vec::with_capacity(column_keys.len() + usize::from(is_tree));
        if is_tree {
            row_data.push(CellValue::text(label));
        }
        for (key, ty) in column_keys.iter().zip(column_types.iter()) {
            let cell = record
                .get(*key)
                .map(|raw| CellValue::from_json(raw, *ty))
                .unwrap_or(CellValue::Null);
            row_data.push(cell);
        }

        rows.push(PivotRow {
            row_path,
            row_data,
            is_leaf,
        });
    }

    RowPage {
        rows,
        is_tree,
        column_paths,
        column_types,
    }
}

/// Extracts a record's raw tree path. A present but malformed
/// (non-array) path is treated as empty rather than raised.
fn raw_tree_path(record: &Record) -> Vec<String> {
    match record.get(ROW_PATH_KEY) {
        Some(Value::Array(parts)) => parts.iter().map(CellValue::label_from_json).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn sales_schema() -> Schema {
        Schema::from_pairs(vec![("a".to_string(), ColumnType::Integer)])
    }

    #[test]
    fn test_empty_input() {
        let page = transform_page(&[], &sales_schema());
        assert!(page.rows.is_empty());
        assert!(!page.is_tree);
        assert!(page.column_paths.is_empty());
    }

    #[test]
    fn test_flat_table() {
        let records = vec![
            record(json!({"a": 10})),
            record(json!({"a": 4})),
        ];
        let page = transform_page(&records, &sales_schema());
        assert!(!page.is_tree);
        assert_eq!(page.rows.len(), 2);
        assert!(page.rows[0].row_path.is_empty());
        assert!(page.rows[0].is_leaf);
        assert_eq!(page.rows[0].row_data, vec![CellValue::Int(10)]);
    }

    #[test]
    fn test_tree_paths_and_leaf_flags() {
        let records = vec![
            record(json!({"__ROW_PATH__": [], "a": 10})),
            record(json!({"__ROW_PATH__": ["X"], "a": 4})),
            record(json!({"__ROW_PATH__": ["X", "Y"], "a": 2})),
        ];
        let page = transform_page(&records, &sales_schema());
        assert!(page.is_tree);
        assert_eq!(page.rows.len(), 3);

        let paths: Vec<Vec<String>> = page
            .rows
            .iter()
            .map(|r| r.row_path.iter().cloned().collect())
            .collect();
        assert_eq!(paths[0], vec!["ROOT"]);
        assert_eq!(paths[1], vec!["ROOT", "X"]);
        assert_eq!(paths[2], vec!["ROOT", "X", "Y"]);

        // Depth increases at rows 0 and 1, so only the last row is a leaf.
        assert!(!page.rows[0].is_leaf);
        assert!(!page.rows[1].is_leaf);
        assert!(page.rows[2].is_leaf);
    }

    #[test]
    fn test_aggregate_root_labeled_total() {
        let records = vec![
            record(json!({"__ROW_PATH__": [], "a": 10})),
            record(json!({"__ROW_PATH__": ["X"], "a": 4})),
        ];
        let page = transform_page(&records, &sales_schema());
        assert_eq!(page.rows[0].row_data[0], CellValue::text("TOTAL"));
        assert_eq!(page.rows[1].row_data[0], CellValue::text("X"));
        // The label is prefixed ahead of the data columns.
        assert_eq!(page.rows[1].row_data[1], CellValue::Int(4));
    }

    #[test]
    fn test_sibling_rows_are_leaves() {
        let records = vec![
            record(json!({"__ROW_PATH__": ["X"], "a": 1})),
            record(json!({"__ROW_PATH__": ["Y"], "a": 2})),
        ];
        let page = transform_page(&records, &sales_schema());
        assert!(page.rows[0].is_leaf);
        assert!(page.rows[1].is_leaf);
    }

    #[test]
    fn test_malformed_row_path_treated_as_empty() {
        let records = vec![
            record(json!({"__ROW_PATH__": "oops", "a": 1})),
            record(json!({"__ROW_PATH__": ["X"], "a": 2})),
        ];
        let page = transform_page(&records, &sales_schema());
        assert!(page.is_tree);
        let path0: Vec<String> = page.rows[0].row_path.iter().cloned().collect();
        assert_eq!(path0, vec!["ROOT"]);
        assert_eq!(page.rows[0].row_data[0], CellValue::text("TOTAL"));
    }

    #[test]
    fn test_composite_column_paths() {
        let schema = Schema::from_pairs(vec![
            ("West, Sales".to_string(), ColumnType::Float),
            ("East, Sales".to_string(), ColumnType::Float),
        ]);
        let records = vec![record(json!({"West, Sales": 1.5, "East, Sales": 2.5}))];
        let page = transform_page(&records, &schema);
        assert_eq!(page.column_paths[0], vec!["West", "Sales"]);
        assert_eq!(page.column_types, vec![ColumnType::Float, ColumnType::Float]);
    }
}
