//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for grid-engine integration tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use grid_engine::{DataSource, GridObserver, RowRange, SourceError};
use grid_model::{ColumnType, Record};
use serde_json::{json, Value};

/// In-memory data source backed by a fixed record list.
pub struct MockSource {
    schema: Vec<(String, ColumnType)>,
    records: Vec<Record>,
    pub deletes: Rc<Cell<u32>>,
}

impl MockSource {
    pub fn new(schema: Vec<(&str, ColumnType)>, records: Vec<Value>) -> Self {
        MockSource {
            schema: schema
                .into_iter()
                .map(|(n, t)| (n.to_string(), t))
                .collect(),
            records: records
                .into_iter()
                .map(|v| match v {
                    Value::Object(map) => map,
                    _ => panic!("fixture records must be objects"),
                })
                .collect(),
            deletes: Rc::new(Cell::new(0)),
        }
    }
}

impl DataSource for MockSource {
    async fn to_json(&self, range: RowRange) -> Result<Vec<Record>, SourceError> {
        let end = range.end_row.min(self.records.len());
        let start = range.start_row.min(end);
        Ok(self.records[start..end].to_vec())
    }

    fn schema(&self) -> Vec<(String, ColumnType)> {
        self.schema.clone()
    }

    fn num_rows(&self) -> usize {
        self.records.len()
    }

    fn delete(&mut self) {
        self.deletes.set(self.deletes.get() + 1);
    }
}

/// Two-level sales pivot: regions with product children.
pub fn sales_source() -> MockSource {
    MockSource::new(
        vec![("Sales", ColumnType::Float), ("Qty", ColumnType::Integer)],
        vec![
            json!({"__ROW_PATH__": [], "Sales": 1000.0, "Qty": 100}),
            json!({"__ROW_PATH__": ["West"], "Sales": 600.0, "Qty": 60}),
            json!({"__ROW_PATH__": ["West", "A"], "Sales": 350.0, "Qty": 35}),
            json!({"__ROW_PATH__": ["West", "B"], "Sales": 250.0, "Qty": 25}),
            json!({"__ROW_PATH__": ["East"], "Sales": 400.0, "Qty": 40}),
            json!({"__ROW_PATH__": ["East", "C"], "Sales": 400.0, "Qty": 40}),
        ],
    )
}

/// Same columns as `sales_source` plus one more; forces a rebuild.
pub fn sales_source_with_margin() -> MockSource {
    MockSource::new(
        vec![
            ("Sales", ColumnType::Float),
            ("Qty", ColumnType::Integer),
            ("Margin", ColumnType::Float),
        ],
        vec![
            json!({"__ROW_PATH__": [], "Sales": 1000.0, "Qty": 100, "Margin": 0.2}),
            json!({"__ROW_PATH__": ["West"], "Sales": 600.0, "Qty": 60, "Margin": 0.25}),
        ],
    )
}

/// Records every notification the grid fires, in order.
#[derive(Clone, Default)]
pub struct SignalRecorder {
    pub events: Rc<RefCell<Vec<String>>>,
}

impl SignalRecorder {
    pub fn new() -> Self {
        SignalRecorder::default()
    }

    pub fn take(&self) -> Vec<String> {
        self.events.borrow_mut().drain(..).collect()
    }
}

impl GridObserver for SignalRecorder {
    fn schema_loaded(&mut self, columns: &[grid_engine::ColumnConfig]) {
        self.events
            .borrow_mut()
            .push(format!("schema_loaded({})", columns.len()));
    }

    fn data_loaded(&mut self) {
        self.events.borrow_mut().push("data_loaded".to_string());
    }
}
