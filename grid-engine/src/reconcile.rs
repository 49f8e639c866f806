//! FILENAME: grid-engine/src/reconcile.rs
//! PURPOSE: Decides between a cheap data refresh and a full rebuild.
//!
//! When a new result set arrives, its schema is compared structurally
//! to the previous one. Identical schemas keep every per-column setting
//! (widths, formatting, sort/expand state) and only the row buffer is
//! refreshed. Any difference forces a full rebuild: widths are
//! memoized by header label first so columns that survive the pivot
//! change keep their size, with the label's last path segment as a
//! fallback key for columns that moved.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use grid_model::{split_column_path, ColumnSpec, ColumnType, Schema};

/// Default width for columns with no memoized size.
pub const DEFAULT_COLUMN_WIDTH: f64 = 50.0;

/// How the incoming schema relates to the loaded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshMode {
    /// Schemas match structurally: refresh row data only.
    DataOnly,
    /// Schema changed: rebuild column formatting and widths.
    FullRebuild,
}

/// Display formatter assigned to a column by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatterKind {
    /// Fixed two decimals, thousands separators.
    FinancialFloat,
    /// Thousands separators, no decimals.
    GroupedInteger,
    /// Localized date-time string.
    LocalDateTime,
    /// Verbatim text.
    Plain,
}

impl FormatterKind {
    pub fn for_type(ty: ColumnType) -> Self {
        match ty {
            ColumnType::Float => FormatterKind::FinancialFloat,
            ColumnType::Integer => FormatterKind::GroupedInteger,
            ColumnType::Date => FormatterKind::LocalDateTime,
            ColumnType::String | ColumnType::Boolean => FormatterKind::Plain,
        }
    }
}

/// Per-column presentation state for the current schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub spec: ColumnSpec,
    pub formatter: FormatterKind,
    pub width: f64,
    /// Set on every full rebuild; widths are user-adjustable from then
    /// on.
    pub resizable: bool,
}

/// The reconciler's verdict plus the rebuilt column configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub mode: RefreshMode,
    pub columns: Vec<ColumnConfig>,
}

/// Compares schemas and produces the refresh plan.
///
/// `widths_by_label` holds the currently applied widths keyed by full
/// header label; it is read, never written (the caller owns width
/// state).
pub fn reconcile(
    new_schema: &Schema,
    old_schema: Option<&Schema>,
    widths_by_label: &FxHashMap<String, f64>,
) -> Reconciliation {
    let mode = match old_schema {
        Some(old) if old == new_schema => RefreshMode::DataOnly,
        _ => RefreshMode::FullRebuild,
    };

    let columns = match mode {
        // Widths pass through untouched; formatting survives as-is.
        RefreshMode::DataOnly => new_schema
            .iter()
            .map(|spec| ColumnConfig {
                formatter: FormatterKind::for_type(spec.ty),
                width: lookup_width(widths_by_label, &spec.header_label),
                resizable: true,
                spec: spec.clone(),
            })
            .collect(),
        RefreshMode::FullRebuild => {
            let memo = memoize_widths(widths_by_label);
            new_schema
                .iter()
                .map(|spec| ColumnConfig {
                    formatter: FormatterKind::for_type(spec.ty),
                    width: restore_width(&memo, spec),
                    resizable: true,
                    spec: spec.clone(),
                })
                .collect()
        }
    };

    Reconciliation { mode, columns }
}

/// Tracks the loaded schema across refreshes.
#[derive(Debug, Default)]
pub struct SchemaReconciler {
    current: Option<Schema>,
}

impl SchemaReconciler {
    pub fn new() -> Self {
        SchemaReconciler::default()
    }

    pub fn current(&self) -> Option<&Schema> {
        self.current.as_ref()
    }

    /// Runs reconciliation against the previously accepted schema and
    /// adopts the new one.
    pub fn accept(
        &mut self,
        new_schema: Schema,
        widths_by_label: &FxHashMap<String, f64>,
    ) -> Reconciliation {
        let result = reconcile(&new_schema, self.current.as_ref(), widths_by_label);
        self.current = Some(new_schema);
        result
    }

    /// Forgets the loaded schema (teardown); the next accept is a full
    /// rebuild.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

fn lookup_width(widths_by_label: &FxHashMap<String, f64>, label: &str) -> f64 {
    widths_by_label
        .get(label)
        .copied()
        .unwrap_or(DEFAULT_COLUMN_WIDTH)
}

/// Memoized widths: full label keys first, then last-segment fallback
/// keys. Exact labels are inserted last so they win on collision.
fn memoize_widths(widths_by_label: &FxHashMap<String, f64>) -> FxHashMap<String, f64> {
    let mut memo = FxHashMap::default();
    for (label, width) in widths_by_label {
        let segments = split_column_path(label);
        if let Some(last) = segments.last() {
            memo.entry(last.clone()).or_insert(*width);
        }
    }
    for (label, width) in widths_by_label {
        memo.insert(label.clone(), *width);
    }
    memo
}

fn restore_width(memo: &FxHashMap<String, f64>, spec: &ColumnSpec) -> f64 {
    memo.get(&spec.header_label)
        .or_else(|| memo.get(spec.last_segment()))
        .copied()
        .unwrap_or(DEFAULT_COLUMN_WIDTH)
}
