//! FILENAME: grid-engine/src/adapter.rs
//! PURPOSE: The grid facade tying the subsystems together.
//!
//! A `PivotGrid` owns the page cache, the schema reconciler, the
//! geometry engine and the data-source handle. Its lifecycle is a
//! two-state machine: `Unloaded` at construction and after teardown,
//! `Loaded` once a source's schema has been accepted. There is no
//! error state; malformed data degrades to placeholder rendering and
//! only fetch failures surface to the caller.
//!
//! Hosts observe the grid through two notifications: `schema_loaded`
//! fires once per full rebuild (after formatting and widths are
//! applied), `data_loaded` after every refresh.

use rustc_hash::FxHashMap;

use grid_model::{format_cell, CellValue, NULL_PLACEHOLDER};

use crate::geometry::{
    CellAddress, FixedAreas, GeometryEngine, GridBehavior, ScrollPosition, Subgrid,
    Viewport, VisibleLayout, TREE_COLUMN_INDEX,
};
use crate::page_cache::{PageBuffer, PageCache};
use crate::reconcile::{ColumnConfig, RefreshMode, SchemaReconciler};
use crate::source::{DataSource, SourceError, SourceHandle};

/// Lifecycle state of a grid instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridState {
    Unloaded,
    Loaded,
}

/// Host-side listener for grid notifications.
pub trait GridObserver {
    /// Fired once per full rebuild, after column formatting and widths
    /// have been applied.
    fn schema_loaded(&mut self, _columns: &[ColumnConfig]) {}

    /// Fired after every refresh, data-only or full.
    fn data_loaded(&mut self) {}
}

/// Windowed grid adapter over an opaque pivot data source.
pub struct PivotGrid<S: DataSource, B: GridBehavior> {
    state: GridState,
    behavior: B,
    source: Option<SourceHandle<S>>,
    cache: PageCache,
    reconciler: SchemaReconciler,
    columns: Vec<ColumnConfig>,
    /// Applied widths keyed by full header label. Survives reloads so
    /// rebuilt schemas can restore user-chosen sizes.
    widths_by_label: FxHashMap<String, f64>,
    hidden_columns: Vec<String>,
    geometry: GeometryEngine,
    observers: Vec<Box<dyn GridObserver>>,
}

impl<S: DataSource, B: GridBehavior> PivotGrid<S, B> {
    /// Behaviors and renderers are injected here; nothing is looked up
    /// from globals.
    pub fn new(behavior: B) -> Self {
        PivotGrid {
            state: GridState::Unloaded,
            behavior,
            source: None,
            cache: PageCache::new(),
            reconciler: SchemaReconciler::new(),
            columns: Vec::new(),
            widths_by_label: FxHashMap::default(),
            hidden_columns: Vec::new(),
            geometry: GeometryEngine::new(),
            observers: Vec::new(),
        }
    }

    pub fn state(&self) -> GridState {
        self.state
    }

    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    pub fn buffer(&self) -> &PageBuffer {
        self.cache.buffer()
    }

    pub fn num_rows(&self) -> usize {
        self.cache.num_rows()
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn add_observer(&mut self, observer: Box<dyn GridObserver>) {
        self.observers.push(observer);
    }

    /// Column names (matched by last path segment) to strip from
    /// fetched records. Takes effect on the next fetch.
    pub fn set_hidden_columns(&mut self, hidden: Vec<String>) {
        self.hidden_columns = hidden;
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Attaches a data source, releasing any previous one, and accepts
    /// its schema. Fires `schema_loaded` when the schema differs from
    /// the previous load (full rebuild); a reload of an identical
    /// schema stays a data-only refresh.
    pub fn load(&mut self, source: S) -> RefreshMode {
        if let Some(mut old) = self.source.replace(SourceHandle::new(source)) {
            old.release();
        }
        self.cache.invalidate();

        // The handle was just created, so get() cannot fail here.
        let schema = {
            let handle = self.source.as_ref().expect("source attached above");
            let source = handle.get().expect("handle not released");
            self.cache.prime(source).clone()
        };

        let reconciliation = self.reconciler.accept(schema, &self.widths_by_label);
        self.columns = reconciliation.columns;
        if reconciliation.mode == RefreshMode::FullRebuild {
            // Merge rather than replace: labels absent from this schema
            // keep their memoized widths for later rebuilds.
            for config in &self.columns {
                self.widths_by_label
                    .insert(config.spec.header_label.clone(), config.width);
            }
            self.notify_schema_loaded();
        }
        self.state = GridState::Loaded;
        log::debug!(
            "loaded source: {} columns, {} rows ({:?})",
            self.columns.len(),
            self.cache.num_rows(),
            reconciliation.mode
        );
        reconciliation.mode
    }

    /// Fetches `[start_row, end_row)` into the buffer and fires
    /// `data_loaded`. Fetch errors propagate; the caller decides
    /// whether to retry or show a degraded state.
    pub async fn fetch_range(
        &mut self,
        start_row: usize,
        end_row: usize,
    ) -> Result<(), SourceError> {
        let handle = self.source.as_ref().ok_or(SourceError::Released)?;
        let source = handle.get()?;
        self.cache
            .ensure_range(source, start_row, end_row, &self.hidden_columns)
            .await?;
        self.notify_data_loaded();
        Ok(())
    }

    /// Releases the data source and returns to `Unloaded`. Width
    /// memoization survives teardown so a later load can restore
    /// column sizes.
    pub fn teardown(&mut self) {
        if let Some(mut handle) = self.source.take() {
            handle.release();
        }
        self.cache.invalidate();
        self.reconciler.reset();
        self.columns.clear();
        self.state = GridState::Unloaded;
    }

    // ========================================================================
    // PRESENTATION
    // ========================================================================

    /// User-driven column resize. Ignored for non-resizable columns.
    pub fn set_column_width(&mut self, column: usize, width: f64) {
        if let Some(config) = self.columns.get_mut(column) {
            if config.resizable {
                config.width = width;
                self.widths_by_label
                    .insert(config.spec.header_label.clone(), width);
            }
        }
    }

    /// Lays out the visible window for the current scroll position.
    pub fn compute_visible(
        &mut self,
        viewport: Viewport,
        scroll: ScrollPosition,
        fixed: FixedAreas,
        editor: Option<CellAddress>,
    ) -> VisibleLayout {
        let subgrids = [Subgrid::header(1), Subgrid::data(self.cache.num_rows())];
        self.geometry.compute_visible(
            &self.behavior,
            viewport,
            scroll,
            fixed,
            self.columns.len(),
            &subgrids,
            editor,
        )
    }

    /// Display text for a cell. Rows not yet fetched render as empty;
    /// null and unloadable values render as the placeholder.
    pub fn cell_text(&self, row: usize, col: isize) -> String {
        let buffer = self.cache.buffer();
        let pivot_row = match buffer.get(row) {
            Some(r) => r,
            None => return String::new(),
        };

        if col == TREE_COLUMN_INDEX {
            return match pivot_row.row_data.first() {
                Some(CellValue::Text(label)) if buffer.is_tree() => label.clone(),
                _ => String::new(),
            };
        }
        if col < 0 {
            return String::new();
        }

        let data_index = col as usize + usize::from(buffer.is_tree());
        let value = match pivot_row.row_data.get(data_index) {
            Some(value) => value,
            None => return NULL_PLACEHOLDER.to_string(),
        };
        match self.columns.get(col as usize) {
            Some(config) => format_cell(value, config.spec.ty),
            None => NULL_PLACEHOLDER.to_string(),
        }
    }

    fn notify_schema_loaded(&mut self) {
        let columns = &self.columns;
        for observer in &mut self.observers {
            observer.schema_loaded(columns);
        }
    }

    fn notify_data_loaded(&mut self) {
        for observer in &mut self.observers {
            observer.data_loaded();
        }
    }
}

impl<S: DataSource, B: GridBehavior> Drop for PivotGrid<S, B> {
    fn drop(&mut self) {
        // SourceHandle logs if the host skipped teardown.
        if let Some(mut handle) = self.source.take() {
            handle.release();
        }
    }
}
