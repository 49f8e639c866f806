//! FILENAME: tests/test_grid.rs
//! Integration tests for the grid facade: lifecycle, notifications,
//! paging, formatting and the visible-window pipeline.

mod common;

use common::{sales_source, sales_source_with_margin, MockSource, SignalRecorder};
use grid_engine::{
    CellAddress, FixedAreas, GridState, PivotGrid, RefreshMode, ScrollPosition,
    UniformBehavior, Viewport, TREE_COLUMN_INDEX,
};

fn tree_grid() -> PivotGrid<MockSource, UniformBehavior> {
    PivotGrid::new(UniformBehavior {
        tree_column_active: true,
        ..UniformBehavior::default()
    })
}

// ============================================================================
// LIFECYCLE AND NOTIFICATIONS
// ============================================================================

#[test]
fn test_initial_state_unloaded() {
    let grid = tree_grid();
    assert_eq!(grid.state(), GridState::Unloaded);
    assert_eq!(grid.num_rows(), 0);
}

#[test]
fn test_first_load_is_full_rebuild() {
    let mut grid = tree_grid();
    let recorder = SignalRecorder::new();
    grid.add_observer(Box::new(recorder.clone()));

    let mode = grid.load(sales_source());
    assert_eq!(mode, RefreshMode::FullRebuild);
    assert_eq!(grid.state(), GridState::Loaded);
    assert_eq!(grid.columns().len(), 2);
    assert_eq!(recorder.take(), vec!["schema_loaded(2)"]);
}

#[tokio::test]
async fn test_reload_same_schema_is_data_only() {
    let mut grid = tree_grid();
    let recorder = SignalRecorder::new();
    grid.add_observer(Box::new(recorder.clone()));

    grid.load(sales_source());
    grid.fetch_range(0, 6).await.unwrap();
    recorder.take();

    // Same schema again: no second schema notification.
    let mode = grid.load(sales_source());
    grid.fetch_range(0, 6).await.unwrap();
    assert_eq!(mode, RefreshMode::DataOnly);
    assert_eq!(recorder.take(), vec!["data_loaded"]);
}

#[tokio::test]
async fn test_fetch_fires_data_loaded() {
    let mut grid = tree_grid();
    let recorder = SignalRecorder::new();
    grid.add_observer(Box::new(recorder.clone()));

    grid.load(sales_source());
    recorder.take();
    grid.fetch_range(0, 3).await.unwrap();
    assert_eq!(recorder.take(), vec!["data_loaded"]);
}

#[test]
fn test_teardown_releases_source_once() {
    let source = sales_source();
    let deletes = source.deletes.clone();

    let mut grid = tree_grid();
    grid.load(source);
    grid.teardown();
    assert_eq!(grid.state(), GridState::Unloaded);
    assert_eq!(deletes.get(), 1);

    // Dropping after teardown must not double-release.
    drop(grid);
    assert_eq!(deletes.get(), 1);
}

#[test]
fn test_replacing_source_releases_previous() {
    let first = sales_source();
    let first_deletes = first.deletes.clone();

    let mut grid = tree_grid();
    grid.load(first);
    grid.load(sales_source_with_margin());
    assert_eq!(first_deletes.get(), 1);
}

// ============================================================================
// PAGING AND FORMATTING
// ============================================================================

#[tokio::test]
async fn test_cell_text_formats_by_column_type() {
    let mut grid = tree_grid();
    grid.load(sales_source());
    grid.fetch_range(0, 6).await.unwrap();

    assert_eq!(grid.cell_text(0, TREE_COLUMN_INDEX), "TOTAL");
    assert_eq!(grid.cell_text(2, TREE_COLUMN_INDEX), "A");
    assert_eq!(grid.cell_text(0, 0), "1,000.00");
    assert_eq!(grid.cell_text(0, 1), "100");
    assert_eq!(grid.cell_text(2, 0), "350.00");
}

#[tokio::test]
async fn test_unfetched_rows_render_empty() {
    let mut grid = tree_grid();
    grid.load(sales_source());
    grid.fetch_range(0, 2).await.unwrap();

    assert_eq!(grid.cell_text(1, 0), "600.00");
    assert_eq!(grid.cell_text(5, 0), "");
}

#[tokio::test]
async fn test_partial_pages_merge_last_write_wins() {
    let mut grid = tree_grid();
    grid.load(sales_source());
    grid.fetch_range(0, 4).await.unwrap();
    grid.fetch_range(2, 6).await.unwrap();

    assert_eq!(grid.buffer().len(), 6);
    for row in 0..6 {
        assert!(grid.buffer().get(row).is_some());
    }
}

#[tokio::test]
async fn test_hidden_columns_render_placeholder() {
    let mut grid = tree_grid();
    grid.load(sales_source());
    grid.set_hidden_columns(vec!["Qty".to_string()]);
    grid.fetch_range(0, 6).await.unwrap();

    assert_eq!(grid.cell_text(0, 0), "1,000.00");
    // The stripped column has no value behind it.
    assert_eq!(grid.cell_text(0, 1), "-");
}

// ============================================================================
// SCHEMA RECONCILIATION ACROSS RELOADS
// ============================================================================

#[test]
fn test_rebuild_restores_user_width_by_label() {
    let mut grid = tree_grid();
    grid.load(sales_source());
    grid.set_column_width(0, 140.0);

    let mode = grid.load(sales_source_with_margin());
    assert_eq!(mode, RefreshMode::FullRebuild);
    assert_eq!(grid.columns().len(), 3);
    // "Sales" kept its user width; the new column gets the default.
    assert_eq!(grid.columns()[0].width, 140.0);
    assert_eq!(grid.columns()[2].width, grid_engine::DEFAULT_COLUMN_WIDTH);
}

// ============================================================================
// VISIBLE WINDOW PIPELINE
// ============================================================================

#[tokio::test]
async fn test_visible_layout_covers_fetched_window() {
    let mut grid = tree_grid();
    grid.load(sales_source());
    grid.fetch_range(0, 6).await.unwrap();

    let layout = grid.compute_visible(
        Viewport {
            width: 300.0,
            height: 200.0,
        },
        ScrollPosition::default(),
        FixedAreas::default(),
        None,
    );

    // Tree column first, then both data columns fit in 300px.
    assert_eq!(layout.visible_columns[0].logical_index, TREE_COLUMN_INDEX);
    assert!(layout.visible_columns.len() >= 3);
    // Header row plus all six data rows fit in 200px.
    let data_rows = layout
        .visible_rows
        .iter()
        .filter(|r| r.subgrid == grid_engine::SubgridKind::Data)
        .count();
    assert_eq!(data_rows, 6);
    assert_eq!(layout.data_window.last_row, 5);
}

#[tokio::test]
async fn test_editor_tracks_scroll_in_facade() {
    let mut grid = tree_grid();
    grid.load(sales_source());
    grid.fetch_range(0, 6).await.unwrap();

    let editor = CellAddress { row: 2, col: 0 };
    let layout = grid.compute_visible(
        Viewport {
            width: 300.0,
            height: 200.0,
        },
        ScrollPosition { top: 1, left: 0 },
        FixedAreas::default(),
        Some(editor),
    );
    let cell = layout.editor_cell.expect("editor visible");
    assert_eq!(cell.row.logical_index, 2);
    assert_eq!(cell.column.view_index, 0);
}
