//! FILENAME: grid-engine/src/geometry.rs
//! PURPOSE: Pixel geometry for the visible window of the grid.
//!
//! This is the virtualization core: both the column walk and the row
//! walk stop as soon as the accumulated pixel position leaves the
//! viewport, so cost scales with viewport size, not dataset size.
//! Sizing is supplied by a `GridBehavior` injected at construction
//! time; the sizers are pure functions of the logical index, keeping
//! this module side-effect-free and independently testable.

use serde::Serialize;

use crate::cell_pool::CellEventPool;

/// Logical index of the dedicated tree column slot. The slot precedes
/// all data columns and is skipped when no tree column is in effect.
pub const TREE_COLUMN_INDEX: isize = -1;

// ============================================================================
// BEHAVIOR SEAM
// ============================================================================

/// Sizing and layout policy injected into the geometry engine.
///
/// Implementations must be pure with respect to their indices: the
/// same index always yields the same size within one paint pass.
pub trait GridBehavior {
    /// Width in pixels of a column by *view* index (scroll applied).
    /// `TREE_COLUMN_INDEX` asks for the tree column's width.
    fn column_width(&self, view_col: isize) -> f64;

    /// Height in pixels of one row of the given subgrid.
    fn row_height(&self, kind: SubgridKind, logical_row: usize) -> f64;

    /// Thickness of the grid lines separating cells.
    fn grid_line_width(&self) -> f64 {
        1.0
    }

    /// Vertical space reserved at the bottom of the viewport.
    fn footer_height(&self) -> f64 {
        0.0
    }

    /// Whether the tree column participates in layout.
    fn tree_column_active(&self) -> bool {
        false
    }
}

/// Uniform sizing, the no-configuration default.
#[derive(Debug, Clone)]
pub struct UniformBehavior {
    pub column_width: f64,
    pub row_height: f64,
    pub grid_line_width: f64,
    pub footer_height: f64,
    pub tree_column_active: bool,
}

impl Default for UniformBehavior {
    fn default() -> Self {
        UniformBehavior {
            column_width: 50.0,
            row_height: 16.0,
            grid_line_width: 1.0,
            footer_height: 0.0,
            tree_column_active: false,
        }
    }
}

impl GridBehavior for UniformBehavior {
    fn column_width(&self, _view_col: isize) -> f64 {
        self.column_width
    }

    fn row_height(&self, _kind: SubgridKind, _logical_row: usize) -> f64 {
        self.row_height
    }

    fn grid_line_width(&self) -> f64 {
        self.grid_line_width
    }

    fn footer_height(&self) -> f64 {
        self.footer_height
    }

    fn tree_column_active(&self) -> bool {
        self.tree_column_active
    }
}

// ============================================================================
// INPUTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Scroll offsets in whole rows / columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollPosition {
    pub top: usize,
    pub left: usize,
}

/// Leading rows/columns pinned outside the scrolled area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedAreas {
    pub rows: usize,
    pub cols: usize,
}

/// Which stacked band of the grid a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubgridKind {
    Header,
    Data,
    Footer,
}

/// One stacked band of rows. Only the band flagged `is_data` scrolls.
#[derive(Debug, Clone, Copy)]
pub struct Subgrid {
    pub kind: SubgridKind,
    pub row_count: usize,
    pub is_data: bool,
}

impl Subgrid {
    pub fn header(row_count: usize) -> Self {
        Subgrid {
            kind: SubgridKind::Header,
            row_count,
            is_data: false,
        }
    }

    pub fn data(row_count: usize) -> Self {
        Subgrid {
            kind: SubgridKind::Data,
            row_count,
            is_data: true,
        }
    }

    pub fn footer(row_count: usize) -> Self {
        Subgrid {
            kind: SubgridKind::Footer,
            row_count,
            is_data: false,
        }
    }
}

/// Logical position of a cell (row index, column index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellAddress {
    pub row: usize,
    pub col: isize,
}

// ============================================================================
// OUTPUTS
// ============================================================================

/// Per-frame projection of one on-screen column. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleColumn {
    /// Unscrolled position in the walk; `TREE_COLUMN_INDEX` for the
    /// tree column.
    pub logical_index: isize,
    /// Scroll-adjusted index used for width and data lookups.
    pub view_index: isize,
    pub pixel_start: f64,
    pub pixel_size: f64,
}

impl VisibleColumn {
    pub fn pixel_end(&self) -> f64 {
        self.pixel_start + self.pixel_size
    }
}

/// Per-frame projection of one on-screen row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleRow {
    pub subgrid: SubgridKind,
    /// Scroll-adjusted row index within its subgrid.
    pub logical_index: usize,
    pub pixel_start: f64,
    pub pixel_size: f64,
}

impl VisibleRow {
    pub fn pixel_end(&self) -> f64 {
        self.pixel_start + self.pixel_size
    }
}

/// First/last scrolled indices, for bounds checks and cursor math.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DataWindow {
    pub first_row: usize,
    pub last_row: usize,
    pub first_col: usize,
    pub last_col: usize,
}

/// The active editor's cell translated into the current frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorCell {
    pub row: VisibleRow,
    pub column: VisibleColumn,
}

/// Everything one paint pass needs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VisibleLayout {
    pub visible_columns: Vec<VisibleColumn>,
    pub visible_rows: Vec<VisibleRow>,
    /// Rounded midpoints between consecutive visible columns' centers,
    /// for drag-and-drop reorder hit testing.
    pub insertion_bounds: Vec<i64>,
    pub data_window: DataWindow,
    pub editor_cell: Option<EditorCell>,
}

impl VisibleLayout {
    /// Hit test at pixel coordinates. Returns the logical cell under
    /// the point, or None outside the laid-out area (the "no cell"
    /// sentinel -- never an error).
    pub fn pick_cell(&self, x: f64, y: f64) -> Option<CellAddress> {
        let column = self
            .visible_columns
            .iter()
            .find(|c| x >= c.pixel_start && x < c.pixel_end())?;
        let row = self
            .visible_rows
            .iter()
            .filter(|r| r.subgrid == SubgridKind::Data)
            .find(|r| y >= r.pixel_start && y < r.pixel_end())?;
        Some(CellAddress {
            row: row.logical_index,
            col: column.view_index,
        })
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Computes visible bounds each paint/scroll tick. Owns the cell
/// context pool, growing it to the current frame's cell count.
#[derive(Debug, Default)]
pub struct GeometryEngine {
    pool: CellEventPool,
}

impl GeometryEngine {
    pub fn new() -> Self {
        GeometryEngine::default()
    }

    pub fn pool(&self) -> &CellEventPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut CellEventPool {
        &mut self.pool
    }

    /// Lays out the visible window.
    ///
    /// `column_count` is the number of data columns in the schema;
    /// `subgrids` are processed in stacking order with scroll applied
    /// only to the one flagged `is_data`. `editor` is the active cell
    /// editor's logical address, translated into this frame's
    /// projections so its screen position tracks scroll and resize.
    #[allow(clippy::too_many_arguments)]
    pub fn compute_visible(
        &mut self,
        behavior: &impl GridBehavior,
        viewport: Viewport,
        scroll: ScrollPosition,
        fixed: FixedAreas,
        column_count: usize,
        subgrids: &[Subgrid],
        editor: Option<CellAddress>,
    ) -> VisibleLayout {
        let line = behavior.grid_line_width();
        let tree_active = behavior.tree_column_active();

        let visible_columns =
            self.walk_columns(behavior, viewport, scroll, fixed, column_count, line, tree_active);
        let insertion_bounds = insertion_bounds(&visible_columns);
        let visible_rows = self.walk_rows(behavior, viewport, scroll, fixed, subgrids, line);

        let data_window = data_window(&visible_columns, &visible_rows, scroll);
        let editor_cell = editor.and_then(|addr| translate_editor(addr, &visible_columns, &visible_rows));

        // One context per visible cell, plus the reserved slot for the
        // inactive tree column.
        let reserved = usize::from(!tree_active);
        self.pool
            .grow_to((visible_columns.len() + reserved) * visible_rows.len());

        VisibleLayout {
            visible_columns,
            visible_rows,
            insertion_bounds,
            data_window,
            editor_cell,
        }
    }

    fn walk_columns(
        &self,
        behavior: &impl GridBehavior,
        viewport: Viewport,
        scroll: ScrollPosition,
        fixed: FixedAreas,
        column_count: usize,
        line: f64,
        tree_active: bool,
    ) -> Vec<VisibleColumn> {
        let mut columns = Vec::new();
        let mut x = 0.0;
        let mut logical = TREE_COLUMN_INDEX;

        while logical < column_count as isize {
            if x > viewport.width {
                break;
            }
            if logical == TREE_COLUMN_INDEX && !tree_active {
                logical += 1;
                continue;
            }

            // Fixed columns keep their unscrolled position; the rest
            // shift by the column scroll before the width lookup.
            let view_index = if logical < fixed.cols as isize {
                logical
            } else {
                logical + scroll.left as isize
            };

            let width = behavior.column_width(view_index).ceil();
            // The first cell absorbs the leading grid line so adjacent
            // borders do not double-count.
            let rendered = if columns.is_empty() {
                (width - line).max(0.0)
            } else {
                width
            };

            columns.push(VisibleColumn {
                logical_index: logical,
                view_index,
                pixel_start: x,
                pixel_size: rendered,
            });
            x += rendered;
            logical += 1;
        }

        columns
    }

    fn walk_rows(
        &self,
        behavior: &impl GridBehavior,
        viewport: Viewport,
        scroll: ScrollPosition,
        fixed: FixedAreas,
        subgrids: &[Subgrid],
        line: f64,
    ) -> Vec<VisibleRow> {
        let limit = (viewport.height - behavior.footer_height()).max(0.0);
        let mut rows = Vec::new();
        let mut y = 0.0;

        'subgrids: for subgrid in subgrids {
            let mut r = 0;
            loop {
                if y > limit {
                    break 'subgrids;
                }
                // Only the data subgrid scrolls; its leading fixed rows
                // stay pinned.
                let logical = if subgrid.is_data && r >= fixed.rows {
                    r + scroll.top
                } else {
                    r
                };
                if logical >= subgrid.row_count {
                    break;
                }

                let height = behavior.row_height(subgrid.kind, logical);
                let rendered = if rows.is_empty() {
                    (height - line).max(0.0)
                } else {
                    height
                };

                rows.push(VisibleRow {
                    subgrid: subgrid.kind,
                    logical_index: logical,
                    pixel_start: y,
                    pixel_size: rendered,
                });
                y += rendered;
                r += 1;
            }
        }

        rows
    }
}

/// Rounded midpoints between consecutive visible columns' centers.
fn insertion_bounds(columns: &[VisibleColumn]) -> Vec<i64> {
    columns
        .windows(2)
        .map(|pair| {
            let a = pair[0].pixel_start + pair[0].pixel_size / 2.0;
            let b = pair[1].pixel_start + pair[1].pixel_size / 2.0;
            ((a + b) / 2.0).round() as i64
        })
        .collect()
}

fn data_window(
    columns: &[VisibleColumn],
    rows: &[VisibleRow],
    scroll: ScrollPosition,
) -> DataWindow {
    let last_row = rows
        .iter()
        .filter(|r| r.subgrid == SubgridKind::Data)
        .map(|r| r.logical_index)
        .max()
        .unwrap_or(scroll.top);
    let last_col = columns
        .iter()
        .map(|c| c.view_index.max(0) as usize)
        .max()
        .unwrap_or(scroll.left);
    DataWindow {
        first_row: scroll.top,
        last_row,
        first_col: scroll.left,
        last_col,
    }
}

/// Translates the editor's logical address into this frame's
/// projections. None when the editor scrolled out of view.
fn translate_editor(
    addr: CellAddress,
    columns: &[VisibleColumn],
    rows: &[VisibleRow],
) -> Option<EditorCell> {
    let column = columns.iter().find(|c| c.view_index == addr.col)?.clone();
    let row = rows
        .iter()
        .filter(|r| r.subgrid == SubgridKind::Data)
        .find(|r| r.logical_index == addr.row)?
        .clone();
    Some(EditorCell { row, column })
}
