//! FILENAME: grid-engine/src/lib.rs
//! Virtualized grid adapter for hierarchical pivot results.
//!
//! Converts tree-shaped pivot rows from an opaque data source into a
//! windowed, incrementally paged grid model:
//! - `source`: the data-source capability trait and its owning handle
//! - `page_cache`: incremental page fetching into a positional buffer
//! - `reconcile`: data-only refresh vs. full schema rebuild
//! - `geometry`: pixel bounds for the visible window only
//! - `cell_pool`: reusable per-cell render contexts
//! - `overrides`: scoped render-property overrides
//! - `adapter`: the grid facade and its lifecycle
//!
//! Row transformation and display formatting live in `grid-model`.

pub mod adapter;
pub mod cell_pool;
pub mod geometry;
pub mod overrides;
pub mod page_cache;
pub mod reconcile;
pub mod source;

pub use adapter::{GridObserver, GridState, PivotGrid};
pub use cell_pool::{CellBounds, CellContext, CellEventPool};
pub use geometry::{
    CellAddress, DataWindow, EditorCell, FixedAreas, GeometryEngine, GridBehavior,
    ScrollPosition, Subgrid, SubgridKind, UniformBehavior, Viewport, VisibleColumn,
    VisibleLayout, VisibleRow, TREE_COLUMN_INDEX,
};
pub use overrides::{Background, RenderOverride, RenderProps, ScopedOverride};
pub use page_cache::{PageBuffer, PageCache};
pub use reconcile::{
    reconcile, ColumnConfig, FormatterKind, Reconciliation, RefreshMode, SchemaReconciler,
    DEFAULT_COLUMN_WIDTH,
};
pub use source::{DataSource, RowRange, SourceError, SourceHandle};
