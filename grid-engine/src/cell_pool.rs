//! FILENAME: grid-engine/src/cell_pool.rs
//! PURPOSE: Reusable per-cell render contexts.
//! CONTEXT: Every paint pass needs one context object per visible
//! cell. Allocating them fresh each frame churns memory, so the pool
//! grows to the largest viewport seen and never shrinks; entries are
//! rewritten in place on each pass.

/// Pixel bounds of one rendered cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Mutable render context for one visible cell, reused across paints.
#[derive(Debug, Clone, Default)]
pub struct CellContext {
    /// Logical column; -1 is the tree column slot.
    pub column: isize,
    /// Absolute row index.
    pub row: usize,
    pub bounds: CellBounds,
    /// Pre-formatted display text for this paint pass.
    pub text: String,
    pub is_selected: bool,
}

impl CellContext {
    /// Rebinds this context to a new cell without reallocating.
    pub fn rebind(&mut self, column: isize, row: usize, bounds: CellBounds) {
        self.column = column;
        self.row = row;
        self.bounds = bounds;
        self.text.clear();
        self.is_selected = false;
    }
}

/// Grow-only pool of cell contexts owned by the grid instance.
#[derive(Debug, Default)]
pub struct CellEventPool {
    entries: Vec<CellContext>,
}

impl CellEventPool {
    pub fn new() -> Self {
        CellEventPool::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends fresh entries until the pool holds at least `n`.
    /// Shrinking is never performed.
    pub fn grow_to(&mut self, n: usize) {
        if n > self.entries.len() {
            self.entries.resize_with(n, CellContext::default);
        }
    }

    pub fn get(&self, index: usize) -> Option<&CellContext> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CellContext> {
        self.entries.get_mut(index)
    }
}
