//! FILENAME: grid-engine/src/page_cache.rs
//! PURPOSE: Incremental page fetching into a shared positional buffer.
//!
//! The buffer holds one slot per absolute row index; slots stay `None`
//! until a page covering them arrives. Pages are written in place,
//! last-write-wins per index, and never removed.
//!
//! Overlapping fetches are ordered by a monotonic generation counter:
//! each `ensure_range` call takes a generation before suspending, and a
//! result whose generation is older than the newest already applied is
//! discarded. A slow, stale page can therefore never overwrite rows a
//! newer page has already written.

use grid_model::{
    split_column_path, transform_page, PivotRow, Record, Schema, ROW_PATH_KEY,
};

use crate::source::{DataSource, RowRange, SourceError};

// ============================================================================
// PAGE BUFFER
// ============================================================================

/// Growable positional array of rows, indexed by absolute row number.
/// `None` means "not yet loaded", not "deleted".
#[derive(Debug, Default)]
pub struct PageBuffer {
    rows: Vec<Option<PivotRow>>,
    is_tree: bool,
}

impl PageBuffer {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the loaded result set is tree shaped. False until the
    /// first page arrives.
    pub fn is_tree(&self) -> bool {
        self.is_tree
    }

    pub fn get(&self, index: usize) -> Option<&PivotRow> {
        self.rows.get(index).and_then(Option::as_ref)
    }

    /// True when the slot exists but no page has filled it yet.
    pub fn is_pending(&self, index: usize) -> bool {
        matches!(self.rows.get(index), Some(None))
    }

    /// Pins the buffer length to the source's row count. Existing
    /// entries keep their positions.
    fn resize_to(&mut self, num_rows: usize) {
        self.rows.resize(num_rows, None);
    }

    /// Writes a page at absolute offsets, overwriting stale entries.
    fn write_page(&mut self, start_row: usize, rows: Vec<PivotRow>, is_tree: bool) {
        let end = start_row + rows.len();
        if end > self.rows.len() {
            self.rows.resize(end, None);
        }
        for (i, row) in rows.into_iter().enumerate() {
            self.rows[start_row + i] = Some(row);
        }
        self.is_tree = is_tree;
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.is_tree = false;
    }
}

// ============================================================================
// PAGE CACHE
// ============================================================================

/// Fetches, transforms and caches row pages from a data source.
///
/// Row count and schema are read once per reload and cached until
/// `invalidate()`.
#[derive(Debug, Default)]
pub struct PageCache {
    buffer: PageBuffer,
    schema: Option<Schema>,
    num_rows: Option<usize>,
    /// Generation handed to the next fetch.
    next_generation: u64,
    /// Highest generation whose result was applied to the buffer.
    applied_generation: u64,
}

impl PageCache {
    pub fn new() -> Self {
        PageCache::default()
    }

    pub fn buffer(&self) -> &PageBuffer {
        &self.buffer
    }

    /// Schema of the current load, if primed.
    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows.unwrap_or(0)
    }

    /// Reads and caches the source's schema and row count. The first
    /// call per load sizes the buffer; later calls are no-ops.
    pub fn prime<S: DataSource>(&mut self, source: &S) -> &Schema {
        if self.num_rows.is_none() {
            let num_rows = source.num_rows();
            self.buffer.resize_to(num_rows);
            self.num_rows = Some(num_rows);
        }
        if self.schema.is_none() {
            self.schema = Some(Schema::from_pairs(source.schema()));
        }
        self.schema.as_ref().unwrap()
    }

    /// Drops all cached state and advances the generation so any
    /// still-in-flight fetch from the previous load is discarded on
    /// arrival.
    pub fn invalidate(&mut self) {
        self.buffer.clear();
        self.schema = None;
        self.num_rows = None;
        self.next_generation += 1;
        self.applied_generation = self.next_generation;
    }

    /// Hands out the generation for a new fetch. Generations are
    /// strictly increasing; `apply_page` uses them to order results.
    pub fn begin_fetch(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// Applies a fetched page at its original offsets. Returns false
    /// (and leaves the buffer untouched) when a newer fetch's result
    /// has already been applied -- a late, stale page never overwrites
    /// fresher rows.
    pub fn apply_page(
        &mut self,
        generation: u64,
        start_row: usize,
        mut records: Vec<Record>,
        hidden_columns: &[String],
    ) -> bool {
        if generation < self.applied_generation {
            log::debug!(
                "discarding stale page at row {} (generation {} < {})",
                start_row,
                generation,
                self.applied_generation
            );
            return false;
        }
        self.applied_generation = generation;

        if !hidden_columns.is_empty() {
            for record in &mut records {
                strip_hidden_columns(record, hidden_columns);
            }
        }

        let schema = self.schema.get_or_insert_with(Schema::default);
        let page = transform_page(&records, schema);
        self.buffer.write_page(start_row, page.rows, page.is_tree);
        true
    }

    /// Fetches `[start_row, end_row)` and merges it into the buffer.
    ///
    /// `hidden_columns` are dropped from every record before
    /// transformation, matched by trimmed last path segment. Fetch
    /// errors propagate; the buffer is left untouched in that case.
    pub async fn ensure_range<S: DataSource>(
        &mut self,
        source: &S,
        start_row: usize,
        end_row: usize,
        hidden_columns: &[String],
    ) -> Result<&PageBuffer, SourceError> {
        self.prime(source);

        let end_row = end_row.min(self.num_rows());
        let start_row = start_row.min(end_row);

        let generation = self.begin_fetch();

        let range = RowRange::new(start_row, end_row);
        // The only suspension point; a newer fetch may complete first.
        let records = source.to_json(range).await?;

        self.apply_page(generation, start_row, records, hidden_columns);
        Ok(&self.buffer)
    }
}

/// Removes keys whose trimmed last path segment names a hidden column.
/// The reserved tree-path key is never stripped.
fn strip_hidden_columns(record: &mut Record, hidden_columns: &[String]) {
    record.retain(|key, _| {
        if key == ROW_PATH_KEY {
            return true;
        }
        let segments = split_column_path(key);
        let last = segments.last().map(String::as_str).unwrap_or(key);
        !hidden_columns.iter().any(|h| h == last)
    });
}
