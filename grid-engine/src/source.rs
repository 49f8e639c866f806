//! FILENAME: grid-engine/src/source.rs
//! PURPOSE: The capability trait abstracting the pivot/aggregation
//! engine, plus the owning handle that enforces its release contract.
//!
//! The underlying view/table is an externally owned resource: whoever
//! acquired it must call `delete()` exactly once or native-side memory
//! leaks. `SourceHandle` wraps the source so release happens at
//! teardown (or on drop, with a warning, if the caller forgot).

use grid_model::{ColumnType, Record};
use thiserror::Error;

/// Errors surfaced by the data source. Fetch failures propagate to the
/// caller of `ensure_range`; there is no automatic retry.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("data source released")]
    Released,
}

/// Absolute row window requested from the source: `[start_row, end_row)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start_row: usize,
    pub end_row: usize,
}

impl RowRange {
    pub fn new(start_row: usize, end_row: usize) -> Self {
        RowRange { start_row, end_row }
    }

    pub fn len(&self) -> usize {
        self.end_row.saturating_sub(self.start_row)
    }

    pub fn is_empty(&self) -> bool {
        self.end_row <= self.start_row
    }
}

/// Capability set consumed from the pivot engine. All calls are
/// cooperative: `to_json` is the adapter's only suspension point.
pub trait DataSource {
    /// Fetches the raw records for exactly `range`.
    fn to_json(
        &self,
        range: RowRange,
    ) -> impl std::future::Future<Output = Result<Vec<Record>, SourceError>>;

    /// Ordered column name -> type pairs.
    fn schema(&self) -> Vec<(String, ColumnType)>;

    /// Total row count of the current result set.
    fn num_rows(&self) -> usize;

    /// Releases the native-side resource. Must be called exactly once.
    fn delete(&mut self);
}

/// Owning guard around a data source. `release()` is the intended
/// teardown path; dropping an unreleased handle still deletes the
/// source but logs the omission.
pub struct SourceHandle<S: DataSource> {
    source: Option<S>,
}

impl<S: DataSource> SourceHandle<S> {
    pub fn new(source: S) -> Self {
        SourceHandle {
            source: Some(source),
        }
    }

    pub fn get(&self) -> Result<&S, SourceError> {
        self.source.as_ref().ok_or(SourceError::Released)
    }

    pub fn is_released(&self) -> bool {
        self.source.is_none()
    }

    /// Releases the underlying source. Idempotent.
    pub fn release(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.delete();
        }
    }
}

impl<S: DataSource> Drop for SourceHandle<S> {
    fn drop(&mut self) {
        if let Some(mut source) = self.source.take() {
            log::warn!("data source dropped without explicit release");
            source.delete();
        }
    }
}
