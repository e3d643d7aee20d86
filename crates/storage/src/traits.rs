use async_trait::async_trait;

use crate::error::StorageError;
use crate::range::{CellRange, RowPosition};

/// One row of cells, leftmost column first.
pub type Row = Vec<String>;

/// The storage trait for remote row-oriented tables.
///
/// A `TabularStore` is a thin client over a spreadsheet-like service. It knows
/// nothing about submissions; the only primitives are a bulk read, a point
/// write and an append.
///
/// ## Read semantics
///
/// `read_range` returns rows from table row 1 (the header) through the last
/// row that holds any value, clipped to the range's columns. A row may be
/// shorter than the range width: trailing empty cells can be omitted, and a
/// row with no values can come back empty. Callers treat missing cells as
/// empty strings.
///
/// ## Write semantics
///
/// `write_row` replaces the cells of exactly one row, addressed by the range's
/// row position. Cells beyond `cells.len()` inside the range are left as they
/// were. There is no cross-call transaction: two callers that read the same
/// row and write it back race, and the last write wins.
///
/// `append_row` writes after the last row that holds any value.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` to be used in axum
/// application state and across async task boundaries.
#[async_trait]
pub trait TabularStore: Send + Sync + 'static {
    /// Read every row in the range.
    async fn read_range(&self, range: &CellRange) -> Result<Vec<Row>, StorageError>;

    /// Overwrite one row.
    ///
    /// Returns `Err(StorageError::InvalidRange)` if the range does not name a
    /// row or `cells` is wider than the range.
    async fn write_row(&self, range: &CellRange, cells: Row) -> Result<(), StorageError>;

    /// Append a row below the last non-empty row.
    async fn append_row(&self, cells: Row) -> Result<(), StorageError>;
}

/// Shared argument checks for `write_row` implementations.
///
/// Returns the addressed row position.
pub fn check_row_write(range: &CellRange, cells: &[String]) -> Result<RowPosition, StorageError> {
    let Some(position) = range.row() else {
        return Err(StorageError::InvalidRange(format!(
            "point write needs a row, got {}",
            range.a1_notation()
        )));
    };
    if cells.len() > range.width() {
        return Err(StorageError::InvalidRange(format!(
            "{} cells do not fit in {} ({} columns)",
            cells.len(),
            range.a1_notation(),
            range.width()
        )));
    }
    Ok(position)
}
