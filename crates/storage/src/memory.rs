//! In-process `TabularStore` used for local development and tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::range::CellRange;
use crate::traits::{check_row_write, Row, TabularStore};

/// A table held in memory with the same observable shape as the remote
/// service: trailing empty cells and trailing empty rows are not returned.
#[derive(Debug, Default)]
pub struct MemoryTable {
    rows: RwLock<Vec<Row>>,
    writes: AtomicUsize,
    appends: AtomicUsize,
}

impl MemoryTable {
    /// An empty table with no header row.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-filled with `rows`; `rows[0]` is table row 1.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows: RwLock::new(rows),
            ..Self::default()
        }
    }

    /// A copy of every stored row, header included.
    pub async fn snapshot(&self) -> Vec<Row> {
        self.rows.read().await.clone()
    }

    /// Number of successful `write_row` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of successful `append_row` calls.
    pub fn append_count(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }
}

fn trim_trailing_empty(mut row: Row) -> Row {
    while row.last().is_some_and(|c| c.is_empty()) {
        row.pop();
    }
    row
}

/// Number of rows up to and including the last row with any value.
fn occupied_len(rows: &[Row]) -> usize {
    rows.iter()
        .rposition(|r| r.iter().any(|c| !c.is_empty()))
        .map_or(0, |i| i + 1)
}

#[async_trait]
impl TabularStore for MemoryTable {
    async fn read_range(&self, range: &CellRange) -> Result<Vec<Row>, StorageError> {
        let rows = self.rows.read().await;
        let clip = |row: &Row| -> Row {
            let cells = row
                .iter()
                .skip(range.first_column())
                .take(range.width())
                .cloned()
                .collect();
            trim_trailing_empty(cells)
        };

        if let Some(position) = range.row() {
            let index = position.get() as usize - 1;
            return Ok(rows.get(index).map(clip).into_iter().collect());
        }

        Ok(rows[..occupied_len(&rows)].iter().map(clip).collect())
    }

    async fn write_row(&self, range: &CellRange, cells: Row) -> Result<(), StorageError> {
        let position = check_row_write(range, &cells)?;

        let mut rows = self.rows.write().await;
        let index = position.get() as usize - 1;
        if rows.len() <= index {
            rows.resize_with(index + 1, Vec::new);
        }
        let row = &mut rows[index];
        let end = range.first_column() + cells.len();
        if row.len() < end {
            row.resize(end, String::new());
        }
        for (offset, cell) in cells.into_iter().enumerate() {
            row[range.first_column() + offset] = cell;
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn append_row(&self, cells: Row) -> Result<(), StorageError> {
        let mut rows = self.rows.write().await;
        let len = occupied_len(&rows);
        rows.truncate(len);
        rows.push(cells);
        self.appends.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
