use std::fmt;

use crate::error::StorageError;

/// A 1-based row number in the backing table.
///
/// Row 1 holds the header; data rows start at row 2, so the row for data
/// index `i` is `i + 2`. Positions are the unit of point-write addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowPosition(u32);

impl RowPosition {
    /// The header row.
    pub const HEADER: RowPosition = RowPosition(1);

    /// First row that carries data.
    pub const FIRST_DATA: RowPosition = RowPosition(2);

    /// Returns `None` for row 0, which does not exist in A1 addressing.
    pub fn new(row: u32) -> Option<Self> {
        (row >= 1).then_some(Self(row))
    }

    /// Position of the data row at zero-based `index` (header excluded).
    pub fn from_data_index(index: usize) -> Self {
        Self(index as u32 + Self::FIRST_DATA.0)
    }

    /// Zero-based data index, or `None` for the header row.
    pub fn data_index(self) -> Option<usize> {
        self.0.checked_sub(Self::FIRST_DATA.0).map(|i| i as usize)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RowPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rectangular block of cells: an inclusive, zero-based column span over
/// either every row of the table or exactly one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    first_column: usize,
    last_column: usize,
    row: Option<RowPosition>,
}

impl CellRange {
    /// Every row, columns `first..=last`.
    pub fn columns(first: usize, last: usize) -> Result<Self, StorageError> {
        if first > last {
            return Err(StorageError::InvalidRange(format!(
                "first column {} is after last column {}",
                column_letters(first),
                column_letters(last)
            )));
        }
        Ok(Self {
            first_column: first,
            last_column: last,
            row: None,
        })
    }

    /// Every row, the first `count` columns (`A` onwards). A zero count is
    /// treated as one column.
    pub fn leading(count: usize) -> Self {
        Self {
            first_column: 0,
            last_column: count.max(1) - 1,
            row: None,
        }
    }

    /// Narrow this range to a single row.
    pub fn at_row(self, row: RowPosition) -> Self {
        Self {
            row: Some(row),
            ..self
        }
    }

    pub fn first_column(&self) -> usize {
        self.first_column
    }

    pub fn last_column(&self) -> usize {
        self.last_column
    }

    pub fn row(&self) -> Option<RowPosition> {
        self.row
    }

    /// Number of columns covered.
    pub fn width(&self) -> usize {
        self.last_column - self.first_column + 1
    }

    /// A1 notation without a sheet prefix: `A:U` or `A7:U7`.
    pub fn a1_notation(&self) -> String {
        let first = column_letters(self.first_column);
        let last = column_letters(self.last_column);
        match self.row {
            Some(row) => format!("{first}{row}:{last}{row}"),
            None => format!("{first}:{last}"),
        }
    }
}

/// Spreadsheet column letters for a zero-based index: 0 → `A`, 25 → `Z`,
/// 26 → `AA`.
pub fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}
