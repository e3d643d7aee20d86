pub mod conformance;
mod error;
mod memory;
mod range;
mod traits;

pub use error::StorageError;
pub use memory::MemoryTable;
pub use range::{column_letters, CellRange, RowPosition};
pub use traits::{check_row_write, Row, TabularStore};
