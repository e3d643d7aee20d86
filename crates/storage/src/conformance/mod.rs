//! Conformance test suite for `TabularStore` implementations.
//!
//! This module provides a backend-agnostic test suite that any `TabularStore`
//! implementation can run to verify it behaves the way the submission store
//! expects. The suite covers:
//!
//! - **Read**: empty tables, column clipping, row order
//! - **Append**: appends land below the last occupied row, in call order
//! - **Point write**: exactly one row changes, other rows are untouched
//! - **Concurrency**: concurrent appends all land, concurrent point writes
//!   leave one complete row (last write wins)
//! - **Error handling**: invalid ranges are rejected before any write
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory function that
//! creates a fresh, empty table for each test:
//!
//! ```ignore
//! use commission_storage::conformance::run_conformance_suite;
//!
//! #[tokio::test]
//! async fn memory_conformance() {
//!     let report = run_conformance_suite(|| async { MemoryTable::new() }).await;
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod append;
mod concurrent;
mod error;
mod read;
mod write;

use std::fmt;
use std::future::Future;

use crate::range::CellRange;
use crate::traits::Row;
use crate::TabularStore;

/// Columns used by every conformance test: `A:E`.
const WIDTH: usize = 5;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "read", "append", "write").
    pub category: String,
    /// Test name (e.g. "append_lands_below_header").
    pub name: String,
    /// Whether the test passed.
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn pass(category: &str, name: &str) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: true,
            message: None,
        }
    }

    fn fail(category: &str, name: &str, msg: String) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed: false,
            message: Some(msg),
        }
    }

    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::pass(category, name),
            Err(msg) => Self::fail(category, name, msg),
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Run the full conformance suite against a storage backend.
///
/// The `factory` function is called once per test to create a fresh, empty
/// table, ensuring test isolation.
pub async fn run_conformance_suite<S, F, Fut>(factory: F) -> ConformanceReport
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let mut results = Vec::new();

    results.extend(read::run_read_tests(&factory).await);
    results.extend(append::run_append_tests(&factory).await);
    results.extend(write::run_write_tests(&factory).await);
    results.extend(error::run_error_tests(&factory).await);
    results.extend(concurrent::run_concurrent_tests(&factory).await);

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn all_columns() -> CellRange {
    CellRange::leading(WIDTH)
}

fn make_row(cells: &[&str]) -> Row {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Backends may omit trailing empty cells; compare with those stripped.
fn normalize(mut row: Row) -> Row {
    while row.last().is_some_and(|c| c.is_empty()) {
        row.pop();
    }
    row
}

async fn read_normalized<S: TabularStore>(store: &S) -> Result<Vec<Row>, String> {
    let rows = store
        .read_range(&all_columns())
        .await
        .map_err(|e| format!("read: {e}"))?;
    Ok(rows.into_iter().map(normalize).collect())
}

/// Append a header plus `data` rows, in order.
async fn seed<S: TabularStore>(store: &S, data: &[&[&str]]) -> Result<(), String> {
    store
        .append_row(make_row(&["h1", "h2", "h3", "h4", "h5"]))
        .await
        .map_err(|e| format!("append header: {e}"))?;
    for row in data {
        store
            .append_row(make_row(row))
            .await
            .map_err(|e| format!("append row: {e}"))?;
    }
    Ok(())
}
