//! Runs the tabular-store conformance suite against the in-memory table.

use commission_storage::conformance::run_conformance_suite;
use commission_storage::MemoryTable;

#[tokio::test]
async fn memory_table_passes_conformance() {
    let report = run_conformance_suite(|| async { MemoryTable::new() }).await;
    assert_eq!(report.total, 14, "{report}");
    assert!(report.failed == 0, "{report}");
}
