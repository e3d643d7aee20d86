use std::future::Future;

use super::{make_row, read_normalized, seed, TestResult};
use crate::range::CellRange;
use crate::TabularStore;

pub(super) async fn run_read_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "read",
            "empty_table_reads_no_rows",
            empty_table_reads_no_rows(factory).await,
        ),
        TestResult::from_result(
            "read",
            "rows_come_back_in_table_order",
            rows_come_back_in_table_order(factory).await,
        ),
        TestResult::from_result(
            "read",
            "read_is_clipped_to_range_columns",
            read_is_clipped_to_range_columns(factory).await,
        ),
    ]
}

async fn empty_table_reads_no_rows<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    let rows = read_normalized(&s).await?;
    if rows.is_empty() {
        Ok(())
    } else {
        Err(format!("expected no rows, got {rows:?}"))
    }
}

async fn rows_come_back_in_table_order<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[&["a"], &["b"], &["c"]]).await?;

    let rows = read_normalized(&s).await?;
    let firsts: Vec<&str> = rows
        .iter()
        .map(|r| r.first().map(String::as_str).unwrap_or(""))
        .collect();
    if firsts == ["h1", "a", "b", "c"] {
        Ok(())
    } else {
        Err(format!("unexpected row order: {firsts:?}"))
    }
}

async fn read_is_clipped_to_range_columns<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[&["a", "b", "c", "d", "e"]]).await?;

    let range = CellRange::columns(1, 2).map_err(|e| e.to_string())?;
    let rows = s
        .read_range(&range)
        .await
        .map_err(|e| format!("read: {e}"))?;
    let expected = vec![make_row(&["h2", "h3"]), make_row(&["b", "c"])];
    if rows == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, got {rows:?}"))
    }
}
