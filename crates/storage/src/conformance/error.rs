use std::future::Future;

use super::{all_columns, make_row, read_normalized, seed, TestResult};
use crate::range::RowPosition;
use crate::{StorageError, TabularStore};

pub(super) async fn run_error_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "error",
            "write_without_row_is_invalid_range",
            write_without_row_is_invalid_range(factory).await,
        ),
        TestResult::from_result(
            "error",
            "oversized_write_is_invalid_range",
            oversized_write_is_invalid_range(factory).await,
        ),
        TestResult::from_result(
            "error",
            "rejected_write_changes_nothing",
            rejected_write_changes_nothing(factory).await,
        ),
    ]
}

// ── 1. A point write must name a row ─────────────────────────────────────────

async fn write_without_row_is_invalid_range<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    match s.write_row(&all_columns(), make_row(&["a"])).await {
        Err(StorageError::InvalidRange(_)) => Ok(()),
        other => Err(format!("expected InvalidRange, got {:?}", other)),
    }
}

// ── 2. More cells than the range is wide ─────────────────────────────────────

async fn oversized_write_is_invalid_range<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[&["a"]]).await?;
    let cells = make_row(&["1", "2", "3", "4", "5", "6"]);
    match s
        .write_row(&all_columns().at_row(RowPosition::FIRST_DATA), cells)
        .await
    {
        Err(StorageError::InvalidRange(_)) => Ok(()),
        other => Err(format!("expected InvalidRange, got {:?}", other)),
    }
}

// ── 3. Failed writes leave the table untouched ───────────────────────────────

async fn rejected_write_changes_nothing<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[&["a", "b"]]).await?;
    let before = read_normalized(&s).await?;

    let cells = make_row(&["x", "x", "x", "x", "x", "x", "x"]);
    let _ = s
        .write_row(&all_columns().at_row(RowPosition::FIRST_DATA), cells)
        .await;

    let after = read_normalized(&s).await?;
    if before == after {
        Ok(())
    } else {
        Err(format!("table changed: {before:?} -> {after:?}"))
    }
}
