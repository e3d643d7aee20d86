use std::future::Future;
use std::sync::Arc;

use super::{all_columns, make_row, read_normalized, seed, TestResult};
use crate::range::RowPosition;
use crate::TabularStore;

/// Number of concurrent tasks to spawn in each test.
const N: usize = 10;

pub(super) async fn run_concurrent_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "concurrent",
            "concurrent_appends_all_land",
            concurrent_appends_all_land(factory).await,
        ),
        TestResult::from_result(
            "concurrent",
            "concurrent_point_writes_last_wins",
            concurrent_point_writes_last_wins(factory).await,
        ),
    ]
}

// ── Concurrent appends: nothing lost ────────────────────────────────────────

/// N tasks append one row each. Every row must be present exactly once,
/// in some order, below the header.
async fn concurrent_appends_all_land<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);
    seed(storage.as_ref(), &[]).await?;

    let mut handles = Vec::new();
    for i in 0..N {
        let s = storage.clone();
        handles.push(tokio::spawn(async move {
            s.append_row(make_row(&[format!("task-{i}").as_str()])).await
        }));
    }
    for handle in handles {
        handle
            .await
            .map_err(|e| format!("join: {e}"))?
            .map_err(|e| format!("append: {e}"))?;
    }

    let rows = read_normalized(storage.as_ref()).await?;
    let mut seen: Vec<String> = rows
        .iter()
        .skip(1)
        .filter_map(|r| r.first().cloned())
        .collect();
    seen.sort();
    let mut expected: Vec<String> = (0..N).map(|i| format!("task-{i}")).collect();
    expected.sort();
    if seen == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, got {seen:?}"))
    }
}

// ── Concurrent point writes: one complete row survives ──────────────────────

/// N tasks write the same row with distinct contents. There is no
/// transaction across calls, so one of them wins; the surviving row must be
/// one task's complete write, never a mix of two.
async fn concurrent_point_writes_last_wins<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let storage = Arc::new(factory().await);
    seed(storage.as_ref(), &[&["original"]]).await?;

    let mut handles = Vec::new();
    for i in 0..N {
        let s = storage.clone();
        handles.push(tokio::spawn(async move {
            let tag = format!("w{i}");
            let cells = make_row(&[tag.as_str(), tag.as_str(), tag.as_str()]);
            s.write_row(&all_columns().at_row(RowPosition::FIRST_DATA), cells)
                .await
        }));
    }
    for handle in handles {
        handle
            .await
            .map_err(|e| format!("join: {e}"))?
            .map_err(|e| format!("write: {e}"))?;
    }

    let rows = read_normalized(storage.as_ref()).await?;
    let row = rows.get(1).ok_or("data row disappeared")?;
    let consistent = row.len() == 3 && row.iter().all(|c| c == &row[0]) && row[0].starts_with('w');
    if consistent && rows.len() == 2 {
        Ok(())
    } else {
        Err(format!("torn or misplaced write: {rows:?}"))
    }
}
