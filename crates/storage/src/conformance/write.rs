use std::future::Future;

use super::{all_columns, make_row, read_normalized, seed, TestResult};
use crate::range::RowPosition;
use crate::TabularStore;

pub(super) async fn run_write_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "write",
            "point_write_replaces_only_that_row",
            point_write_replaces_only_that_row(factory).await,
        ),
        TestResult::from_result(
            "write",
            "point_write_can_clear_cells",
            point_write_can_clear_cells(factory).await,
        ),
        TestResult::from_result(
            "write",
            "point_write_then_append_keeps_both",
            point_write_then_append_keeps_both(factory).await,
        ),
    ]
}

async fn point_write_replaces_only_that_row<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[&["a", "1"], &["b", "2"], &["c", "3"]]).await?;

    let position = RowPosition::from_data_index(1);
    s.write_row(&all_columns().at_row(position), make_row(&["b", "22", "x"]))
        .await
        .map_err(|e| format!("write: {e}"))?;

    let rows = read_normalized(&s).await?;
    let expected = vec![
        make_row(&["h1", "h2", "h3", "h4", "h5"]),
        make_row(&["a", "1"]),
        make_row(&["b", "22", "x"]),
        make_row(&["c", "3"]),
    ];
    if rows == expected {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, got {rows:?}"))
    }
}

async fn point_write_can_clear_cells<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[&["a", "b", "c"]]).await?;

    s.write_row(
        &all_columns().at_row(RowPosition::FIRST_DATA),
        make_row(&["a", "", ""]),
    )
    .await
    .map_err(|e| format!("write: {e}"))?;

    let rows = read_normalized(&s).await?;
    if rows.get(1) == Some(&make_row(&["a"])) {
        Ok(())
    } else {
        Err(format!("expected cleared cells, got {:?}", rows.get(1)))
    }
}

async fn point_write_then_append_keeps_both<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[&["a"]]).await?;

    s.write_row(
        &all_columns().at_row(RowPosition::FIRST_DATA),
        make_row(&["a2"]),
    )
    .await
    .map_err(|e| format!("write: {e}"))?;
    s.append_row(make_row(&["b"]))
        .await
        .map_err(|e| format!("append: {e}"))?;

    let rows = read_normalized(&s).await?;
    let firsts: Vec<&str> = rows
        .iter()
        .skip(1)
        .map(|r| r.first().map(String::as_str).unwrap_or(""))
        .collect();
    if firsts == ["a2", "b"] {
        Ok(())
    } else {
        Err(format!("unexpected data rows: {firsts:?}"))
    }
}
