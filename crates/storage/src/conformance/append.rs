use std::future::Future;

use super::{make_row, read_normalized, seed, TestResult};
use crate::TabularStore;

pub(super) async fn run_append_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "append",
            "append_lands_below_header",
            append_lands_below_header(factory).await,
        ),
        TestResult::from_result(
            "append",
            "appends_preserve_call_order",
            appends_preserve_call_order(factory).await,
        ),
        TestResult::from_result(
            "append",
            "append_keeps_all_cells",
            append_keeps_all_cells(factory).await,
        ),
    ]
}

async fn append_lands_below_header<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[&["first"]]).await?;

    let rows = read_normalized(&s).await?;
    match rows.as_slice() {
        [header, data]
            if header.first().map(String::as_str) == Some("h1")
                && *data == make_row(&["first"]) =>
        {
            Ok(())
        }
        other => Err(format!("expected header + one data row, got {other:?}")),
    }
}

async fn appends_preserve_call_order<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[]).await?;
    for i in 0..5 {
        s.append_row(make_row(&[format!("row-{i}").as_str()]))
            .await
            .map_err(|e| format!("append {i}: {e}"))?;
    }

    let rows = read_normalized(&s).await?;
    for (i, row) in rows.iter().skip(1).enumerate() {
        let expected = format!("row-{i}");
        if row.first() != Some(&expected) {
            return Err(format!("row {} holds {row:?}, expected {expected}", i + 2));
        }
    }
    if rows.len() == 6 {
        Ok(())
    } else {
        Err(format!("expected 6 rows, got {}", rows.len()))
    }
}

async fn append_keeps_all_cells<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: TabularStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let s = factory().await;
    seed(&s, &[&["a", "", "c", "", "e"]]).await?;

    let rows = read_normalized(&s).await?;
    let expected = make_row(&["a", "", "c", "", "e"]);
    if rows.get(1) == Some(&expected) {
        Ok(())
    } else {
        Err(format!("expected {expected:?}, got {:?}", rows.get(1)))
    }
}
