use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::infra::sqlite::bindings::TableBinding;
use crate::infra::sqlite::queries::insert_rows;
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::ImportResult;

pub fn import_csv_to_table<B: TableBinding>(db_path: &Path, csv_path: &Path) -> Result<ImportResult> {
    init_db(db_path)?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("failed to open csv: {}", csv_path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read headers from csv: {}", csv_path.display()))?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect::<Vec<_>>();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        anyhow::bail!("csv header is required")
    }

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect::<Vec<_>>())
                .context("failed to parse csv record")
        })
        .collect::<Result<Vec<_>>>()?;

    let mut conn = open_connection(db_path)?;
    let tx = conn.transaction().context("failed to start transaction")?;
    let row_count = insert_rows::<B>(&tx, &headers, &rows)?;
    tx.commit().context("failed to commit import transaction")?;

    info!(
        table = B::TABLE,
        rows = row_count,
        path = %csv_path.display(),
        "imported submission csv"
    );

    Ok(ImportResult {
        table: B::TABLE,
        row_count,
    })
}
