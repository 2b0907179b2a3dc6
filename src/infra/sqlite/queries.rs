use anyhow::{Context, Result};
use rusqlite::{types::Value, Connection};

use crate::domain::entities::query::{RecordFilters, SortState};
use crate::infra::sqlite::bindings::TableBinding;
use crate::usecase::ports::source::SourceError;

/// Rejects filter and sort columns the binding does not expose. Column
/// names are spliced into SQL, so this must run before any query is built.
pub fn validate_request<B: TableBinding>(
    filters: &RecordFilters,
    sort: &SortState,
) -> Result<(), SourceError> {
    let unknown = |column: &str| {
        SourceError::Validation(format!("unknown column {column:?} on {}", B::TABLE))
    };

    if filters.search_term().is_some() {
        if filters.search_columns.is_empty() {
            return Err(SourceError::Validation(
                "search term given without searchable columns".to_string(),
            ));
        }
        if let Some(column) = filters.search_columns.iter().find(|c| !B::has_column(c)) {
            return Err(unknown(column));
        }
    }

    if let Some(category) = &filters.category {
        if !B::has_column(&category.column) {
            return Err(unknown(&category.column));
        }
    }

    if let Some(column) = &sort.column {
        if !B::has_column(column) {
            return Err(unknown(column));
        }
    }

    Ok(())
}

pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn where_clause<B: TableBinding>(filters: &RecordFilters) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut params = Vec::new();

    if let Some(term) = filters.search_term() {
        let pattern = like_pattern(term);
        let matches = filters
            .search_columns
            .iter()
            .map(|column| {
                params.push(Value::Text(pattern.clone()));
                format!("\"{column}\" LIKE ? ESCAPE '\\'")
            })
            .collect::<Vec<_>>();
        clauses.push(format!("({})", matches.join(" OR ")));
    }

    if let Some(category) = &filters.category {
        clauses.push(format!("\"{}\" = ?", category.column));
        params.push(Value::Text(category.value.clone()));
    }

    if B::HAS_YEAR {
        if let Some(year) = filters.year {
            clauses.push("\"year\" = ?".to_string());
            params.push(Value::Integer(i64::from(year)));
        }
    }

    if clauses.is_empty() {
        ("1 = 1".to_string(), params)
    } else {
        (clauses.join(" AND "), params)
    }
}

fn order_clause(sort: &SortState) -> String {
    match &sort.column {
        Some(column) if column != "id" => format!(
            "\"{column}\" COLLATE NOCASE {}, \"id\" ASC",
            sort.direction.as_sql()
        ),
        Some(_) => format!("\"id\" {}", sort.direction.as_sql()),
        None => "\"id\" ASC".to_string(),
    }
}

pub fn select_page<B: TableBinding>(
    conn: &Connection,
    relation: &str,
    filters: &RecordFilters,
    sort: &SortState,
    limit: u32,
    offset: u64,
) -> Result<Vec<B>> {
    let (where_sql, mut params) = where_clause::<B>(filters);
    let columns = B::COLUMNS
        .iter()
        .map(|column| format!("\"{column}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT {columns}
         FROM \"{relation}\"
         WHERE {where_sql}
         ORDER BY {}
         LIMIT ? OFFSET ?",
        order_clause(sort)
    );
    params.push(Value::Integer(i64::from(limit)));
    params.push(Value::Integer(
        i64::try_from(offset).context("page offset out of range")?,
    ));

    let mut stmt = conn
        .prepare(&sql)
        .with_context(|| format!("failed to prepare page query on {relation}"))?;
    let records = stmt
        .query_map(rusqlite::params_from_iter(params), |row| B::from_row(row))
        .with_context(|| format!("failed to query page on {relation}"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to read page rows from {relation}"))?;

    Ok(records)
}

pub fn count_rows<B: TableBinding>(
    conn: &Connection,
    relation: &str,
    filters: &RecordFilters,
) -> Result<u64> {
    let (where_sql, params) = where_clause::<B>(filters);
    let sql = format!("SELECT COUNT(*) FROM \"{relation}\" WHERE {where_sql}");
    let total: i64 = conn
        .query_row(&sql, rusqlite::params_from_iter(params), |row| row.get(0))
        .with_context(|| format!("failed to count rows on {relation}"))?;
    Ok(u64::try_from(total).unwrap_or(0))
}

fn checked_row<B: TableBinding>(headers: &[String], row: &[String], row_number: usize) -> Result<Vec<Value>> {
    headers
        .iter()
        .enumerate()
        .map(|(col_idx, header)| {
            let value = row.get(col_idx).map(|v| v.trim()).unwrap_or("");
            B::check_value(header, value)
                .map_err(|reason| anyhow::anyhow!("row {row_number} of {}: {reason}", B::TABLE))?;
            Ok(Value::Text(value.to_string()))
        })
        .collect()
}

pub fn insert_rows<B: TableBinding>(
    tx: &rusqlite::Transaction<'_>,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<usize> {
    if let Some(unknown) = headers.iter().find(|h| !B::has_column(h)) {
        anyhow::bail!("column {unknown:?} does not exist on {}", B::TABLE)
    }

    let column_list = headers
        .iter()
        .map(|h| format!("\"{h}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = std::iter::repeat("?")
        .take(headers.len())
        .collect::<Vec<_>>()
        .join(", ");
    let mut insert = tx
        .prepare(&format!(
            "INSERT INTO \"{}\" ({column_list}) VALUES ({placeholders})",
            B::TABLE
        ))
        .with_context(|| format!("failed to prepare insert into {}", B::TABLE))?;

    let checked = rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| checked_row::<B>(headers, row, row_idx + 1))
        .collect::<Result<Vec<_>>>()?;

    for (row_idx, values) in checked.into_iter().enumerate() {
        insert
            .execute(rusqlite::params_from_iter(values))
            .with_context(|| format!("failed to insert row {} into {}", row_idx + 1, B::TABLE))?;
    }

    Ok(rows.len())
}
