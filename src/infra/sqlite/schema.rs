use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub const BROWSE_PROCEDURE_PREFIX: &str = "rpc_browse_";

const BROWSABLE_TABLES: &[(&str, &str)] = &[
    (
        "ubinan_detail",
        "id, year, subround, kab, kec, commodity, enumerator, plot_weight_kg, status",
    ),
    (
        "skgb_sample",
        "id, year, kab, kec, desa, segment_code, enumerator, status",
    ),
    ("app_user", "id, username, full_name, role, kab"),
];

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS ubinan_detail (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            year            INTEGER NOT NULL,
            subround        INTEGER NOT NULL,
            kab             TEXT NOT NULL,
            kec             TEXT NOT NULL,
            commodity       TEXT NOT NULL,
            enumerator      TEXT NOT NULL DEFAULT '',
            plot_weight_kg  REAL NOT NULL DEFAULT 0,
            status          TEXT NOT NULL DEFAULT 'belum'
        );

        CREATE TABLE IF NOT EXISTS skgb_sample (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            year          INTEGER NOT NULL,
            kab           TEXT NOT NULL,
            kec           TEXT NOT NULL,
            desa          TEXT NOT NULL,
            segment_code  TEXT NOT NULL,
            enumerator    TEXT NOT NULL DEFAULT '',
            status        TEXT NOT NULL DEFAULT 'belum'
        );

        CREATE TABLE IF NOT EXISTS app_user (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            username   TEXT NOT NULL UNIQUE,
            full_name  TEXT NOT NULL,
            role       TEXT NOT NULL,
            kab        TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_ubinan_year_commodity
            ON ubinan_detail(year, commodity);

        CREATE INDEX IF NOT EXISTS idx_skgb_year_status
            ON skgb_sample(year, status);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}

pub fn install_browse_procedures(db_path: &Path) -> Result<()> {
    let conn = open_connection(db_path)?;
    for (table, columns) in BROWSABLE_TABLES {
        let sql = format!(
            "CREATE VIEW IF NOT EXISTS {BROWSE_PROCEDURE_PREFIX}{table} AS
             SELECT {columns} FROM {table}"
        );
        conn.execute_batch(&sql)
            .with_context(|| format!("failed to install browse procedure for {table}"))?;
    }
    Ok(())
}

pub fn relation_exists(conn: &Connection, name: &str) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .with_context(|| format!("failed to look up relation {name}"))?;
    Ok(count > 0)
}
