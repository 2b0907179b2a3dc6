use std::fmt::Display;
use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::Row;

use crate::domain::entities::record::{SkgbSample, UbinanRecord, UserAccount};
use crate::domain::entities::status::{Commodity, ParseStatusError, SampleStatus, UserRole};
use crate::infra::sqlite::schema::BROWSE_PROCEDURE_PREFIX;

pub trait TableBinding: Sized {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    const HAS_YEAR: bool;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    // Imported text must decode through `from_row` later.
    fn check_value(column: &str, value: &str) -> Result<(), String>;

    fn browse_procedure() -> String {
        format!("{BROWSE_PROCEDURE_PREFIX}{}", Self::TABLE)
    }

    fn has_column(column: &str) -> bool {
        Self::COLUMNS.contains(&column)
    }
}

fn coded<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = ParseStatusError>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn parses<T>(column: &str, value: &str) -> Result<(), String>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse::<T>()
        .map(|_| ())
        .map_err(|err| format!("invalid {column} {value:?}: {err}"))
}

impl TableBinding for UbinanRecord {
    const TABLE: &'static str = "ubinan_detail";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "year",
        "subround",
        "kab",
        "kec",
        "commodity",
        "enumerator",
        "plot_weight_kg",
        "status",
    ];
    const HAS_YEAR: bool = true;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(UbinanRecord {
            id: row.get(0)?,
            year: row.get(1)?,
            subround: row.get(2)?,
            kab: row.get(3)?,
            kec: row.get(4)?,
            commodity: coded(row, 5)?,
            enumerator: row.get(6)?,
            plot_weight_kg: row.get(7)?,
            status: coded(row, 8)?,
        })
    }

    fn check_value(column: &str, value: &str) -> Result<(), String> {
        match column {
            "id" => parses::<i64>(column, value),
            "year" => parses::<i32>(column, value),
            "subround" => parses::<u8>(column, value),
            "plot_weight_kg" => parses::<f64>(column, value),
            "commodity" => parses::<Commodity>(column, value),
            "status" => parses::<SampleStatus>(column, value),
            _ => Ok(()),
        }
    }
}

impl TableBinding for SkgbSample {
    const TABLE: &'static str = "skgb_sample";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "year",
        "kab",
        "kec",
        "desa",
        "segment_code",
        "enumerator",
        "status",
    ];
    const HAS_YEAR: bool = true;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(SkgbSample {
            id: row.get(0)?,
            year: row.get(1)?,
            kab: row.get(2)?,
            kec: row.get(3)?,
            desa: row.get(4)?,
            segment_code: row.get(5)?,
            enumerator: row.get(6)?,
            status: coded(row, 7)?,
        })
    }

    fn check_value(column: &str, value: &str) -> Result<(), String> {
        match column {
            "id" => parses::<i64>(column, value),
            "year" => parses::<i32>(column, value),
            "status" => parses::<SampleStatus>(column, value),
            _ => Ok(()),
        }
    }
}

impl TableBinding for UserAccount {
    const TABLE: &'static str = "app_user";
    const COLUMNS: &'static [&'static str] = &["id", "username", "full_name", "role", "kab"];
    const HAS_YEAR: bool = false;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(UserAccount {
            id: row.get(0)?,
            username: row.get(1)?,
            full_name: row.get(2)?,
            role: coded(row, 3)?,
            kab: row.get(4)?,
        })
    }

    fn check_value(column: &str, value: &str) -> Result<(), String> {
        match column {
            "id" => parses::<i64>(column, value),
            "role" => parses::<UserRole>(column, value),
            _ => Ok(()),
        }
    }
}
