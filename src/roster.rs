use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::FormatError;
use crate::table::{self, Row, Value};

/// One competitor in draw order. The position of a team in the roster file
/// defines its matrix row/column index for the rest of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub pot: i64,
    pub abbrev: String,
    pub country: String,
    pub name: String,
    pub id: String,
}

pub fn load(path: &Path) -> Result<Vec<Team>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading roster {}", path.display()))?;
    let (_, rows) = table::parse_str(&raw)
        .with_context(|| format!("failed parsing roster {}", path.display()))?;
    let teams = from_rows(&rows)?;
    Ok(teams)
}

pub fn from_rows(rows: &[Row]) -> Result<Vec<Team>, FormatError> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let pot = int_cell(row, idx, "pot")?;
            let abbrev = str_cell(row, idx, "abbrev")?;
            let country = str_cell(row, idx, "country")?;
            let name = str_cell(row, idx, "team")?;
            let id = id_cell(row, idx, "id")?;
            Ok(Team {
                pot,
                abbrev,
                country,
                name,
                id,
            })
        })
        .collect()
}

fn int_cell(row: &Row, idx: usize, column: &'static str) -> Result<i64, FormatError> {
    row.get(column)
        .and_then(Value::as_int)
        .ok_or(FormatError::BadColumn { row: idx, column })
}

fn str_cell(row: &Row, idx: usize, column: &'static str) -> Result<String, FormatError> {
    row.get(column)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(FormatError::BadColumn { row: idx, column })
}

/// External ids are opaque strings, but all-digit ids coerce to integers in
/// the table layer; stringify them back.
fn id_cell(row: &Row, idx: usize, column: &'static str) -> Result<String, FormatError> {
    match row.get(column) {
        Some(Value::Str(v)) => Ok(v.clone()),
        Some(Value::Int(v)) => Ok(v.to_string()),
        _ => Err(FormatError::BadColumn { row: idx, column }),
    }
}
