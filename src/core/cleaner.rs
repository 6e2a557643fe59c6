//! Cleaning rules for the cases and hearings tables
//!
//! Both cleaners are pure and idempotent: running a cleaned table through
//! the cleaner again yields an equal table. Malformed cells become null;
//! a missing source column only disables the derived field that needs it.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::core::columns::{self, first_in};
use crate::core::table::{Cell, Table, Value};

/// Date formats accepted in source data, tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d", "%d-%b-%Y", "%d.%m.%Y",
];

/// Cell text treated as missing
const NA_TOKENS: &[&str] = &[
    "nan", "none", "null", "n/a", "na", "#n/a", "<na>", "nat", "-",
];

/// Trim and lower-case a column name
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Trim and upper-case a judge name
pub fn normalize_judge(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Parse a date in any accepted format, ignoring a trailing time part
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.split_whitespace().next()?;
    let head = match head.find('T') {
        Some(10) => &head[..10],
        _ => head,
    };

    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
        .find(|d| is_four_digit_year(d.year() as i64))
}

fn is_four_digit_year(year: i64) -> bool {
    (1000..=9999).contains(&year)
}

/// `date` as a suffix (`nexthearingdate`) or an `_`-separated token (`date_of_filing`)
fn is_date_column(name: &str) -> bool {
    name.ends_with("date")
        || name.split('_').any(|token| token == "date")
        || columns::EXTRA_DATE_COLUMNS.contains(&name)
}

fn null_na_token(cell: Cell) -> Cell {
    match cell {
        Some(Value::Text(s)) if NA_TOKENS.contains(&s.to_lowercase().as_str()) => None,
        other => other,
    }
}

fn date_cell(cell: Cell) -> Cell {
    match cell {
        Some(Value::Date(d)) => Some(Value::Date(d)),
        Some(Value::Text(s)) => parse_date(&s).map(Value::Date),
        _ => None,
    }
}

/// Year as a 4-digit integer, from a date or a numeric representation
fn year_cell(cell: Option<&Value>) -> Cell {
    let year = match cell? {
        Value::Date(d) => d.year() as i64,
        Value::Int(n) => *n,
        Value::Text(s) => {
            let n: f64 = s.trim().parse().ok()?;
            if !n.is_finite() {
                return None;
            }
            n.trunc() as i64
        }
    };
    is_four_digit_year(year).then_some(Value::Int(year))
}

/// Column names, NA tokens and date columns
fn normalize_columns(mut table: Table) -> Table {
    table.rename_columns(normalize_column_name);

    for idx in 0..table.columns().len() {
        table.map_column(idx, null_na_token);
    }

    let date_columns: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| is_date_column(name))
        .map(|(i, _)| i)
        .collect();

    for idx in date_columns {
        let before = table.cells(idx).filter(|c| c.is_some()).count();
        table.map_column(idx, date_cell);
        let after = table.cells(idx).filter(|c| c.is_some()).count();
        if after < before {
            debug!(
                column = %table.columns()[idx],
                nulled = before - after,
                "unparsable dates set to null"
            );
        }
    }

    table
}

/// Clean the cases table
pub fn clean_cases(table: Table) -> Table {
    let mut table = normalize_columns(table);

    let filing = first_in(&table, columns::FILING_DATE);
    let decision = first_in(&table, columns::DECISION_DATE);

    match (filing, decision) {
        (Some(filing), Some(decision)) => {
            let days: Vec<Cell> = table
                .iter()
                .map(|row| {
                    let filed = row.get(filing)?.as_date()?;
                    let decided = row.get(decision)?.as_date()?;
                    let days = (decided - filed).num_days();
                    (days >= 0).then_some(Value::Int(days))
                })
                .collect();
            table.set_column(columns::DISPOSAL_DAYS, days);
        }
        _ => warn!("filing or decision date column missing; disposal_days not derived"),
    }

    if filing.is_some() || table.has_column(columns::FILING_YEAR) {
        let years: Vec<Cell> = table
            .iter()
            .map(|row| {
                filing
                    .and_then(|f| row.get(f))
                    .and_then(|v| year_cell(Some(v)))
                    .or_else(|| year_cell(row.get(columns::FILING_YEAR)))
            })
            .collect();
        table.set_column(columns::FILING_YEAR, years);
    }

    if let Some(decision) = decision {
        let years: Vec<Cell> = table.iter().map(|row| year_cell(row.get(decision))).collect();
        table.set_column(columns::DISPOSAL_YEAR, years);
    }

    let judge_sources = columns::all_present(table.columns(), columns::CASE_JUDGE_SOURCES);
    if !judge_sources.is_empty() {
        let judges: Vec<Cell> = table
            .iter()
            .map(|row| {
                row.first_of(&judge_sources)
                    .map(|v| Value::Text(normalize_judge(&v.to_string())))
            })
            .collect();
        table.set_column(columns::ASSIGNED_JUDGE, judges);
    }

    debug!(rows = table.len(), columns = table.columns().len(), "cleaned cases");
    table
}

/// Clean the hearings table
pub fn clean_hearings(table: Table) -> Table {
    let mut table = normalize_columns(table);

    let judge_sources = columns::all_present(table.columns(), columns::HEARING_JUDGE_SOURCES);
    if judge_sources.is_empty() {
        warn!("no judge column in hearings; every hearing attributed to {}", columns::UNKNOWN_JUDGE);
    }

    let judges: Vec<Cell> = table
        .iter()
        .map(|row| {
            let name = row
                .first_of(&judge_sources)
                .map(|v| normalize_judge(&v.to_string()))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| columns::UNKNOWN_JUDGE.to_string());
            Some(Value::Text(name))
        })
        .collect();
    table.set_column(columns::JUDGE, judges);

    debug!(rows = table.len(), columns = table.columns().len(), "cleaned hearings");
    table
}
