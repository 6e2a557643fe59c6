//! Aggregate statistics over case, hearing and portfolio tables
//!
//! Each function needing a particular column returns
//! [`DataError::ColumnAbsent`] when it is missing, so a caller can disable
//! one section without abandoning the rest.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::columns::{self, first_in};
use crate::core::error::DataError;
use crate::core::table::{Table, Value};

/// Default age, in days, past which a case counts as old
pub const DEFAULT_AGING_DAYS: i64 = 365;

/// Upper bound on histogram bins
pub const MAX_HISTOGRAM_BINS: usize = 1000;

/// Headline counts for the landing view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_cases: usize,
    pub civil_cases: usize,
    pub criminal_cases: usize,
    pub older_than_threshold: usize,
    pub threshold_days: i64,
}

/// A label with a count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count {
    pub label: String,
    pub count: usize,
}

/// Mean disposal time for one filing year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub filing_year: i64,
    pub mean_disposal_days: f64,
    pub cases: usize,
}

/// One histogram bin, `[start, end)` except the last which is closed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

fn require(table: &Table, column: &'static str) -> Result<usize, DataError> {
    table
        .column_index(column)
        .ok_or_else(|| DataError::column_absent(column))
}

fn require_any(table: &Table, candidates: &[&'static str]) -> Result<&'static str, DataError> {
    first_in(table, candidates).ok_or_else(|| DataError::column_absent(candidates[0]))
}

/// Sort counts descending by count, then by label
fn ranked(counts: HashMap<String, usize>) -> Vec<Count> {
    let mut out: Vec<Count> = counts
        .into_iter()
        .map(|(label, count)| Count { label, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    out
}

/// Headline counts; cases missing `disposal_days` count as not old
pub fn summary(cases: &Table, threshold_days: i64) -> Summary {
    let older = cases
        .column_index(columns::DISPOSAL_DAYS)
        .map(|idx| {
            cases
                .cells(idx)
                .filter_map(|v| v.and_then(Value::as_int))
                .filter(|&d| d > threshold_days)
                .count()
        })
        .unwrap_or(0);

    Summary {
        total_cases: cases.len(),
        civil_cases: cases.len(),
        criminal_cases: 0,
        older_than_threshold: older,
        threshold_days,
    }
}

/// Distinct filing years, ascending
pub fn filing_years(table: &Table) -> Result<Vec<i64>, DataError> {
    let idx = require(table, columns::FILING_YEAR)?;
    let years: BTreeSet<i64> = table
        .cells(idx)
        .filter_map(|v| v.and_then(Value::as_int))
        .collect();
    Ok(years.into_iter().collect())
}

/// Rows whose filing year is in `years`; an empty selection keeps everything
pub fn filter_years(table: &Table, years: &[i64]) -> Table {
    if years.is_empty() || !table.has_column(columns::FILING_YEAR) {
        return table.clone();
    }
    table.filter(|row| {
        row.get(columns::FILING_YEAR)
            .and_then(Value::as_int)
            .is_some_and(|y| years.contains(&y))
    })
}

/// Case counts per stage, largest first
pub fn stage_funnel(table: &Table) -> Result<Vec<Count>, DataError> {
    let idx = require(table, columns::STAGE)?;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in table.cells(idx).flatten() {
        *counts.entry(value.to_string()).or_default() += 1;
    }
    Ok(ranked(counts))
}

/// Mean disposal days per filing year, ascending by year
pub fn disposal_trend(cases: &Table) -> Result<Vec<TrendPoint>, DataError> {
    let year_idx = require(cases, columns::FILING_YEAR)?;
    let days_idx = require(cases, columns::DISPOSAL_DAYS)?;

    let mut groups: BTreeMap<i64, (i64, usize)> = BTreeMap::new();
    for row in cases.iter() {
        let (Some(year), Some(days)) = (
            row.at(year_idx).and_then(Value::as_int),
            row.at(days_idx).and_then(Value::as_int),
        ) else {
            continue;
        };
        let entry = groups.entry(year).or_insert((0, 0));
        entry.0 += days;
        entry.1 += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(filing_year, (sum, n))| TrendPoint {
            filing_year,
            mean_disposal_days: sum as f64 / n as f64,
            cases: n,
        })
        .collect())
}

/// Hearings per resolved judge, busiest first
pub fn judge_workload(hearings: &Table) -> Result<Vec<Count>, DataError> {
    let column = require_any(hearings, &[columns::JUDGE, "judge_hear"])?;
    let idx = require(hearings, column)?;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in hearings.cells(idx).flatten() {
        *counts.entry(value.to_string()).or_default() += 1;
    }
    Ok(ranked(counts))
}

/// Equal-width histogram of disposal days
///
/// `bins` is clamped to `1..=MAX_HISTOGRAM_BINS`.
pub fn disposal_histogram(cases: &Table, bins: usize) -> Result<Vec<Bin>, DataError> {
    let idx = require(cases, columns::DISPOSAL_DAYS)?;
    let values: Vec<i64> = cases
        .cells(idx)
        .filter_map(|v| v.and_then(Value::as_int))
        .collect();

    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return Ok(Vec::new());
    };
    let bins = bins.clamp(1, MAX_HISTOGRAM_BINS);
    let (min, max) = (min as f64, max as f64);
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };

    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for v in values {
        let slot = (((v as f64 - min) / width) as usize).min(bins - 1);
        out[slot].count += 1;
    }
    Ok(out)
}

/// Cases per status, grouped case-insensitively
///
/// Each group is labelled with the first spelling seen.
pub fn status_distribution(table: &Table) -> Result<Vec<Count>, DataError> {
    let column = require_any(table, columns::STATUS)?;
    let idx = require(table, column)?;

    let mut labels: HashMap<String, String> = HashMap::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in table.cells(idx).flatten() {
        let text = value.to_string();
        let key = text.to_lowercase();
        labels.entry(key.clone()).or_insert(text);
        *counts.entry(key).or_default() += 1;
    }

    Ok(ranked(
        counts
            .into_iter()
            .map(|(key, n)| (labels.remove(&key).unwrap_or(key), n))
            .collect(),
    ))
}

/// Disposed cases per disposal year, ascending
pub fn disposal_by_year(table: &Table) -> Result<Vec<Count>, DataError> {
    let idx = require(table, columns::DISPOSAL_YEAR)?;
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for year in table.cells(idx).filter_map(|v| v.and_then(Value::as_int)) {
        *counts.entry(year).or_default() += 1;
    }
    Ok(counts
        .into_iter()
        .map(|(year, count)| Count {
            label: year.to_string(),
            count,
        })
        .collect())
}

/// Rows filed more than `threshold_days` before `today`, with an `age_days` column
pub fn aging(table: &Table, today: NaiveDate, threshold_days: i64) -> Result<Table, DataError> {
    let filing = require_any(table, columns::FILING_DATE)?;
    let ages: Vec<Option<i64>> = table
        .iter()
        .map(|row| {
            row.get(filing)
                .and_then(Value::as_date)
                .map(|d| (today - d).num_days())
        })
        .collect();

    let indices: Vec<usize> = ages
        .iter()
        .enumerate()
        .filter(|(_, age)| age.is_some_and(|a| a > threshold_days))
        .map(|(i, _)| i)
        .collect();

    let mut out = table.select_rows(&indices);
    out.set_column(
        "age_days",
        indices.iter().map(|&i| ages[i].map(Value::Int)).collect(),
    );
    Ok(out)
}

fn is_disposed(status: &Value) -> bool {
    status.to_string().trim().eq_ignore_ascii_case("disposed")
}

/// Rows whose status is not "disposed" (case-insensitive)
pub fn pending(table: &Table) -> Result<Table, DataError> {
    let column = require_any(table, columns::STATUS)?;
    Ok(table.filter(|row| !row.get(column).is_some_and(is_disposed)))
}

/// Rows whose status equals any of `statuses`, ignoring case
pub fn filter_status(table: &Table, statuses: &[String]) -> Result<Table, DataError> {
    let column = require_any(table, columns::STATUS)?;
    if statuses.is_empty() {
        return Ok(table.clone());
    }
    Ok(table.filter(|row| {
        row.get(column).is_some_and(|v| {
            let v = v.to_string();
            statuses.iter().any(|s| s.trim().eq_ignore_ascii_case(v.trim()))
        })
    }))
}

fn next_hearing_filter<F: Fn(NaiveDate) -> bool>(table: &Table, keep: F) -> Result<Table, DataError> {
    let column = require_any(table, columns::NEXT_HEARING)?;
    Ok(table.filter(|row| row.get(column).and_then(Value::as_date).is_some_and(&keep)))
}

/// Rows whose next hearing falls on `day`
pub fn hearings_on(table: &Table, day: NaiveDate) -> Result<Table, DataError> {
    next_hearing_filter(table, |d| d == day)
}

/// Rows whose next hearing falls after `day`
pub fn hearings_after(table: &Table, day: NaiveDate) -> Result<Table, DataError> {
    next_hearing_filter(table, |d| d > day)
}

/// Rows with a previous-hearing date, i.e. rescheduled hearings
pub fn rescheduled(table: &Table) -> Result<Table, DataError> {
    let column = require_any(table, columns::PREVIOUS_HEARING)?;
    Ok(table.filter(|row| row.get(column).is_some()))
}
