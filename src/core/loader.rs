//! Source table loading
//!
//! Reads the cases and hearings CSV files into raw [`Table`]s. Headers are
//! kept exactly as written; normalization belongs to the cleaner.

use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::error::DataError;
use crate::core::table::{text_cell, Table};

/// Locations of the two source files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub cases: PathBuf,
    pub hearings: PathBuf,
}

impl Sources {
    pub fn new(cases: impl Into<PathBuf>, hearings: impl Into<PathBuf>) -> Self {
        Self {
            cases: cases.into(),
            hearings: hearings.into(),
        }
    }

    /// Load both tables; either one missing is fatal
    pub fn load(&self) -> Result<(Table, Table), DataError> {
        load(&self.cases, &self.hearings)
    }
}

/// Load the cases and hearings tables
pub fn load(cases_path: &Path, hearings_path: &Path) -> Result<(Table, Table), DataError> {
    let cases = load_table(cases_path)?;
    let hearings = load_table(hearings_path)?;
    Ok((cases, hearings))
}

/// Load a single CSV file with a header row
pub fn load_table(path: &Path) -> Result<Table, DataError> {
    let missing = |reason: String| DataError::SourceMissing {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| missing(e.to_string()))?;
    let table = read_table(BufReader::new(file)).map_err(|e| missing(e.to_string()))?;

    if table.columns().is_empty() {
        return Err(missing("no header row".to_string()));
    }

    debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "loaded source table"
    );
    Ok(table)
}

/// Parse CSV from any reader; ragged rows are padded or truncated
pub fn read_table<R: Read>(reader: R) -> Result<Table, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(headers);

    for result in rdr.records() {
        let record = result?;
        table.push_row(record.iter().map(text_cell).collect());
    }

    Ok(table)
}
