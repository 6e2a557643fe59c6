//! In-memory tables of nullable typed cells
//!
//! Every stage of the pipeline (load, clean, merge, resolve) consumes a
//! [`Table`] and produces a new one. Tables are never mutated in place across
//! stages; each stage clones what it keeps.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// A single typed cell value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Text(String),
    Int(i64),
    Date(NaiveDate),
}

impl Value {
    /// Text content, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) => serializer.serialize_str(s),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
        }
    }
}

/// A nullable cell
pub type Cell = Option<Value>;

/// Build a text cell, mapping blank input to null
pub fn text_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Value::Text(trimmed.to_string()))
    }
}

/// Named columns over rows of cells
///
/// Every row has exactly `columns().len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from columns and rows, padding or truncating ragged rows
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Index of the first column with this exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a row, padding with nulls or truncating to the table width
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    /// Cell value at a row for a named column
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    /// Iterate the cells of one column by index
    pub fn cells(&self, idx: usize) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.rows.iter().map(move |row| row.get(idx).and_then(Option::as_ref))
    }

    /// Replace the named column's cells, or append it as a new column
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) {
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(None);
                }
                self.columns.len() - 1
            }
        };
        for (row, value) in self.rows.iter_mut().zip(values) {
            row[idx] = value;
        }
    }

    /// Rename every column through `f`
    pub fn rename_columns<F: Fn(&str) -> String>(&mut self, f: F) {
        for column in &mut self.columns {
            *column = f(column.as_str());
        }
    }

    /// Apply `f` to every cell of one column
    pub fn map_column<F: Fn(Cell) -> Cell>(&mut self, idx: usize, f: F) {
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(idx) {
                *cell = f(cell.take());
            }
        }
    }

    /// New table with the same columns and only the rows at `indices`
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// New table with the rows for which `keep` returns true
    pub fn filter<F: FnMut(Row<'_>) -> bool>(&self, mut keep: F) -> Table {
        let indices: Vec<usize> = self
            .iter()
            .enumerate()
            .filter(|(_, row)| keep(*row))
            .map(|(i, _)| i)
            .collect();
        self.select_rows(&indices)
    }

    /// Iterate rows with name-based access
    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row {
            columns: &self.columns,
            cells,
        })
    }
}

/// Borrowed view of one row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    /// Value of the named column, if present and non-null
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.at(idx)
    }

    /// Value at a column index, if non-null
    pub fn at(&self, idx: usize) -> Option<&'a Value> {
        self.cells.get(idx).and_then(Option::as_ref)
    }

    /// First non-null value among the named columns
    pub fn first_of(&self, columns: &[&str]) -> Option<&'a Value> {
        columns.iter().find_map(|c| self.get(c))
    }

    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }
}
