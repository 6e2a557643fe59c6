//! Rendering of tables and statistics in the selected output format
//!
//! Commands push sections into a [`Report`]. Text formats print as they go;
//! JSON is accumulated into one object and printed by [`Report::finish`] so
//! the output stays a single document.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde_json::{Map, Value as JsonValue};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;
use crate::core::analytics::Count;
use crate::core::table::{Table, Value};

/// Widest a text cell is allowed to grow in the aligned layout
const MAX_CELL_WIDTH: usize = 40;

/// Resolve requested columns against a table that may carry merge suffixes
///
/// Each name is tried as-is, then with `_case`, then with `_hear`. Names with
/// no match are skipped; if nothing matches, every column is shown.
pub fn visible_columns(table: &Table, wanted: &[&str]) -> Vec<(String, usize)> {
    let picked: Vec<(String, usize)> = wanted
        .iter()
        .filter_map(|name| {
            [name.to_string(), format!("{}_case", name), format!("{}_hear", name)]
                .into_iter()
                .find_map(|c| table.column_index(&c))
                .map(|idx| (name.to_string(), idx))
        })
        .collect();

    if picked.is_empty() {
        table
            .columns()
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect()
    } else {
        picked
    }
}

fn display(cell: Option<&Value>) -> String {
    cell.map(Value::to_string).unwrap_or_default()
}

/// Turn counts into a two-column table
pub fn counts_table(counts: &[Count], label: &str) -> Table {
    Table::from_rows(
        vec![label.to_string(), "count".to_string()],
        counts
            .iter()
            .map(|c| {
                vec![
                    Some(Value::Text(c.label.clone())),
                    Some(Value::Int(c.count as i64)),
                ]
            })
            .collect(),
    )
}

pub struct Report {
    format: OutputFormat,
    quiet: bool,
    section: Option<String>,
    json: Map<String, JsonValue>,
}

impl Report {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self {
            format,
            quiet,
            section: None,
            json: Map::new(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Start a titled section
    pub fn section(&mut self, key: &str, title: &str) {
        self.section = Some(key.to_string());
        match self.format {
            OutputFormat::Auto => {
                println!();
                println!("{}", style(title).bold().underlined());
            }
            OutputFormat::Md => {
                println!();
                println!("## {}", title);
                println!();
            }
            _ => {}
        }
    }

    fn json_key(&self, fallback: &str) -> String {
        self.section.clone().unwrap_or_else(|| fallback.to_string())
    }

    /// Print a warning that a section or feature is unavailable
    pub fn notice(&mut self, message: impl std::fmt::Display) {
        if !self.quiet {
            eprintln!("{} {}", style("!").yellow(), message);
        }
        if self.format == OutputFormat::Json {
            let notices = self
                .json
                .entry("notices")
                .or_insert_with(|| JsonValue::Array(Vec::new()));
            if let JsonValue::Array(items) = notices {
                items.push(JsonValue::String(message.to_string()));
            }
        }
    }

    /// Labelled scalar values, e.g. headline statistics
    pub fn fields(&mut self, fields: &[(&str, &str, JsonValue)]) {
        match self.format {
            OutputFormat::Json => {
                let object: Map<String, JsonValue> = fields
                    .iter()
                    .map(|(key, _, value)| (key.to_string(), value.clone()))
                    .collect();
                let key = self.json_key("summary");
                self.json.insert(key, JsonValue::Object(object));
            }
            OutputFormat::Auto => {
                let width = fields.iter().map(|(_, label, _)| label.len()).max().unwrap_or(0);
                for (_, label, value) in fields {
                    println!(
                        "  {:<width$}  {}",
                        label,
                        style(plain(value)).cyan(),
                        width = width
                    );
                }
            }
            OutputFormat::Md => {
                let mut builder = Builder::default();
                builder.push_record(["Metric", "Value"]);
                for (_, label, value) in fields {
                    builder.push_record([label.to_string(), plain(value)]);
                }
                println!("{}", builder.build().with(Style::markdown()).to_string());
            }
            OutputFormat::Tsv => {
                for (key, _, value) in fields {
                    println!("{}\t{}", key, plain(value));
                }
            }
            OutputFormat::Csv => {
                for (key, _, value) in fields {
                    println!("{},{}", key, plain(value));
                }
            }
        }
    }

    /// Print `columns` of `table`; `noun` names one row in the summary line
    pub fn table(&mut self, table: &Table, columns: &[&str], noun: &str) -> Result<()> {
        let visible = visible_columns(table, columns);
        match self.format {
            OutputFormat::Auto => self.aligned(table, &visible, noun),
            OutputFormat::Md => {
                let mut builder = Builder::default();
                builder.push_record(visible.iter().map(|(name, _)| name.clone()));
                for row in table.iter() {
                    builder.push_record(
                        visible
                            .iter()
                            .map(|(_, idx)| display(row.at(*idx)).replace('|', "\\|")),
                    );
                }
                println!("{}", builder.build().with(Style::markdown()).to_string());
            }
            OutputFormat::Tsv => {
                println!(
                    "{}",
                    visible.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>().join("\t")
                );
                for row in table.iter() {
                    let values: Vec<String> = visible
                        .iter()
                        .map(|(_, idx)| display(row.at(*idx)).replace('\t', " "))
                        .collect();
                    println!("{}", values.join("\t"));
                }
            }
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(std::io::stdout());
                writer
                    .write_record(visible.iter().map(|(n, _)| n.as_str()))
                    .into_diagnostic()?;
                for row in table.iter() {
                    writer
                        .write_record(visible.iter().map(|(_, idx)| display(row.at(*idx))))
                        .into_diagnostic()?;
                }
                writer.flush().into_diagnostic()?;
            }
            OutputFormat::Json => {
                let records: Vec<JsonValue> = table
                    .iter()
                    .map(|row| {
                        let object: Map<String, JsonValue> = visible
                            .iter()
                            .map(|(name, idx)| {
                                let value = serde_json::to_value(row.at(*idx))
                                    .unwrap_or(JsonValue::Null);
                                (name.clone(), value)
                            })
                            .collect();
                        JsonValue::Object(object)
                    })
                    .collect();
                let key = self.json_key(noun);
                self.json.insert(key, JsonValue::Array(records));
            }
        }
        Ok(())
    }

    pub fn counts(&mut self, counts: &[Count], label: &str, noun: &str) -> Result<()> {
        let table = counts_table(counts, label);
        self.table(&table, &[label, "count"], noun)
    }

    fn aligned(&self, table: &Table, visible: &[(String, usize)], noun: &str) {
        let rendered: Vec<Vec<String>> = table
            .iter()
            .map(|row| {
                visible
                    .iter()
                    .map(|(_, idx)| match row.at(*idx) {
                        Some(v) => truncate_str(&v.to_string(), MAX_CELL_WIDTH),
                        None => "-".to_string(),
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = visible
            .iter()
            .enumerate()
            .map(|(i, (name, _))| {
                rendered
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = visible
            .iter()
            .zip(&widths)
            .map(|((name, _), w)| format!("{:<width$}", style(name.to_uppercase()).bold(), width = w))
            .collect();
        println!("{}", header.join("  "));
        let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        println!("{}", "-".repeat(total));

        for row in &rendered {
            let parts: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(value, w)| format!("{:<width$}", value, width = w))
                .collect();
            println!("{}", parts.join("  ").trim_end());
        }

        if !self.quiet {
            println!();
            println!("{} {}(s) found.", style(table.len()).cyan(), noun);
        }
    }

    /// Flush accumulated JSON; text formats have already printed
    pub fn finish(self) -> Result<()> {
        if self.format == OutputFormat::Json && !self.json.is_empty() {
            let document = if self.json.len() == 1 && self.section.is_none() {
                self.json.into_iter().next().map(|(_, v)| v).unwrap_or(JsonValue::Null)
            } else {
                JsonValue::Object(self.json)
            };
            println!("{}", serde_json::to_string_pretty(&document).into_diagnostic()?);
        }
        Ok(())
    }
}

fn plain(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => "-".to_string(),
        other => other.to_string(),
    }
}
