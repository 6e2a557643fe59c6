//! Shared helper functions for CLI commands

use chrono::NaiveDate;
use clap::ValueEnum;
use console::style;
use miette::{miette, Result};

use crate::cli::output::Report;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::cleaner::parse_date;
use crate::core::{Config, DataError, Dataset, Workspace};

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a green check status line unless quiet
pub fn success(global: &GlobalOpts, message: impl std::fmt::Display) {
    if !global.quiet {
        println!("{} {}", style("✓").green(), message);
    }
}

/// Locate the workspace honoring `--workspace`
pub fn workspace(global: &GlobalOpts) -> Result<Workspace> {
    Workspace::locate(global.workspace.as_deref()).map_err(|e| miette!("{}", e))
}

/// Pick the output format: an explicit flag wins over `default_format`
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    config
        .default_format
        .as_deref()
        .and_then(|f| OutputFormat::from_str(f, true).ok())
        .unwrap_or(OutputFormat::Auto)
}

/// Everything a data command needs for one invocation
pub struct Context {
    pub workspace: Workspace,
    pub config: Config,
    pub dataset: Dataset,
}

impl Context {
    /// Discover the workspace, layer config and run the pipeline
    pub fn load(global: &GlobalOpts) -> Result<Self> {
        let workspace = workspace(global)?;
        let config = Config::load(Some(&workspace));
        let sources = config.sources(&workspace);
        let dataset = Dataset::load(&sources)?;
        Ok(Self {
            workspace,
            config,
            dataset,
        })
    }

    /// A report in the effective format, with pipeline notices already shown
    pub fn report(&self, global: &GlobalOpts) -> Report {
        let mut report = Report::new(output_format(global, &self.config), global.quiet);
        for notice in &self.dataset.notices {
            report.notice(notice);
        }
        report
    }
}

/// Parse a user-supplied day in any accepted source format
pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    parse_date(raw).ok_or_else(|| miette!("Invalid date '{}'. Use YYYY-MM-DD.", raw))
}

/// Render a section, or a notice when its columns are absent
pub fn show<T>(
    report: &mut Report,
    result: Result<T, DataError>,
    render: impl FnOnce(&mut Report, T) -> Result<()>,
) -> Result<()> {
    match result {
        Ok(value) => render(report, value),
        Err(e @ DataError::ColumnAbsent { .. }) => {
            report.notice(format!("section unavailable: {}", e));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(format: OutputFormat) -> GlobalOpts {
        GlobalOpts {
            format,
            quiet: false,
            verbose: false,
            workspace: None,
        }
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a very long advocate name", 10), "a very ...");
        assert_eq!(truncate_str("न्यायदृष्टि न्याय", 8), "न्याय...");
    }

    #[test]
    fn test_output_format_flag_wins() {
        let config = Config {
            default_format: Some("csv".to_string()),
            ..Config::default()
        };
        assert_eq!(output_format(&opts(OutputFormat::Json), &config), OutputFormat::Json);
        assert_eq!(output_format(&opts(OutputFormat::Auto), &config), OutputFormat::Csv);
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("2024-03-01").ok(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(parse_day("01/03/2024").ok(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(parse_day("tomorrow").is_err());
    }

    #[test]
    fn test_output_format_ignores_unknown_default() {
        let config = Config {
            default_format: Some("yaml".to_string()),
            ..Config::default()
        };
        assert_eq!(output_format(&opts(OutputFormat::Auto), &config), OutputFormat::Auto);
    }
}
