//! `nyd analytics` command - court-wide analytics

use clap::ValueEnum;
use miette::Result;
use serde_json::json;

use crate::cli::helpers::{show, Context};
use crate::cli::GlobalOpts;
use crate::core::analytics::{self, Bin, TrendPoint};
use crate::core::{Table, Value};

/// Default number of histogram bins
const DEFAULT_BINS: u16 = 20;

#[derive(clap::Args, Debug)]
pub struct AnalyticsArgs {
    /// Restrict to cases filed in this year (repeatable)
    #[arg(long = "year")]
    pub years: Vec<i64>,

    /// Show only one section
    #[arg(long, value_enum)]
    pub section: Option<Section>,

    /// Number of bins in the disposal-time histogram
    #[arg(
        long,
        default_value_t = DEFAULT_BINS,
        value_parser = clap::value_parser!(u16).range(1..=analytics::MAX_HISTOGRAM_BINS as i64)
    )]
    pub bins: u16,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    /// Case counts per stage
    Funnel,
    /// Mean disposal days per filing year
    Trend,
    /// Hearings per judge
    Workload,
    /// Distribution of disposal days
    Histogram,
}

pub fn run(args: AnalyticsArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::load(global)?;
    let mut report = ctx.report(global);
    let wants = |s: Section| args.section.map_or(true, |only| only == s);

    let cases = analytics::filter_years(&ctx.dataset.cases, &args.years);
    let view = analytics::filter_years(ctx.dataset.view(), &args.years);

    if args.section.is_none() {
        let years = analytics::filing_years(&ctx.dataset.cases).unwrap_or_default();
        let selected = if args.years.is_empty() {
            "all".to_string()
        } else {
            args.years
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        report.section("overview", "Analytics");
        report.fields(&[
            ("cases", "Cases", json!(cases.len())),
            ("selected_years", "Selected years", json!(selected)),
            (
                "available_years",
                "Available years",
                json!(years.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")),
            ),
        ]);
    }

    if wants(Section::Funnel) {
        report.section("funnel", "Case stage funnel");
        show(&mut report, analytics::stage_funnel(&view), |r, c| {
            r.counts(&c, "stage", "stage")
        })?;
    }

    if wants(Section::Trend) {
        report.section("trend", "Mean disposal days by filing year");
        show(&mut report, analytics::disposal_trend(&cases), |r, points| {
            r.table(&trend_table(&points), TREND_COLUMNS, "year")
        })?;
    }

    if wants(Section::Workload) {
        report.section("workload", "Hearings per judge");
        if ctx.dataset.hearings.is_empty() {
            report.notice("No hearing data available.");
        } else {
            let hearings = if args.years.is_empty() {
                &ctx.dataset.hearings
            } else if ctx.dataset.has_hearings() {
                &view
            } else {
                report.notice("Hearings cannot be linked to filing years; workload covers all years.");
                &ctx.dataset.hearings
            };
            show(&mut report, analytics::judge_workload(hearings), |r, c| {
                r.counts(&c, "judge", "judge")
            })?;
        }
    }

    if wants(Section::Histogram) {
        report.section("histogram", "Disposal time distribution (days)");
        show(&mut report, analytics::disposal_histogram(&cases, usize::from(args.bins)), |r, bins| {
            r.table(&histogram_table(&bins), HISTOGRAM_COLUMNS, "bin")
        })?;
    }

    report.finish()
}

const TREND_COLUMNS: &[&str] = &["filing_year", "mean_disposal_days", "cases"];
const HISTOGRAM_COLUMNS: &[&str] = &["from_days", "to_days", "count"];

fn trend_table(points: &[TrendPoint]) -> Table {
    Table::from_rows(
        TREND_COLUMNS.iter().map(|c| c.to_string()).collect(),
        points
            .iter()
            .map(|p| {
                vec![
                    Some(Value::Int(p.filing_year)),
                    Some(Value::Text(format!("{:.1}", p.mean_disposal_days))),
                    Some(Value::Int(p.cases as i64)),
                ]
            })
            .collect(),
    )
}

fn histogram_table(bins: &[Bin]) -> Table {
    Table::from_rows(
        HISTOGRAM_COLUMNS.iter().map(|c| c.to_string()).collect(),
        bins.iter()
            .map(|b| {
                vec![
                    Some(Value::Text(format!("{:.0}", b.start))),
                    Some(Value::Text(format!("{:.0}", b.end))),
                    Some(Value::Int(b.count as i64)),
                ]
            })
            .collect(),
    )
}
