//! `nyd judge` command - judge dashboard
//!
//! Every view is scoped to the signed-in judge's portfolio.

use chrono::Local;
use clap::Subcommand;
use miette::Result;

use crate::cli::commands::auth::{sign_in, Credentials};
use crate::cli::helpers::{parse_day, show};
use crate::cli::GlobalOpts;
use crate::core::analytics;
use crate::core::Role;

/// Columns shown in case listings
const CASE_COLUMNS: &[&str] = &[
    "case_number",
    "cnr_number",
    "current_status",
    "date_filed",
    "filing_date",
    "decision_date",
    "nature_of_disposal",
    "disposal_days",
];

/// Columns shown in hearing listings
const HEARING_COLUMNS: &[&str] = &[
    "cnr_number",
    "case_number",
    "hearingdate",
    "nexthearingdate",
    "next_hearing_date",
    "previoushearing",
    "purposeofhearing",
    "purpose_of_hearing",
    "judge",
];

#[derive(clap::Args, Debug)]
pub struct JudgeArgs {
    #[command(flatten)]
    pub credentials: Credentials,

    #[command(subcommand)]
    pub view: JudgeView,
}

#[derive(Subcommand, Debug)]
pub enum JudgeView {
    /// List cases in the portfolio
    Cases {
        /// Only show cases with this status (repeatable, case-insensitive)
        #[arg(long)]
        status: Vec<String>,
    },

    /// Old cases and pending cases
    Alerts,

    /// Today's, upcoming and rescheduled hearings
    Hearings {
        /// Day to treat as today (default: the current date)
        #[arg(long)]
        on: Option<String>,
    },

    /// Disposals per year and status distribution
    Charts,
}

pub fn run(args: JudgeArgs, global: &GlobalOpts) -> Result<()> {
    let (ctx, view) = sign_in(global, Role::Judge, &args.credentials)?;
    let mut report = ctx.report(global);
    let cases = view.table();

    match args.view {
        JudgeView::Cases { status } => {
            report.section("cases", &format!("Cases for {}", view.identity()));
            match analytics::filter_status(cases, &status) {
                Ok(filtered) => report.table(&filtered, CASE_COLUMNS, "case row")?,
                Err(e) if status.is_empty() => {
                    report.notice(format!("status filter unavailable: {}", e));
                    report.table(cases, CASE_COLUMNS, "case row")?;
                }
                Err(e) => return Err(e.into()),
            }
        }
        JudgeView::Alerts => {
            let today = Local::now().date_naive();
            let threshold = ctx.config.aging_days();

            report.section("aging", &format!("Cases older than {} days", threshold));
            show(&mut report, analytics::aging(cases, today, threshold), |r, t| {
                let mut columns = CASE_COLUMNS.to_vec();
                columns.push("age_days");
                r.table(&t, &columns, "case row")
            })?;

            report.section("pending", "Pending cases");
            show(&mut report, analytics::pending(cases), |r, t| {
                r.table(&t, CASE_COLUMNS, "case row")
            })?;
        }
        JudgeView::Hearings { on } => {
            let today = match on {
                Some(raw) => parse_day(&raw)?,
                None => Local::now().date_naive(),
            };
            if !ctx.dataset.has_hearings() {
                report.notice("No hearing data available.");
                return report.finish();
            }

            report.section("today", &format!("Hearings on {}", today));
            show(&mut report, analytics::hearings_on(cases, today), |r, t| {
                r.table(&t, HEARING_COLUMNS, "hearing")
            })?;

            report.section("upcoming", "Upcoming hearings");
            show(&mut report, analytics::hearings_after(cases, today), |r, t| {
                r.table(&t, HEARING_COLUMNS, "hearing")
            })?;

            report.section("rescheduled", "Rescheduled hearings");
            show(&mut report, analytics::rescheduled(cases), |r, t| {
                r.table(&t, HEARING_COLUMNS, "hearing")
            })?;
        }
        JudgeView::Charts => {
            report.section("disposals_by_year", "Cases disposed per year");
            show(&mut report, analytics::disposal_by_year(cases), |r, c| {
                r.counts(&c, "disposal_year", "year")
            })?;

            report.section("status_distribution", "Case status distribution");
            show(&mut report, analytics::status_distribution(cases), |r, c| {
                r.counts(&c, "status", "status")
            })?;
        }
    }

    report.finish()
}
