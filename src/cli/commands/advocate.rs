//! `nyd advocate` command - advocate workspace
//!
//! Case search, notes and reminders, restricted to cases where the advocate
//! appears for the petitioner or respondent.

use chrono::Local;
use clap::Subcommand;
use miette::{bail, Result};
use std::collections::BTreeSet;

use crate::cli::commands::auth::{sign_in, Credentials};
use crate::cli::helpers::{parse_day, success};
use crate::cli::GlobalOpts;
use crate::core::columns::{self, first_in};
use crate::core::{PortfolioView, Role, Table, Value};

const PORTFOLIO_COLUMNS: &[&str] = &[
    "cnr_number",
    "case_number",
    "current_status",
    "petitioneradvocate",
    "petitioner_advocate",
    "respondentadvocate",
    "respondent_advocate",
    "nexthearingdate",
    "next_hearing_date",
];

const DETAIL_COLUMNS: &[&str] = &[
    "cnr_number",
    "case_number",
    "current_status",
    "filing_date",
    "date_filed",
    "decision_date",
    "petitioneradvocate",
    "petitioner_advocate",
    "respondentadvocate",
    "respondent_advocate",
    "nexthearingdate",
    "next_hearing_date",
    "purposeofhearing",
    "judge",
];

#[derive(clap::Args, Debug)]
pub struct AdvocateArgs {
    #[command(flatten)]
    pub credentials: Credentials,

    #[command(subcommand)]
    pub view: AdvocateView,
}

#[derive(Subcommand, Debug)]
pub enum AdvocateView {
    /// List cases in the portfolio
    Portfolio,

    /// Show one case with its note and reminder
    Case {
        /// CNR number
        cnr: String,
    },

    /// Save a note on a case, replacing any previous note
    Note {
        /// CNR number
        cnr: String,
        /// Note text
        text: String,
    },

    /// Set a reminder date on a case
    Remind {
        /// CNR number
        cnr: String,
        /// Reminder date (YYYY-MM-DD)
        date: String,
    },

    /// List reminders for cases in the portfolio
    Reminders,
}

pub fn run(args: AdvocateArgs, global: &GlobalOpts) -> Result<()> {
    let (ctx, view) = sign_in(global, Role::Advocate, &args.credentials)?;
    let state = ctx.workspace.state();
    let mut report = ctx.report(global);

    match args.view {
        AdvocateView::Portfolio => {
            report.section("portfolio", &format!("Cases for {}", view.identity()));
            report.table(view.table(), PORTFOLIO_COLUMNS, "case row")?;
        }
        AdvocateView::Case { cnr } => {
            let rows = view.find_by_cnr(&cnr)?;
            if rows.is_empty() {
                bail!("No case with CNR '{}' in your portfolio.", cnr.trim());
            }
            let cnr = cnr.trim();
            report.section("case", &format!("Case {}", cnr));
            report.table(&rows, DETAIL_COLUMNS, "row")?;

            let note = state.load_notes().remove(cnr);
            let reminder = state.load_reminders().remove(cnr);
            report.section("annotations", "Note and reminder");
            report.fields(&[
                ("note", "Note", note.map_or(serde_json::Value::Null, Into::into)),
                (
                    "reminder",
                    "Reminder",
                    reminder.map_or(serde_json::Value::Null, |d| d.to_string().into()),
                ),
            ]);
        }
        AdvocateView::Note { cnr, text } => {
            let cnr = owned_cnr(&view, &cnr)?;
            let mut notes = state.load_notes();
            notes.insert(cnr.clone(), text);
            state.save_notes(&notes)?;
            success(global, format!("Note saved for {}", cnr));
        }
        AdvocateView::Remind { cnr, date } => {
            let cnr = owned_cnr(&view, &cnr)?;
            let day = parse_day(&date)?;
            let mut reminders = state.load_reminders();
            reminders.insert(cnr.clone(), day);
            state.save_reminders(&reminders)?;
            success(global, format!("Reminder set for {} on {}", cnr, day));
        }
        AdvocateView::Reminders => {
            let owned = portfolio_cnrs(&view);
            let notes = state.load_notes();
            let today = Local::now().date_naive();

            let mut reminders: Vec<_> = state
                .load_reminders()
                .into_iter()
                .filter(|(cnr, _)| owned.contains(cnr))
                .collect();
            reminders.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

            let rows = reminders
                .into_iter()
                .map(|(cnr, day)| {
                    let status = if day < today {
                        "overdue"
                    } else if day == today {
                        "today"
                    } else {
                        "upcoming"
                    };
                    vec![
                        Some(Value::Date(day)),
                        Some(Value::Text(status.to_string())),
                        Some(Value::Text(cnr.clone())),
                        notes.get(&cnr).cloned().map(Value::Text),
                    ]
                })
                .collect();
            let table = Table::from_rows(
                vec![
                    "reminder_date".to_string(),
                    "due".to_string(),
                    "cnr_number".to_string(),
                    "note".to_string(),
                ],
                rows,
            );
            report.section("reminders", "Reminders");
            report.table(&table, &["reminder_date", "due", "cnr_number", "note"], "reminder")?;
        }
    }

    report.finish()
}

/// Distinct CNR numbers in the portfolio
fn portfolio_cnrs(view: &PortfolioView) -> BTreeSet<String> {
    let Some(column) = first_in(view.table(), columns::CNR) else {
        return BTreeSet::new();
    };
    view.table()
        .iter()
        .filter_map(|row| row.get(column).map(Value::to_string))
        .collect()
}

/// Trimmed CNR, refused unless it belongs to the portfolio
fn owned_cnr(view: &PortfolioView, cnr: &str) -> Result<String> {
    let cnr = cnr.trim();
    if view.find_by_cnr(cnr)?.is_empty() {
        bail!("No case with CNR '{}' in your portfolio.", cnr);
    }
    Ok(cnr.to_string())
}
