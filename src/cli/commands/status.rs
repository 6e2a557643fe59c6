//! `nyd status` command - court-wide quick statistics

use miette::Result;
use serde_json::json;

use crate::cli::helpers::{show, Context};
use crate::cli::GlobalOpts;
use crate::core::analytics;

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Also show the case status breakdown
    #[arg(long)]
    pub detailed: bool,
}

pub fn run(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = Context::load(global)?;
    let mut report = ctx.report(global);
    let summary = analytics::summary(&ctx.dataset.cases, ctx.config.aging_days());

    let aged_label = format!("Disposed after > {} days", summary.threshold_days);

    report.section("summary", "Quick Stats");
    report.fields(&[
        ("total_cases", "Total cases", json!(summary.total_cases)),
        ("civil_cases", "Civil cases", json!(summary.civil_cases)),
        ("criminal_cases", "Criminal cases", json!(summary.criminal_cases)),
        (
            "older_than_threshold",
            aged_label.as_str(),
            json!(summary.older_than_threshold),
        ),
        ("hearings", "Hearings", json!(ctx.dataset.hearings.len())),
    ]);

    if args.detailed {
        report.section("status_distribution", "Case status distribution");
        show(&mut report, analytics::status_distribution(&ctx.dataset.cases), |r, c| {
            r.counts(&c, "status", "status")
        })?;
    }

    report.finish()
}
