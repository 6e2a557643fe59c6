//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    advocate::AdvocateArgs, analytics::AnalyticsArgs, auth::AuthCommands,
    completions::CompletionsArgs, init::InitArgs, judge::JudgeArgs, status::StatusArgs,
};

#[derive(Parser)]
#[command(name = "nyd")]
#[command(author, version, about = "Nyayadrishti judicial case-management dashboard")]
#[command(long_about = "Loads court case and hearing records, cleans and joins them, and renders role-gated views for judges and advocates.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose (debug) logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Workspace root (default: auto-detect by finding .nyd/)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new workspace
    Init(InitArgs),

    /// Register, log in, or reset a password
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Judge dashboard (case management, alerts, hearings, charts)
    Judge(JudgeArgs),

    /// Advocate workspace (portfolio, case search, notes, reminders)
    #[command(alias = "lawyer")]
    Advocate(AdvocateArgs),

    /// Court-wide analytics (funnel, disposal trend, judge workload)
    Analytics(AnalyticsArgs),

    /// Quick statistics across all cases
    Status(StatusArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
