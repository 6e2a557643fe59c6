//! Column-name candidate lists
//!
//! The two source tables name the same logical fields inconsistently, so
//! every lookup of such a field goes through an ordered candidate list.
//! The first candidate that exists wins; later candidates are never
//! considered "better" matches.

use crate::core::table::Table;

/// Linking-key candidates on the cases side
pub const CASE_MERGE_KEYS: &[&str] = &["combined_case_number", "cnr_number", "case_number"];

/// Linking-key candidates on the hearings side
pub const HEARING_MERGE_KEYS: &[&str] = &["combinedcasenumber", "cnr_number", "case_number"];

/// Presiding-judge source columns on hearings, highest priority first
pub const HEARING_JUDGE_SOURCES: &[&str] = &[
    "beforehonourablejudges",
    "before_honourable_judges",
    "before_hon_judge",
    "njdg_judge_name",
];

/// Assigned-judge source columns on cases
pub const CASE_JUDGE_SOURCES: &[&str] = &["njdg_judge_name", "judge_name"];

pub const FILING_DATE: &[&str] = &["filing_date", "date_filed", "date_of_filing"];
pub const DECISION_DATE: &[&str] = &["decision_date", "date_of_decision", "disposal_date"];

pub const PETITIONER_ADVOCATE: &[&str] = &[
    "petitioneradvocate",
    "petitioner_advocate",
    "petitioneradvocate_case",
    "petitioner_advocate_case",
];
pub const RESPONDENT_ADVOCATE: &[&str] = &[
    "respondentadvocate",
    "respondent_advocate",
    "respondentadvocate_case",
    "respondent_advocate_case",
];

/// Resolved judge columns in merged or cases-only tables
pub const RESOLVED_JUDGE: &[&str] = &["judge", "judge_hear", "assigned_judge", "assigned_judge_case"];

pub const CNR: &[&str] = &["cnr_number", "cnr_number_case"];
pub const CASE_NUMBER: &[&str] = &["case_number", "case_number_case"];
pub const STATUS: &[&str] = &["current_status", "current_status_case"];
pub const NEXT_HEARING: &[&str] = &["nexthearingdate", "next_hearing_date"];
pub const PREVIOUS_HEARING: &[&str] = &["previoushearing", "previous_hearing_date"];

/// Columns whose names do not contain "date" but hold dates
pub const EXTRA_DATE_COLUMNS: &[&str] = &["previoushearing", "nexthearing", "appearancedate"];

// Derived columns
pub const DISPOSAL_DAYS: &str = "disposal_days";
pub const FILING_YEAR: &str = "filing_year";
pub const DISPOSAL_YEAR: &str = "disposal_year";
pub const ASSIGNED_JUDGE: &str = "assigned_judge";
pub const JUDGE: &str = "judge";
pub const STAGE: &str = "remappedstages";

/// Sentinel judge name when no source column carries one
pub const UNKNOWN_JUDGE: &str = "UNKNOWN";

/// Return the first candidate present in `columns`
pub fn first_present<'a, S: AsRef<str>>(columns: &[S], candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|candidate| columns.iter().any(|c| c.as_ref() == *candidate))
}

/// Return the first candidate present in the table
pub fn first_in(table: &Table, candidates: &[&'static str]) -> Option<&'static str> {
    first_present(table.columns(), candidates)
}

/// Candidates present in `columns`, in priority order
pub fn all_present<'a, S: AsRef<str>>(columns: &[S], candidates: &[&'a str]) -> Vec<&'a str> {
    candidates
        .iter()
        .copied()
        .filter(|candidate| columns.iter().any(|c| c.as_ref() == *candidate))
        .collect()
}
