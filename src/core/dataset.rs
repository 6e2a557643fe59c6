//! Load, clean and merge in one step

use tracing::{info, warn};

use crate::core::cleaner::{clean_cases, clean_hearings};
use crate::core::error::DataError;
use crate::core::loader::Sources;
use crate::core::merger::merge;
use crate::core::table::Table;

/// Cleaned tables for one invocation
///
/// Rebuilt from the source files every time; nothing is cached across runs.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub cases: Table,
    pub hearings: Table,
    /// `None` when no linking key exists; hearing views are then disabled
    pub merged: Option<Table>,
    /// Degradations absorbed while building, for display
    pub notices: Vec<String>,
}

impl Dataset {
    /// Run load -> clean -> merge; only a missing source is fatal
    pub fn load(sources: &Sources) -> Result<Self, DataError> {
        let (cases, hearings) = sources.load()?;
        Ok(Self::build(cases, hearings))
    }

    /// Clean and merge already-loaded raw tables
    pub fn build(cases: Table, hearings: Table) -> Self {
        let cases = clean_cases(cases);
        let hearings = clean_hearings(hearings);
        let mut notices = Vec::new();

        let merged = match merge(&cases, &hearings) {
            Ok(merged) => Some(merged),
            Err(e) => {
                warn!(error = %e, "merge disabled; falling back to cases only");
                notices.push(format!("{}; hearing views are disabled", e));
                None
            }
        };

        info!(
            cases = cases.len(),
            hearings = hearings.len(),
            merged = merged.as_ref().map_or(0, Table::len),
            "dataset ready"
        );

        Self {
            cases,
            hearings,
            merged,
            notices,
        }
    }

    /// The table role views resolve against: merged if available, else cases
    pub fn view(&self) -> &Table {
        self.merged.as_ref().unwrap_or(&self.cases)
    }

    pub fn has_hearings(&self) -> bool {
        self.merged.is_some()
    }
}
