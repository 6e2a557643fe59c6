//! Left join of cases to hearings
//!
//! The linking key is not fixed. Each side picks the first column present
//! from its own candidate list (see [`columns::CASE_MERGE_KEYS`] and
//! [`columns::HEARING_MERGE_KEYS`]), so tables with inconsistent naming still
//! join on the same logical key.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::core::columns::{self, first_in};
use crate::core::error::{DataError, JoinSide};
use crate::core::table::{Cell, Table, Value};

/// Suffix for case columns that collide with hearing columns
pub const CASE_SUFFIX: &str = "_case";
/// Suffix for hearing columns that collide with case columns
pub const HEARING_SUFFIX: &str = "_hear";

/// The linking-key columns chosen for a join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeKeys {
    pub cases: &'static str,
    pub hearings: &'static str,
}

impl MergeKeys {
    fn shared(&self) -> bool {
        self.cases == self.hearings
    }
}

/// Choose linking keys; first candidate present wins on each side
pub fn select_keys(cases: &Table, hearings: &Table) -> Result<MergeKeys, DataError> {
    let case_key = first_in(cases, columns::CASE_MERGE_KEYS).ok_or(DataError::NoMergeKey {
        side: JoinSide::Cases,
    })?;
    let hearing_key = first_in(hearings, columns::HEARING_MERGE_KEYS).ok_or(
        DataError::NoMergeKey {
            side: JoinSide::Hearings,
        },
    )?;
    Ok(MergeKeys {
        cases: case_key,
        hearings: hearing_key,
    })
}

fn key_of(cell: Option<&Value>) -> Option<String> {
    let key = cell?.to_string();
    let key = key.trim();
    (!key.is_empty()).then(|| key.to_string())
}

/// Left-join cleaned cases to cleaned hearings
///
/// Every case row appears at least once; a case with `n` matching hearings
/// appears `n` times, in case order then hearing order.
pub fn merge(cases: &Table, hearings: &Table) -> Result<Table, DataError> {
    let keys = select_keys(cases, hearings)?;
    info!(cases_key = keys.cases, hearings_key = keys.hearings, "merging on linking keys");

    // Hearing columns carried into the output (the shared key is kept once)
    let hearing_cols: Vec<usize> = hearings
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, name)| !(keys.shared() && name.as_str() == keys.hearings))
        .map(|(i, _)| i)
        .collect();

    let mut out_columns: Vec<String> = cases
        .columns()
        .iter()
        .map(|name| {
            let collides = hearings.has_column(name) && !(keys.shared() && name == keys.cases);
            if collides {
                format!("{}{}", name, CASE_SUFFIX)
            } else {
                name.clone()
            }
        })
        .collect();
    out_columns.extend(hearing_cols.iter().map(|&i| {
        let name = &hearings.columns()[i];
        if cases.has_column(name) {
            format!("{}{}", name, HEARING_SUFFIX)
        } else {
            name.clone()
        }
    }));

    let hearing_key_idx = hearings
        .column_index(keys.hearings)
        .ok_or(DataError::NoMergeKey {
            side: JoinSide::Hearings,
        })?;
    let mut by_key: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, row) in hearings.rows().iter().enumerate() {
        if let Some(key) = key_of(row[hearing_key_idx].as_ref()) {
            by_key.entry(key).or_default().push(i);
        }
    }

    let case_key_idx = cases.column_index(keys.cases).ok_or(DataError::NoMergeKey {
        side: JoinSide::Cases,
    })?;
    let mut merged = Table::new(out_columns);
    let mut matched = 0usize;

    for case_row in cases.rows() {
        let matches = key_of(case_row[case_key_idx].as_ref())
            .and_then(|key| by_key.get(&key))
            .filter(|m| !m.is_empty());

        match matches {
            Some(indices) => {
                matched += 1;
                for &h in indices {
                    let hearing_row = &hearings.rows()[h];
                    let mut row: Vec<Cell> = case_row.clone();
                    row.extend(hearing_cols.iter().map(|&i| hearing_row[i].clone()));
                    merged.push_row(row);
                }
            }
            None => merged.push_row(case_row.clone()),
        }
    }

    debug!(
        cases = cases.len(),
        hearings = hearings.len(),
        matched_cases = matched,
        rows = merged.len(),
        "merge complete"
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cleaner::{clean_cases, clean_hearings};
    use crate::core::loader::read_table;

    fn table(csv: &str) -> Table {
        read_table(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_select_keys_prefers_combined() {
        let cases = table("case_number,cnr_number,combined_case_number\n");
        let hearings = table("case_number,cnr_number,combinedcasenumber\n");
        let keys = select_keys(&cases, &hearings).unwrap();
        assert_eq!(keys.cases, "combined_case_number");
        assert_eq!(keys.hearings, "combinedcasenumber");
    }

    #[test]
    fn test_select_keys_cnr_over_case_number() {
        let cases = table("case_number,cnr_number\n");
        let hearings = table("cnr_number,case_number\n");
        let keys = select_keys(&cases, &hearings).unwrap();
        assert_eq!(keys.cases, "cnr_number");
        assert_eq!(keys.hearings, "cnr_number");
    }

    #[test]
    fn test_select_keys_sides_independent() {
        let cases = table("case_number,status\n");
        let hearings = table("combinedcasenumber,cnr_number\n");
        let keys = select_keys(&cases, &hearings).unwrap();
        assert_eq!(keys.cases, "case_number");
        assert_eq!(keys.hearings, "combinedcasenumber");
    }

    #[test]
    fn test_no_merge_key() {
        let cases = table("status\nPending\n");
        let hearings = table("case_number\nC1\n");
        let err = merge(&cases, &hearings).unwrap_err();
        assert!(matches!(
            err,
            DataError::NoMergeKey {
                side: JoinSide::Cases
            }
        ));

        let cases = table("case_number\nC1\n");
        let hearings = table("purpose\nx\n");
        let err = merge(&cases, &hearings).unwrap_err();
        assert!(matches!(
            err,
            DataError::NoMergeKey {
                side: JoinSide::Hearings
            }
        ));
    }

    #[test]
    fn test_left_join_row_counts() {
        let cases = table("case_number,status\nC1,Pending\nC2,Disposed\nC3,Pending\n");
        let hearings = table("case_number,purpose\nC1,Evidence\nC1,Arguments\nC2,Orders\n");
        let merged = merge(&cases, &hearings).unwrap();

        assert_eq!(merged.len(), 4);
        assert!(merged.len() >= cases.len());
        assert_eq!(merged.get(0, "purpose"), Some(&Value::Text("Evidence".into())));
        assert_eq!(merged.get(1, "purpose"), Some(&Value::Text("Arguments".into())));
        assert_eq!(merged.get(3, "case_number"), Some(&Value::Text("C3".into())));
        assert_eq!(merged.get(3, "purpose"), None);
    }

    #[test]
    fn test_shared_key_kept_once() {
        let cases = table("cnr_number,status\nX1,Pending\n");
        let hearings = table("cnr_number,status\nX1,Listed\n");
        let merged = merge(&cases, &hearings).unwrap();
        assert_eq!(
            merged.columns(),
            &["cnr_number", "status_case", "status_hear"]
        );
    }

    #[test]
    fn test_collisions_suffixed_with_distinct_keys() {
        let cases = table("combined_case_number,cnr_number\nK1,X1\n");
        let hearings = table("combinedcasenumber,cnr_number\nK1,X1\n");
        let merged = merge(&cases, &hearings).unwrap();
        assert_eq!(
            merged.columns(),
            &[
                "combined_case_number",
                "cnr_number_case",
                "combinedcasenumber",
                "cnr_number_hear"
            ]
        );
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_null_case_key_never_matches() {
        let cases = table("case_number,status\n,Pending\n");
        let hearings = table("case_number,purpose\n,Evidence\n");
        let merged = merge(&cases, &hearings).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get(0, "purpose"), None);
    }

    #[test]
    fn test_empty_cases_merge_empty() {
        let cases = table("case_number\n");
        let hearings = table("case_number\nC1\n");
        let merged = merge(&cases, &hearings).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_after_cleaning() {
        let cases = clean_cases(table(
            "Combined_Case_Number,Date_Filed,Decision_Date\nK1,2022-01-10,2022-06-10\n",
        ));
        let hearings = clean_hearings(table(
            "CombinedCaseNumber,BeforeHonourableJudges\nK1,ramesh kumar\n",
        ));
        let merged = merge(&cases, &hearings).unwrap();
        assert_eq!(merged.get(0, "judge"), Some(&Value::Text("RAMESH KUMAR".into())));
        assert_eq!(merged.get(0, "disposal_days"), Some(&Value::Int(151)));
    }
}
