//! Error taxonomy for the data pipeline and state store

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Which side of the join failed to yield a linking key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSide {
    Cases,
    Hearings,
}

impl std::fmt::Display for JoinSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinSide::Cases => write!(f, "cases"),
            JoinSide::Hearings => write!(f, "hearings"),
        }
    }
}

/// Errors raised while loading, cleaning or merging source tables
///
/// Only `SourceMissing` is fatal. The others are absorbed by the caller and
/// turn into disabled sections.
#[derive(Debug, Error, Diagnostic)]
pub enum DataError {
    #[error("source file {path:?} could not be read: {reason}")]
    #[diagnostic(
        code(nyd::data::source_missing),
        help("check `cases_file` / `hearings_file` in .nyd/config.yaml")
    )]
    SourceMissing { path: PathBuf, reason: String },

    #[error("column '{column}' not found in data")]
    #[diagnostic(code(nyd::data::column_absent))]
    ColumnAbsent { column: String },

    #[error("no linking key column found in {side} table")]
    #[diagnostic(
        code(nyd::data::no_merge_key),
        help("hearing views are disabled; only case data is available")
    )]
    NoMergeKey { side: JoinSide },
}

impl DataError {
    pub fn column_absent(column: impl Into<String>) -> Self {
        DataError::ColumnAbsent {
            column: column.into(),
        }
    }
}

/// Errors writing persisted state files
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("failed to write {path:?}: {source}")]
    #[diagnostic(code(nyd::store::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {path:?}: {source}")]
    #[diagnostic(code(nyd::store::encode))]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors resolving a portfolio, distinct from an empty result
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum PortfolioError {
    #[error("session is not authenticated")]
    #[diagnostic(code(nyd::portfolio::unauthenticated), help("log in first"))]
    NotAuthenticated,

    #[error("data has no {field} column")]
    #[diagnostic(code(nyd::portfolio::column_absent))]
    ColumnAbsent { field: &'static str },
}
