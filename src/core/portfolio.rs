//! Role-based portfolio resolution
//!
//! A portfolio is the subset of rows one judge or advocate may see. Judges
//! match their normalized name exactly; advocates match as a
//! case-insensitive substring because source data carries titles and
//! suffixes around advocate names.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::columns::{self, all_present, first_in};
use crate::core::error::PortfolioError;
use crate::core::table::{Row, Table};

/// Dashboard roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Judge,
    #[value(alias = "lawyer")]
    Advocate,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Judge => write!(f, "Judge"),
            Role::Advocate => write!(f, "Advocate"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "judge" => Ok(Role::Judge),
            "advocate" | "lawyer" | "advocate (lawyer)" => Ok(Role::Advocate),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl Role {
    /// Canonical form of an identity for this role
    ///
    /// Judges are keyed trimmed-uppercase, advocates trimmed-lowercase.
    pub fn normalize_identity(&self, identity: &str) -> String {
        match self {
            Role::Judge => identity.trim().to_uppercase(),
            Role::Advocate => identity.trim().to_lowercase(),
        }
    }
}

/// The three session fields the resolver consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub role: Role,
    pub identity: String,
}

impl Session {
    pub fn new(authenticated: bool, role: Role, identity: impl Into<String>) -> Self {
        Self {
            authenticated,
            role,
            identity: identity.into(),
        }
    }

    /// Resolve this session's portfolio; unauthenticated sessions see nothing
    pub fn portfolio(&self, table: &Table) -> Result<PortfolioView, PortfolioError> {
        if !self.authenticated {
            return Err(PortfolioError::NotAuthenticated);
        }
        resolve(table, &self.identity, self.role)
    }
}

/// Rows visible to one identity
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioView {
    role: Role,
    identity: String,
    table: Table,
}

impl PortfolioView {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when the identity has no authorized cases
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Rows in this portfolio for one CNR number
    pub fn find_by_cnr(&self, cnr: &str) -> Result<Table, PortfolioError> {
        let column = first_in(&self.table, columns::CNR)
            .ok_or(PortfolioError::ColumnAbsent { field: "cnr_number" })?;
        let cnr = cnr.trim();
        Ok(self
            .table
            .filter(|row| row.get(column).is_some_and(|v| v.to_string() == cnr)))
    }
}

/// Filter `table` to the rows `identity` may see in `role`
pub fn resolve(table: &Table, identity: &str, role: Role) -> Result<PortfolioView, PortfolioError> {
    let filtered = match role {
        Role::Judge => resolve_judge(table, identity)?,
        Role::Advocate => resolve_advocate(table, identity)?,
    };
    debug!(%role, identity, rows = filtered.len(), "resolved portfolio");
    Ok(PortfolioView {
        role,
        identity: identity.trim().to_string(),
        table: filtered,
    })
}

/// Resolved judge name for a row, skipping the unknown sentinel
pub fn row_judge(row: &Row<'_>, judge_columns: &[&str]) -> Option<String> {
    judge_columns
        .iter()
        .filter_map(|c| row.get(c))
        .map(|v| v.to_string().trim().to_uppercase())
        .find(|name| !name.is_empty() && name != columns::UNKNOWN_JUDGE)
}

fn resolve_judge(table: &Table, identity: &str) -> Result<Table, PortfolioError> {
    let judge_columns = all_present(table.columns(), columns::RESOLVED_JUDGE);
    if judge_columns.is_empty() {
        return Err(PortfolioError::ColumnAbsent { field: "judge" });
    }

    let wanted = Role::Judge.normalize_identity(identity);
    if wanted.is_empty() || wanted == columns::UNKNOWN_JUDGE {
        return Ok(table.filter(|_| false));
    }

    Ok(table.filter(|row| row_judge(&row, &judge_columns).as_deref() == Some(wanted.as_str())))
}

fn resolve_advocate(table: &Table, identity: &str) -> Result<Table, PortfolioError> {
    let advocate_columns: Vec<&str> = [
        first_in(table, columns::PETITIONER_ADVOCATE),
        first_in(table, columns::RESPONDENT_ADVOCATE),
    ]
    .into_iter()
    .flatten()
    .collect();
    if advocate_columns.is_empty() {
        return Err(PortfolioError::ColumnAbsent { field: "advocate" });
    }

    let needle = identity.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(table.filter(|_| false));
    }

    Ok(table.filter(|row| {
        advocate_columns.iter().any(|c| {
            row.get(c)
                .is_some_and(|v| v.to_string().to_lowercase().contains(&needle))
        })
    }))
}
