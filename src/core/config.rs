//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::core::analytics::DEFAULT_AGING_DAYS;
use crate::core::loader::Sources;
use crate::core::workspace::Workspace;

const DEFAULT_CASES_FILE: &str = "data/cases.csv";
const DEFAULT_HEARINGS_FILE: &str = "data/hearings.csv";

/// Workspace configuration with layered hierarchy
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Cases CSV, relative to the workspace root unless absolute
    pub cases_file: Option<PathBuf>,

    /// Hearings CSV, relative to the workspace root unless absolute
    pub hearings_file: Option<PathBuf>,

    /// Age in days past which a case is flagged as old
    pub aging_days: Option<i64>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(workspace: Option<&Workspace>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/nyd/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::load_from_path(&global_path) {
                config.merge(global);
            }
        }

        // 3. Workspace config (.nyd/config.yaml)
        if let Some(ws) = workspace {
            if let Some(local) = Self::load_from_path(&ws.config_path()) {
                config.merge(local);
            }
        }

        // 4. Environment variables
        if let Ok(path) = std::env::var("NYD_CASES_FILE") {
            config.cases_file = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("NYD_HEARINGS_FILE") {
            config.hearings_file = Some(PathBuf::from(path));
        }
        if let Ok(days) = std::env::var("NYD_AGING_DAYS") {
            match days.parse() {
                Ok(days) => config.aging_days = Some(days),
                Err(_) => warn!(value = %days, "ignoring non-numeric NYD_AGING_DAYS"),
            }
        }

        config
    }

    /// Parse one config file; absent or malformed files are skipped
    pub fn load_from_path(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        // A freshly initialized config is all comments
        let blank = contents
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#'));
        if blank {
            return Some(Config::default());
        }
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "nyd")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.cases_file.is_some() {
            self.cases_file = other.cases_file;
        }
        if other.hearings_file.is_some() {
            self.hearings_file = other.hearings_file;
        }
        if other.aging_days.is_some() {
            self.aging_days = other.aging_days;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Source file locations resolved against the workspace root
    pub fn sources(&self, workspace: &Workspace) -> Sources {
        let cases = self
            .cases_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CASES_FILE));
        let hearings = self
            .hearings_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HEARINGS_FILE));
        Sources::new(workspace.resolve(&cases), workspace.resolve(&hearings))
    }

    /// Aging threshold in days
    pub fn aging_days(&self) -> i64 {
        self.aging_days.unwrap_or(DEFAULT_AGING_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            cases_file: Some("a.csv".into()),
            aging_days: Some(100),
            ..Default::default()
        };
        base.merge(Config {
            cases_file: Some("b.csv".into()),
            ..Default::default()
        });
        assert_eq!(base.cases_file, Some(PathBuf::from("b.csv")));
        assert_eq!(base.aging_days(), 100);
    }

    #[test]
    fn test_defaults() {
        let tmp = tempdir().unwrap();
        let ws = Workspace::init(tmp.path(), false).unwrap();
        let config = Config::default();
        let sources = config.sources(&ws);
        assert_eq!(sources.cases, ws.root().join("data/cases.csv"));
        assert_eq!(sources.hearings, ws.root().join("data/hearings.csv"));
        assert_eq!(config.aging_days(), 365);
    }

    #[test]
    fn test_load_from_workspace_file() {
        let tmp = tempdir().unwrap();
        let ws = Workspace::init(tmp.path(), false).unwrap();
        std::fs::write(
            ws.config_path(),
            "cases_file: raw/ISDMHack_Cases_students.csv\naging_days: 180\n",
        )
        .unwrap();

        let config = Config::load_from_path(&ws.config_path()).unwrap();
        assert_eq!(config.aging_days(), 180);
        assert_eq!(
            config.sources(&ws).cases,
            ws.root().join("raw/ISDMHack_Cases_students.csv")
        );
    }

    #[test]
    fn test_default_template_parses() {
        let tmp = tempdir().unwrap();
        let ws = Workspace::init(tmp.path(), false).unwrap();
        // The generated template is all comments
        let config = Config::load_from_path(&ws.config_path()).unwrap_or_default();
        assert_eq!(config, Config::default());
    }
}
