//! Workspace discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::store::StateFiles;

/// Name of the state/config directory marking a workspace root
pub const STATE_DIR: &str = ".nyd";

/// A directory holding source data and `.nyd/` state
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Root directory of the workspace (parent of .nyd/)
    root: PathBuf,
}

impl Workspace {
    /// Find the workspace root by walking up from the current directory
    pub fn discover() -> Result<Self, WorkspaceError> {
        let current =
            std::env::current_dir().map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the workspace root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, WorkspaceError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        loop {
            if current.join(STATE_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(WorkspaceError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Use an explicit root, or discover one from the current directory
    pub fn locate(explicit: Option<&Path>) -> Result<Self, WorkspaceError> {
        match explicit {
            Some(path) => Self::discover_from(path),
            None => Self::discover(),
        }
    }

    /// Create a new workspace at the given path
    pub fn init(path: &Path, force: bool) -> Result<Self, WorkspaceError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let state_dir = root.join(STATE_DIR);
        if state_dir.exists() && !force {
            return Err(WorkspaceError::AlreadyExists(root));
        }

        std::fs::create_dir_all(&state_dir).map_err(|e| WorkspaceError::IoError(e.to_string()))?;
        std::fs::create_dir_all(root.join("data"))
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        let config_path = state_dir.join("config.yaml");
        std::fs::write(&config_path, Self::default_config())
            .map_err(|e| WorkspaceError::IoError(e.to_string()))?;

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# Nyayadrishti workspace configuration

# Cases source, relative to the workspace root
# cases_file: data/cases.csv

# Hearings source, relative to the workspace root
# hearings_file: data/hearings.csv

# Age in days past which a case is flagged
# aging_days: 365

# Default output format (auto, tsv, csv, json, md)
# default_format: auto
"#
    }

    /// Get the workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .nyd state directory
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.state_dir().join("config.yaml")
    }

    /// Persisted credential, note and reminder files
    pub fn state(&self) -> StateFiles {
        StateFiles::new(self.state_dir())
    }

    /// Resolve a configured path against the workspace root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Errors that can occur locating or creating a workspace
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("not a Nyayadrishti workspace (searched from {searched_from:?}). Run 'nyd init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("workspace already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
