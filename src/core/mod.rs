//! Core module - data pipeline, portfolio resolution and state

pub mod analytics;
pub mod cleaner;
pub mod columns;
pub mod config;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod merger;
pub mod portfolio;
pub mod store;
pub mod table;
pub mod workspace;

pub use config::Config;
pub use dataset::Dataset;
pub use error::{DataError, JoinSide, PortfolioError, StoreError};
pub use loader::Sources;
pub use portfolio::{resolve, PortfolioView, Role, Session};
pub use store::{CredentialStore, JsonCredentialStore, StateFiles};
pub use table::{Cell, Row, Table, Value};
pub use workspace::{Workspace, WorkspaceError};
