//! CLI command implementations

pub mod advocate;
pub mod analytics;
pub mod auth;
pub mod completions;
pub mod init;
pub mod judge;
pub mod status;
