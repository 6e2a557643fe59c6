//! Nyayadrishti: judicial case-management reporting
//!
//! Loads court case and hearing records, cleans and joins them, and
//! resolves role-gated portfolios for judges and advocates.

pub mod cli;
pub mod core;
pub mod logging;
