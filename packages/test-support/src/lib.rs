//! Shared test utilities
//!
//! Unified logging initialization, unique test data, and throwaway SQLite
//! databases for integration tests across the workspace.

pub mod logging;
pub mod sqlite;
pub mod unique_helpers;

pub use sqlite::TempSqlite;
pub use unique_helpers::{unique_email, unique_str};
