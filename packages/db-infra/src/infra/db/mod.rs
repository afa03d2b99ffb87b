//! Connection lifecycle, SQL script execution and migration orchestration.

pub mod core;
pub mod script;

pub use core::{connect, orchestrate_migration, orchestrate_migration_internal, with_session};
pub use script::{run_sql_script, run_sql_text};
