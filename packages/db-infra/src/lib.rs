//! Shared database configuration, sessions and migration execution.
//! Used by the migration CLI and the admin credential tooling.

pub mod config;
pub mod error;
pub mod infra;
pub mod telemetry;

pub use config::db::{DbConfig, DbKind, TlsMode, TlsSettings};
pub use error::DbInfraError;
pub use infra::db::core::{
    apply_sql_script, apply_sql_text, connect, orchestrate_migration, orchestrate_migration_internal,
    sanitize_db_url, with_session,
};
pub use infra::db::script::{run_sql_script, run_sql_text, ScriptReport};
