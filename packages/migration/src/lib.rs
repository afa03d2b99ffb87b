pub use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DatabaseBackend, Statement};
pub use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseConnection};

mod m20250301_000001_create_users; // keep filename + module name in sync
mod m20250301_000002_create_shipments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_shipments::Migration),
        ]
    }
}

/// Schema script shipped with this package, compiled into the binary.
///
/// `migration apply-sql` runs it verbatim when no `--file` is given.
pub const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");

/// Label used for [`SCHEMA_SQL`] in logs and reports.
pub const SCHEMA_SQL_SOURCE: &str = "embedded schema.sql";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl MigrationCommand {
    /// Whether the command can change the applied-migrations record.
    pub fn mutates(self) -> bool {
        !matches!(self, MigrationCommand::Status)
    }
}

/// Run a migration command against an already-open connection.
///
/// `Down` reverts exactly one step; `Reset` reverts all of them.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let before = ledger_snapshot(db).await?;
    tracing::info!(
        "ledger=before cmd={command:?} engine={} database={} defined={} applied={}",
        before.engine,
        before.database,
        before.defined,
        before.applied
    );

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, Some(1)).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    if let Err(e) = result {
        tracing::error!("ledger=failed cmd={command:?} engine={}: {e}", before.engine);
        return Err(e);
    }

    if command.mutates() {
        let after = ledger_snapshot(db).await?;
        tracing::info!(
            "ledger=after cmd={command:?} defined={} applied={}",
            after.defined,
            after.applied
        );
    }
    tracing::info!("✅ {command:?} complete engine={}", before.engine);
    Ok(())
}

struct LedgerSnapshot {
    engine: &'static str,
    database: String,
    defined: usize,
    applied: usize,
}

async fn ledger_snapshot(db: &DatabaseConnection) -> Result<LedgerSnapshot, DbErr> {
    let backend = db.get_database_backend();
    let (engine, sql) = match backend {
        DatabaseBackend::Postgres => ("postgresql", "SELECT current_database() AS name"),
        DatabaseBackend::Sqlite => (
            "sqlite",
            "SELECT file AS name FROM pragma_database_list WHERE name = 'main'",
        ),
        _ => ("other", ""),
    };

    let database = if sql.is_empty() {
        "<unsupported>".to_string()
    } else {
        match db.query_one(Statement::from_string(backend, sql)).await? {
            Some(row) => match row.try_get::<String>("", "name") {
                Ok(name) if name.is_empty() => ":memory:".to_string(),
                Ok(name) => name,
                Err(_) => "<unknown>".to_string(),
            },
            None => "<unknown>".to_string(),
        }
    };

    Ok(LedgerSnapshot {
        engine,
        database,
        defined: Migrator::migrations().len(),
        applied: count_applied_migrations(db).await.unwrap_or(0),
    })
}

/// Count the migrations recorded as applied.
/// Returns 0 if the migration table doesn't exist yet.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0), // Migration table doesn't exist yet
        Err(e) => Err(e),
    }
}

/// Name of the latest applied migration, if any.
pub async fn get_latest_migration_version(
    db: &DatabaseConnection,
) -> Result<Option<String>, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.last().map(|m| m.name().to_string())),
        Err(DbErr::Exec(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
