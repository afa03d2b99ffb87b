use std::future::Future;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use migration::{count_applied_migrations, migrate, MigrationCommand, Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlxPostgresConnector};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use tracing::{info, warn};

use crate::config::db::{DbConfig, DbKind, TlsMode, TlsSettings};
use crate::config::tls::{check_ca_cert_expiry, load_ca_cert};
use crate::error::DbInfraError;
use crate::infra::db::script::{run_sql_script, run_sql_text, ScriptReport};

/// Sanitize database URL by masking the password in connection strings.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth_part, host_part)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    let Some((scheme, credentials)) = auth_part.split_once("://") else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _password)) => format!("{scheme}://{user}:***@{host_part}"),
        None => url.to_string(),
    }
}

/// Open the single connection a tool invocation works with.
///
/// With TLS enabled the CA bundle is read before anything touches the
/// network, so a bad `DATABASE_CA_CERT` fails without attempting a query.
pub async fn connect(config: &DbConfig) -> Result<DatabaseConnection, DbInfraError> {
    let db_kind = config.kind()?;

    let ca_pem = match &config.tls {
        Some(tls) => {
            let pem = load_ca_cert(&tls.ca_cert_path).await?;
            info!(
                "tls=enabled ca_cert={} mode={:?}",
                tls.ca_cert_path.display(),
                tls.mode
            );
            check_ca_cert_expiry(&tls.ca_cert_path).await;
            Some(pem)
        }
        None => None,
    };

    info!(
        "db=connecting engine={} url={}",
        db_kind.engine(),
        sanitize_db_url(&config.url)
    );

    let conn = match db_kind {
        DbKind::Postgres => connect_postgres(config, config.tls.as_ref().zip(ca_pem)).await?,
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            if config.tls.is_some() {
                warn!("tls=ignored reason=sqlite");
            }
            connect_sqlite(config).await?
        }
    };

    info!("db=connected engine={}", db_kind.engine());
    Ok(conn)
}

async fn connect_postgres(
    config: &DbConfig,
    tls: Option<(&TlsSettings, Vec<u8>)>,
) -> Result<DatabaseConnection, DbInfraError> {
    let mut options = PgConnectOptions::from_str(&config.url).map_err(|e| {
        DbInfraError::config(format!("invalid Postgres connection string: {e}"))
    })?;

    if let Some((settings, pem)) = tls {
        let ssl_mode = match settings.mode {
            TlsMode::VerifyFull => PgSslMode::VerifyFull,
            TlsMode::VerifyCa => PgSslMode::VerifyCa,
        };
        options = options.ssl_mode(ssl_mode).ssl_root_cert_from_pem(pem);
    }

    // One short-lived process, one connection
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(|e| DbInfraError::Connect {
            message: format!("failed to connect to Postgres: {e}"),
        })?;

    Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
}

async fn connect_sqlite(config: &DbConfig) -> Result<DatabaseConnection, DbInfraError> {
    let mut opt = ConnectOptions::new(config.url.clone());
    opt.min_connections(1)
        .max_connections(1) // in-memory databases exist per connection
        .acquire_timeout(config.acquire_timeout)
        .sqlx_logging(false);

    Database::connect(opt)
        .await
        .map_err(|e| DbInfraError::Connect {
            message: format!("failed to connect to SQLite: {e}"),
        })
}

/// Run `op` on a fresh connection and always close the connection afterwards.
///
/// The connection is closed on both the success and the error path. A failure
/// to close is logged and never replaces the operation's own result.
pub async fn with_session<T, E, F, Fut>(config: &DbConfig, op: F) -> Result<T, E>
where
    E: From<DbInfraError>,
    F: FnOnce(DatabaseConnection) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let conn = connect(config).await?;
    let start = Instant::now();

    let result = op(conn.clone()).await;

    info!(
        "db=closing outcome={} elapsed_ms={}",
        if result.is_ok() { "ok" } else { "error" },
        start.elapsed().as_millis()
    );
    match conn.close().await {
        Ok(()) => info!("db=closed"),
        Err(e) => warn!(error = %e, "db=close_failed"),
    }

    result
}

/// Connect, run one migration command, verify the ledger, and disconnect.
pub async fn orchestrate_migration(
    config: &DbConfig,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    let db_kind = config.kind()?;
    info!(
        "migrate=start cmd={:?} engine={} url={}",
        command,
        db_kind.engine(),
        sanitize_db_url(&config.url)
    );

    with_session(config, |conn| async move {
        orchestrate_migration_internal(&conn, command).await
    })
    .await?;

    info!("migrate=done");
    Ok(())
}

/// Run a migration command on an open connection and check the applied count.
pub async fn orchestrate_migration_internal(
    pool: &DatabaseConnection,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    let start = Instant::now();
    let read_count = |e: DbErr| DbInfraError::Migration {
        message: format!("failed to read applied migrations: {e}"),
    };

    let applied_before = if command == MigrationCommand::Down {
        count_applied_migrations(pool).await.map_err(read_count)?
    } else {
        0
    };

    migrate(pool, command)
        .await
        .map_err(|e| DbInfraError::Migration {
            message: format!("migration execution failed: {e}"),
        })?;

    if !command.mutates() {
        return Ok(());
    }

    let expected_count = Migrator::migrations().len();
    let applied_count = count_applied_migrations(pool).await.map_err(read_count)?;

    info!(
        migrate = "counts",
        expected_count = expected_count,
        applied_count = applied_count,
        elapsed_ms = start.elapsed().as_millis()
    );

    match command {
        MigrationCommand::Reset if applied_count != 0 => Err(DbInfraError::Migration {
            message: format!(
                "Migration verification failed: reset should leave 0 migrations applied, but {applied_count} were found"
            ),
        }),
        MigrationCommand::Down if applied_count != applied_before.saturating_sub(1) => {
            Err(DbInfraError::Migration {
                message: format!(
                    "Migration verification failed: down should revert one step from {applied_before}, but {applied_count} remain applied"
                ),
            })
        }
        MigrationCommand::Up | MigrationCommand::Fresh | MigrationCommand::Refresh
            if applied_count != expected_count =>
        {
            Err(DbInfraError::Migration {
                message: format!(
                    "Migration verification failed: expected {expected_count} migrations, but {applied_count} were applied"
                ),
            })
        }
        _ => Ok(()),
    }
}

/// Connect, execute a SQL script verbatim, and disconnect.
pub async fn apply_sql_script(
    config: &DbConfig,
    path: &Path,
) -> Result<ScriptReport, DbInfraError> {
    with_session(config, |conn| async move { run_sql_script(&conn, path).await }).await
}

/// Connect, execute SQL text verbatim, and disconnect.
pub async fn apply_sql_text(
    config: &DbConfig,
    source: &str,
    sql: &str,
) -> Result<ScriptReport, DbInfraError> {
    with_session(config, |conn| async move { run_sql_text(&conn, source, sql).await }).await
}
