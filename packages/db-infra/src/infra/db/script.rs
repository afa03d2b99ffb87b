use std::path::Path;
use std::time::Instant;

use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::{info, warn};

use crate::error::DbInfraError;

/// What a verbatim script run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptReport {
    /// File path, or a label for embedded text
    pub source: String,
    pub bytes: usize,
    pub executed: bool,
}

/// Read a SQL file and send it to the database as one unprepared unit.
pub async fn run_sql_script(
    db: &DatabaseConnection,
    path: &Path,
) -> Result<ScriptReport, DbInfraError> {
    info!("script=reading path={}", path.display());
    let sql = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DbInfraError::ScriptRead {
            path: path.to_path_buf(),
            source,
        })?;
    info!("script=read bytes={}", sql.len());

    run_sql_text(db, &path.display().to_string(), &sql).await
}

/// Send SQL text to the database as one unprepared unit.
///
/// The text is not validated or split. Atomicity is whatever the driver gives
/// a multi-statement simple query; idempotence comes only from the SQL itself.
pub async fn run_sql_text(
    db: &DatabaseConnection,
    source: &str,
    sql: &str,
) -> Result<ScriptReport, DbInfraError> {
    if sql.trim().is_empty() {
        warn!("script=skipped reason=empty source={source}");
        return Ok(ScriptReport {
            source: source.to_string(),
            bytes: 0,
            executed: false,
        });
    }

    let start = Instant::now();
    db.execute_unprepared(sql)
        .await
        .map_err(|e| DbInfraError::Execute {
            message: format!("{source}: {e}"),
        })?;

    info!(
        "script=executed source={source} bytes={} elapsed_ms={}",
        sql.len(),
        start.elapsed().as_millis()
    );
    Ok(ScriptReport {
        source: source.to_string(),
        bytes: sql.len(),
        executed: true,
    })
}
