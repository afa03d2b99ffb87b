//! File-backed SQLite databases that live as long as the returned handle.
//!
//! In-memory SQLite gives every pooled connection its own database, so tests
//! that open more than one connection (or spawn a binary) need a real file.

use std::path::{Path, PathBuf};

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tempfile::TempDir;

pub struct TempSqlite {
    // Held for its Drop: removes the directory and database file
    _dir: TempDir,
    path: PathBuf,
}

impl TempSqlite {
    /// Create an empty database file in a fresh temporary directory.
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("shiptrack-db-").tempdir()?;
        let path = dir.path().join("test.db");
        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Connection string that creates the file on first connect.
    pub fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path.display())
    }

    /// Open a single-connection pool on the database.
    pub async fn connect(&self) -> Result<DatabaseConnection, DbErr> {
        let mut opt = ConnectOptions::new(self.url());
        opt.min_connections(1)
            .max_connections(1)
            .sqlx_logging(false);
        Database::connect(opt).await
    }

    /// Open a connection with every ledgered migration applied.
    pub async fn connect_migrated(&self) -> Result<DatabaseConnection, DbErr> {
        let db = self.connect().await?;
        Migrator::up(&db, None).await?;
        Ok(db)
    }
}
