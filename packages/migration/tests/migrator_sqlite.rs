//! Ledgered migrations against a file-backed SQLite database.

use migration::{
    count_applied_migrations, get_latest_migration_version, migrate, ConnectionTrait,
    MigrationCommand, Migrator, MigratorTrait,
};
use sea_orm_migration::sea_orm::{DatabaseBackend, Statement};
use test_support::{logging, TempSqlite};

async fn table_exists(
    db: &migration::DatabaseConnection,
    table: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = ?",
        [table.into()],
    );
    let row = db.query_one(stmt).await?.ok_or("no row from sqlite_master")?;
    let n: i64 = row.try_get("", "n")?;
    Ok(n == 1)
}

#[tokio::test]
async fn up_applies_every_defined_migration() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let tmp = TempSqlite::new()?;
    let db = tmp.connect().await?;

    assert_eq!(count_applied_migrations(&db).await?, 0);
    assert_eq!(get_latest_migration_version(&db).await?, None);

    migrate(&db, MigrationCommand::Up).await?;

    assert_eq!(
        count_applied_migrations(&db).await?,
        Migrator::migrations().len()
    );
    assert_eq!(
        get_latest_migration_version(&db).await?.as_deref(),
        Some("m20250301_000002_create_shipments")
    );
    assert!(table_exists(&db, "users").await?);
    assert!(table_exists(&db, "shipments").await?);
    Ok(())
}

#[tokio::test]
async fn up_twice_is_a_no_op() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let tmp = TempSqlite::new()?;
    let db = tmp.connect().await?;

    migrate(&db, MigrationCommand::Up).await?;
    migrate(&db, MigrationCommand::Up).await?;

    assert_eq!(
        count_applied_migrations(&db).await?,
        Migrator::migrations().len()
    );
    Ok(())
}

#[tokio::test]
async fn reset_rolls_back_everything() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let tmp = TempSqlite::new()?;
    let db = tmp.connect_migrated().await?;

    migrate(&db, MigrationCommand::Reset).await?;

    assert_eq!(count_applied_migrations(&db).await?, 0);
    assert!(!table_exists(&db, "users").await?);
    assert!(!table_exists(&db, "shipments").await?);
    Ok(())
}

#[tokio::test]
async fn down_reverts_only_the_latest_step() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let tmp = TempSqlite::new()?;
    let db = tmp.connect_migrated().await?;

    migrate(&db, MigrationCommand::Down).await?;

    assert_eq!(count_applied_migrations(&db).await?, 1);
    assert!(table_exists(&db, "users").await?);
    assert!(!table_exists(&db, "shipments").await?);
    Ok(())
}

#[tokio::test]
async fn status_leaves_the_ledger_untouched() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let tmp = TempSqlite::new()?;
    let db = tmp.connect().await?;

    migrate(&db, MigrationCommand::Status).await?;

    assert!(!table_exists(&db, "users").await?);
    Ok(())
}

#[tokio::test]
async fn timestamps_default_when_omitted() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let tmp = TempSqlite::new()?;
    let db = tmp.connect_migrated().await?;

    db.execute_unprepared(
        "INSERT INTO users (username, email, password_hash) \
         VALUES ('dispatcher', 'dispatch@shiptrack.test', 'x');\
         INSERT INTO shipments (tracking_number, origin, destination) \
         VALUES ('SHP-0001', 'Rotterdam', 'Hamburg');",
    )
    .await?;

    for table in ["users", "shipments"] {
        let row = db
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                format!(
                    "SELECT COUNT(*) AS n FROM {table} \
                     WHERE created_at IS NOT NULL AND updated_at IS NOT NULL"
                ),
            ))
            .await?
            .ok_or("no count row")?;
        assert_eq!(row.try_get::<i64>("", "n")?, 1, "{table}");
    }
    Ok(())
}

#[tokio::test]
async fn down_twice_walks_back_one_step_at_a_time() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let tmp = TempSqlite::new()?;
    let db = tmp.connect_migrated().await?;

    migrate(&db, MigrationCommand::Down).await?;
    assert_eq!(
        get_latest_migration_version(&db).await?.as_deref(),
        Some("m20250301_000001_create_users")
    );

    migrate(&db, MigrationCommand::Down).await?;
    assert_eq!(count_applied_migrations(&db).await?, 0);
    assert!(!table_exists(&db, "users").await?);
    Ok(())
}
