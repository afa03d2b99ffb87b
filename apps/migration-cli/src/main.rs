use std::path::PathBuf;

use clap::{Parser, Subcommand};
use db_infra::telemetry::init_cli_tracing;
use db_infra::{apply_sql_script, apply_sql_text, orchestrate_migration, DbConfig, DbInfraError};
use migration::{MigrationCommand, SCHEMA_SQL, SCHEMA_SQL_SOURCE};
use tracing::{error, info};

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Apply all pending migrations (default)
    Up,
    /// Roll back the most recent migration
    Down,
    /// Drop everything, then apply all migrations
    Fresh,
    /// Roll back all applied migrations
    Reset,
    /// Roll back all, then apply all
    Refresh,
    /// Show applied and pending migrations
    Status,
    /// Execute a SQL script verbatim, without touching the migration ledger
    ApplySql {
        /// Script to run (defaults to the schema.sql built into this binary)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Parser)]
#[command(name = "migration")]
#[command(about = "Shipment tracking database migration tool")]
#[command(
    after_help = "Connection: DATABASE_URL, DATABASE_SSL=true, DATABASE_CA_CERT=<path>, DATABASE_SSL_MODE"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

enum Job {
    Ledger(MigrationCommand),
    Script(Option<PathBuf>),
}

fn job_for(command: Command) -> Job {
    match command {
        Command::Up => Job::Ledger(MigrationCommand::Up),
        Command::Down => Job::Ledger(MigrationCommand::Down),
        Command::Fresh => Job::Ledger(MigrationCommand::Fresh),
        Command::Reset => Job::Ledger(MigrationCommand::Reset),
        Command::Refresh => Job::Ledger(MigrationCommand::Refresh),
        Command::Status => Job::Ledger(MigrationCommand::Status),
        Command::ApplySql { file } => Job::Script(file),
    }
}

async fn run(job: Job) -> Result<(), DbInfraError> {
    let config = DbConfig::from_env()?;

    match job {
        Job::Ledger(command) => orchestrate_migration(&config, command).await,
        Job::Script(file) => {
            let report = match file {
                Some(path) => apply_sql_script(&config, &path).await?,
                None => apply_sql_text(&config, SCHEMA_SQL_SOURCE, SCHEMA_SQL).await?,
            };
            if report.executed {
                info!(
                    "✅ schema script applied source={} bytes={}",
                    report.source, report.bytes
                );
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_cli_tracing();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version land here too
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let job = job_for(args.command.unwrap_or(Command::Up));

    if let Err(e) = run(job).await {
        error!("❌ migration failed: {e}");
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
