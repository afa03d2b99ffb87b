use accounts::{reset_credentials, AccountsError, ResetConfig, ResetOutcome};
use clap::Parser;
use db_infra::telemetry::init_cli_tracing;
use db_infra::{with_session, DbConfig};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "reset-admin-password")]
#[command(about = "Reset a portal account's password and force a change at next login")]
struct Args {
    /// Account to reset
    #[arg(long, env = "ADMIN_RESET_USERNAME", default_value = "admin")]
    username: String,

    /// New plaintext password (hashed before storage)
    #[arg(long, env = "ADMIN_RESET_PASSWORD", hide_env_values = true)]
    password: String,
}

async fn run(args: Args) -> Result<ResetOutcome, AccountsError> {
    let reset = ResetConfig::new(args.username, args.password)?;
    let config = DbConfig::from_env()?;

    info!("reset=start username={}", reset.target_username());
    with_session(&config, |conn| async move { reset_credentials(&conn, &reset).await }).await
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_cli_tracing();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 2 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };
    let username = args.username.clone();

    match run(args).await {
        Ok(ResetOutcome::Updated(user)) => {
            info!("✅ reset=complete username={}", user.username);
            // Operator confirmation, independent of RUST_LOG
            println!(
                "Password reset: username={} email={} role={} must_change_password=true",
                user.username, user.email, user.role
            );
        }
        Ok(ResetOutcome::NotFound) => {
            warn!("reset=not_found username={username}");
            println!("No account named '{username}' was found; nothing changed");
        }
        Err(e) => {
            error!("❌ reset failed: {e}");
            eprintln!("Password reset failed: {e}");
            std::process::exit(1);
        }
    }
}
