use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_CLI_FILTER: &str = "info,sqlx=warn,sea_orm=warn";

/// Human-readable status lines on stdout for the operational CLIs.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_cli_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_CLI_FILTER));

    fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_ansi(false)
        .with_env_filter(env_filter)
        .init();
}
