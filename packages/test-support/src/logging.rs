//! Test logging initialization
//!
//! Integration tests across the workspace call [`init`] before touching the
//! database so migration and session logs show up under `TEST_LOG=info`.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

const DEFAULT_FILTER: &str = "warn,sqlx=error";

/// Initialize logging for tests. Safe to call from every test.
///
/// Filter precedence: `TEST_LOG`, then `RUST_LOG`, then `warn,sqlx=error`.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // cargo/nextest capture
            .without_time()
            .with_target(false)
            .try_init()
            .ok(); // another subscriber may already be installed
    });
}
