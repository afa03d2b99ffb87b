use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbInfraError {
    #[error("Configuration error: {message}")]
    Config { message: String },
    #[error("failed to read CA certificate '{}': {source}", path.display())]
    CaCertRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Connection error: {message}")]
    Connect { message: String },
    #[error("failed to read SQL script '{}': {source}", path.display())]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Query execution failed: {message}")]
    Execute { message: String },
    #[error("Migration error: {message}")]
    Migration { message: String },
}

impl DbInfraError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
