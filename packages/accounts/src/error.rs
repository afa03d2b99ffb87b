use db_infra::DbInfraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountsError {
    #[error("Validation error: {detail}")]
    Validation { detail: String },
    #[error("Password hashing failed: {detail}")]
    Hash { detail: String },
    #[error("Database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Infra(#[from] DbInfraError),
}

impl AccountsError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation {
            detail: detail.into(),
        }
    }

    pub fn hash(detail: impl std::fmt::Display) -> Self {
        Self::Hash {
            detail: detail.to_string(),
        }
    }
}
