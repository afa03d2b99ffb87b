use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::entities::users;
use crate::error::AccountsError;
use crate::password::hash_password_blocking;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Which account to reset and what its new password is.
#[derive(Clone)]
pub struct ResetConfig {
    target_username: String,
    new_password: String,
}

// Never print the password
impl std::fmt::Debug for ResetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetConfig")
            .field("target_username", &self.target_username)
            .field("new_password", &"<redacted>")
            .finish()
    }
}

impl ResetConfig {
    pub fn new(
        target_username: impl Into<String>,
        new_password: impl Into<String>,
    ) -> Result<Self, AccountsError> {
        let target_username = target_username.into().trim().to_string();
        let new_password = new_password.into();

        if target_username.is_empty() {
            return Err(AccountsError::validation("target username must not be empty"));
        }
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountsError::validation(format!(
                "new password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        Ok(Self {
            target_username,
            new_password,
        })
    }

    pub fn target_username(&self) -> &str {
        &self.target_username
    }
}

/// Account details echoed back to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<users::Model> for UserSummary {
    fn from(model: users::Model) -> Self {
        Self {
            username: model.username,
            email: model.email,
            role: model.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    Updated(UserSummary),
    NotFound,
}

/// Overwrite one account's password hash and force a change at next login.
///
/// A missing account is reported as [`ResetOutcome::NotFound`], not an error,
/// and leaves the table untouched.
pub async fn reset_credentials(
    db: &DatabaseConnection,
    config: &ResetConfig,
) -> Result<ResetOutcome, AccountsError> {
    let Some(user) = users::Entity::find()
        .filter(users::Column::Username.eq(config.target_username()))
        .one(db)
        .await?
    else {
        warn!("reset=not_found username={}", config.target_username());
        return Ok(ResetOutcome::NotFound);
    };

    let new_hash = hash_password_blocking(config.new_password.clone()).await?;

    let mut active: users::ActiveModel = user.into();
    active.password_hash = Set(new_hash);
    active.must_change_password = Set(true);
    active.updated_at = Set(OffsetDateTime::now_utc());
    let updated = active.update(db).await?;

    info!(
        "reset=updated username={} must_change_password={}",
        updated.username, updated.must_change_password
    );
    Ok(ResetOutcome::Updated(updated.into()))
}
