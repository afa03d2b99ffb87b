//! Portal user accounts: the `users` entity, password hashing, and the
//! operator-facing credential reset.

pub mod entities;
pub mod error;
pub mod password;
pub mod reset;

pub use error::AccountsError;
pub use password::{hash_password, verify_password};
pub use reset::{reset_credentials, ResetConfig, ResetOutcome, UserSummary};
