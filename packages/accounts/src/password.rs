use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AccountsError;

/// Hash a password with Argon2id and a fresh random salt (PHC string).
pub fn hash_password(plain: &str) -> Result<String, AccountsError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(AccountsError::hash)?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string.
///
/// A wrong password is `Ok(false)`; an unparseable hash is an error.
pub fn verify_password(plain: &str, phc: &str) -> Result<bool, AccountsError> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| AccountsError::hash(format!("invalid password hash format: {e}")))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// [`hash_password`] on the blocking pool; Argon2 is CPU-bound.
pub async fn hash_password_blocking(plain: String) -> Result<String, AccountsError> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| AccountsError::hash(format!("hashing task failed: {e}")))?
}
