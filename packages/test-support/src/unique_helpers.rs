//! Helpers for generating unique test data
//!
//! ULID suffixes keep rows from different tests from colliding on unique
//! columns such as `users.username`.

use ulid::Ulid;

/// Generate a unique string in the format `{prefix}-{ulid}`
///
/// # Examples
/// ```
/// use test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("user");
/// let id2 = unique_str("user");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("user-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique address in the format `{prefix}-{ulid}@example.test`
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}
