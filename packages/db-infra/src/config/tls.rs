//! CA certificate loading and expiry checks for TLS database connections

use std::path::Path;

use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};
use tracing::warn;

use crate::error::DbInfraError;

/// Days before expiry at which the CA check starts warning
pub const CA_EXPIRY_WARN_DAYS: i64 = 90;

/// Read the CA bundle. Runs before any connection attempt so a bad path
/// fails fast.
pub async fn load_ca_cert(path: &Path) -> Result<Vec<u8>, DbInfraError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| DbInfraError::CaCertRead {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse `openssl x509 -enddate` output such as `notAfter=Dec 31 23:59:59 2026 GMT`.
pub fn parse_openssl_enddate(output: &str) -> Result<OffsetDateTime, String> {
    let raw = output
        .trim()
        .strip_prefix("notAfter=")
        .ok_or_else(|| format!("Unexpected openssl output format: {}", output.trim()))?;

    // openssl pads single-digit days with an extra space
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let date_part = normalized
        .strip_suffix(" GMT")
        .ok_or_else(|| format!("Expected GMT timestamp, got: {normalized}"))?;

    let format = format_description!(
        "[month repr:short] [day padding:none] [hour]:[minute]:[second] [year]"
    );
    PrimitiveDateTime::parse(date_part, &format)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| format!("Failed to parse certificate expiry '{date_part}': {e}"))
}

/// Whole days from `now` until `expiry`; negative once expired.
pub fn days_until(expiry: OffsetDateTime, now: OffsetDateTime) -> i64 {
    (expiry - now).whole_days()
}

/// Check certificate expiry and log a warning if it expires within `warn_days`.
///
/// Returns the number of days left, or an error if openssl is unavailable or
/// its output cannot be parsed.
pub async fn check_cert_expiry(cert_path: &Path, warn_days: i64) -> Result<i64, String> {
    let output = tokio::process::Command::new("openssl")
        .arg("x509")
        .arg("-enddate")
        .arg("-noout")
        .arg("-in")
        .arg(cert_path)
        .output()
        .await
        .map_err(|e| format!("Failed to run openssl: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("openssl failed: {}", stderr.trim()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let expiry = parse_openssl_enddate(&stdout)?;
    let days_left = days_until(expiry, OffsetDateTime::now_utc());

    if days_left < 0 {
        warn!(
            tls_ca_expired = true,
            cert_path = %cert_path.display(),
            expiry_date = %expiry,
            "CA certificate has expired; TLS verification will fail"
        );
    } else if days_left <= warn_days {
        warn!(
            tls_ca_expiring_soon = true,
            cert_path = %cert_path.display(),
            days_until_expiry = days_left,
            expiry_date = %expiry,
            "CA certificate is expiring soon. Consider rotating it."
        );
    }

    Ok(days_left)
}

/// Best-effort expiry check; never fails the caller.
pub async fn check_ca_cert_expiry(cert_path: &Path) {
    if let Err(e) = check_cert_expiry(cert_path, CA_EXPIRY_WARN_DAYS).await {
        warn!(
            tls_ca_check_failed = true,
            error = %e,
            "Failed to check CA certificate expiry"
        );
    }
}
