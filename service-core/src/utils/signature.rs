use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Generate a webhook signature.
///
/// Format: hex(HMAC-SHA256("<timestamp>.<body>", secret))
pub fn sign_webhook(secret: &str, timestamp: i64, body: &[u8]) -> Result<String, anyhow::Error> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("Invalid key length: {}", e))?;

    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a webhook signature using constant-time comparison.
///
/// Accepts upper- or lower-case hex.
pub fn verify_webhook(
    secret: &str,
    timestamp: i64,
    body: &[u8],
    signature: &str,
) -> Result<bool, anyhow::Error> {
    let expected_signature = sign_webhook(secret, timestamp, body)?;
    let provided = signature.trim().to_ascii_lowercase();

    let expected_bytes = expected_signature.as_bytes();
    let signature_bytes = provided.as_bytes();

    if expected_bytes.len() != signature_bytes.len() {
        return Ok(false);
    }

    Ok(expected_bytes.ct_eq(signature_bytes).into())
}

/// True when `timestamp` lies within `tolerance_secs` of `now` in either direction.
pub fn timestamp_within_tolerance(timestamp: i64, now: i64, tolerance_secs: i64) -> bool {
    now.checked_sub(timestamp)
        .and_then(i64::checked_abs)
        .is_some_and(|skew| skew <= tolerance_secs)
}
