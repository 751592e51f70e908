//! Slack request signing (`X-Slack-Signature` / `X-Slack-Request-Timestamp`).
//!
//! Signature = `v0=` + hex(HMAC-SHA256(signing_secret, "v0:{timestamp}:{body}")).
//! Requests whose timestamp is more than [`MAX_CLOCK_SKEW_SECS`] away from
//! the server clock are rejected to limit replay.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Accepted distance between the request timestamp and now, in seconds.
pub const MAX_CLOCK_SKEW_SECS: i64 = 60 * 5;

const VERSION_PREFIX: &str = "v0=";

/// Compute the expected `X-Slack-Signature` header value.
pub fn compute_signature(signing_secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mac = signed_mac(signing_secret, timestamp, body);
    let digest: String = mac
        .finalize()
        .into_bytes()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();
    format!("{VERSION_PREFIX}{digest}")
}

/// Verify a signed request. `now_unix` is the server clock in seconds.
pub fn verify_signature(
    signing_secret: &str,
    timestamp: &str,
    signature: &str,
    body: &[u8],
    now_unix: i64,
) -> bool {
    let Ok(ts) = timestamp.trim().parse::<i64>() else {
        return false;
    };
    if now_unix.abs_diff(ts) > MAX_CLOCK_SKEW_SECS.unsigned_abs() {
        return false;
    }

    let Some(provided) = signature
        .strip_prefix(VERSION_PREFIX)
        .and_then(decode_hex)
    else {
        return false;
    };

    signed_mac(signing_secret, timestamp, body)
        .verify_slice(&provided)
        .is_ok()
}

fn signed_mac(signing_secret: &str, timestamp: &str, body: &[u8]) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(b"v0:");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    mac
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    if value.len() % 2 != 0 {
        return None;
    }
    (0..value.len())
        .step_by(2)
        .map(|i| value.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}
