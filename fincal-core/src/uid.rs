//! Deterministic event identifiers.

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// Field separator inside the hashed key (ASCII unit separator).
const KEY_SEPARATOR: u8 = 0x1f;

/// Number of digest bytes kept in the token.
const TOKEN_BYTES: usize = 16;

/// Build the UID for one announcement from its semantic key.
///
/// The token is the hex-encoded prefix of a SHA-256 digest over the date,
/// the raw time string, the currency and the event name, so unchanged
/// upstream rows always map to the same UID.
pub fn event_uid(
    date: NaiveDate,
    local_time: Option<&str>,
    currency: &str,
    name: &str,
    domain: &str,
) -> String {
    let date = date.format("%Y-%m-%d").to_string();
    let fields = [
        date.as_str(),
        local_time.map(str::trim).unwrap_or_default(),
        currency.trim(),
        name.trim(),
    ];

    let mut hasher = Sha256::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            hasher.update([KEY_SEPARATOR]);
        }
        hasher.update(field.as_bytes());
    }
    let digest = hasher.finalize();

    format!("{}@{}", hex::encode(&digest[..TOKEN_BYTES]), domain)
}
