//! Byte-level codecs shared by the store keys and the result encoding.

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;

use crate::BallotsyncError;
use crate::Result;

/// Encode a height (or any counter) as fixed-width little-endian bytes.
#[must_use]
pub const fn u64_to_bytes(u: u64) -> [u8; 8] {
    u.to_le_bytes()
}

/// Decode fixed-width little-endian bytes back into a `u64`.
///
/// # Errors
/// Returns an error if `b` is not exactly 8 bytes.
pub fn bytes_to_u64(b: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = b
        .try_into()
        .map_err(|_| BallotsyncError::Decode(format!("expected 8 bytes, got {}", b.len())))?;
    Ok(u64::from_le_bytes(bytes))
}

/// Encode a timestamp as its RFC-3339 UTC representation with nanosecond
/// precision. The string form is the stable on-disk format.
#[must_use]
pub fn time_to_bytes(t: DateTime<Utc>) -> Vec<u8> {
    t.to_rfc3339_opts(SecondsFormat::Nanos, true).into_bytes()
}

/// Decode a timestamp previously encoded with [`time_to_bytes`].
///
/// # Errors
/// Returns an error if the bytes are not a valid RFC-3339 UTC timestamp.
pub fn bytes_to_time(b: &[u8]) -> Result<DateTime<Utc>> {
    let s = std::str::from_utf8(b)
        .map_err(|e| BallotsyncError::Decode(format!("timestamp is not utf-8: {e}")))?;
    let t = DateTime::parse_from_rfc3339(s)
        .map_err(|e| BallotsyncError::Decode(format!("invalid timestamp {s:?}: {e}")))?;
    Ok(t.with_timezone(&Utc))
}

/// Returns true if every byte is zero.
#[must_use]
pub fn is_all_zeros(b: &[u8]) -> bool {
    b.iter().all(|v| *v == 0)
}
