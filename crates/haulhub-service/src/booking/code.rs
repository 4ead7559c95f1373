//! Human-readable code generation for bookings and shipments.
//!
//! Codes are advisory candidates: the database unique index is the final
//! arbiter, and callers retry generation when an assignment reports the
//! candidate taken.

use chrono::Utc;
use rand::Rng;

use haulhub_core::result::AppResult;

use crate::store::BookingStore;

/// Sequential probes before falling back to a timestamp-based code.
const MAX_ATTEMPTS: usize = 10;

/// Booking sequence numbers start here, so the first booking for an
/// initial reads `U10001`.
const SEQUENCE_BASE: i64 = 10001;

/// Produce a candidate booking code: the user's initial followed by a
/// sequence number derived from how many codes share that initial.
///
/// Each attempt re-counts, so concurrent assignments advance the
/// sequence; the per-attempt offset guarantees progress even when they
/// don't. After [`MAX_ATTEMPTS`] collisions the generator switches to
/// the timestamp fallback, which is collision-resistant but not ordered.
pub async fn next_booking_code(store: &dyn BookingStore, initial: char) -> AppResult<String> {
    for attempt in 0..MAX_ATTEMPTS {
        let count = store.count_code_prefix(initial).await?;
        let candidate = format!("{initial}{}", count + SEQUENCE_BASE + attempt as i64);
        if !store.code_exists(&candidate).await? {
            return Ok(candidate);
        }
    }
    Ok(fallback_booking_code(initial))
}

/// Timestamp-based fallback code: initial, last six digits of the
/// current unix-millisecond clock, and a three-digit random suffix.
pub fn fallback_booking_code(initial: char) -> String {
    let timestamp = Utc::now().timestamp_millis().to_string();
    let tail = &timestamp[timestamp.len().saturating_sub(6)..];
    let random: u32 = rand::rng().random_range(0..1000);
    format!("{initial}{tail}{random:03}")
}

/// Produce the next shipment code (`SH01`, `SH02`, ...) from the codes
/// already issued: highest existing number plus one, zero-padded to two
/// digits. Returns `None` once the two-digit sequence is spent; callers
/// switch to [`fallback_shipment_code`].
pub fn next_shipment_code(existing: &[String]) -> Option<String> {
    let max = existing
        .iter()
        .filter_map(|code| code.strip_prefix("SH"))
        .filter_map(|digits| digits.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    let next = max + 1;
    (next < 100).then(|| format!("SH{next:02}"))
}

/// Timestamp-derived shipment code for when sequential assignment
/// cannot proceed.
pub fn fallback_shipment_code() -> String {
    format!("SH{}", Utc::now().timestamp_millis() % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_code_shape() {
        let code = fallback_booking_code('D');
        assert!(code.starts_with('D'));
        // Initial + 6 timestamp digits + 3 random digits.
        assert_eq!(code.len(), 10);
        assert!(code[1..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_next_shipment_code_from_empty() {
        assert_eq!(next_shipment_code(&[]).as_deref(), Some("SH01"));
    }

    #[test]
    fn test_next_shipment_code_skips_to_max() {
        let existing = vec![
            "SH01".to_string(),
            "SH07".to_string(),
            "SH03".to_string(),
        ];
        assert_eq!(next_shipment_code(&existing).as_deref(), Some("SH08"));
    }

    #[test]
    fn test_next_shipment_code_stops_at_two_digits() {
        let existing = vec!["SH99".to_string()];
        assert_eq!(next_shipment_code(&existing), None);
    }

    #[test]
    fn test_next_shipment_code_ignores_foreign_formats() {
        let existing = vec!["SHIP-1".to_string(), "SH02".to_string(), "XX09".to_string()];
        assert_eq!(next_shipment_code(&existing).as_deref(), Some("SH03"));
    }

    #[test]
    fn test_fallback_shipment_code_stays_in_range() {
        let code = fallback_shipment_code();
        let suffix = code.strip_prefix("SH").and_then(|s| s.parse::<u64>().ok());
        assert!(suffix.is_some_and(|n| n < 100));
    }
}
