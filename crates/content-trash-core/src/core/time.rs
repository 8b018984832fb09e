// crates/content-trash-core/src/core/time.rs
// ============================================================================
// Module: Content Trash Time Model
// Description: Unix-second timestamps and canonical date text.
// Purpose: Normalize heterogeneous host date values into one canonical form.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Archive rows store `deleted_at` as unix seconds and the fixed date
//! attributes as canonical `YYYY-MM-DD HH:MM:SS` UTC text. Hosts hand over
//! dates in many shapes (epoch numbers, zero dates, ISO text), so
//! [`normalize_datetime`] folds them into a [`Timestamp`], falling back to the
//! caller-supplied "now". The core never reads wall-clock time directly;
//! callers pass it in through a [`Clock`](crate::interfaces::Clock).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use ::time::Date;
use ::time::OffsetDateTime;
use ::time::PrimitiveDateTime;
use ::time::format_description::BorrowedFormatItem;
use ::time::format_description::well_known::Rfc3339;
use ::time::macros::format_description;
use serde::Deserialize;
use serde::Serialize;

use crate::core::attributes::Scalar;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Canonical date text layout.
const CANONICAL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
/// ISO layout with a `T` separator and no offset.
const ISO_LOCAL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
/// Date-only layout.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
/// Canonical text for the unix epoch.
const EPOCH_TEXT: &str = "1970-01-01 00:00:00";
/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Unix timestamp in whole seconds (UTC).
///
/// # Invariants
/// - Values are supplied by callers; ordering is plain integer ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix seconds.
    #[must_use]
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Returns the unix seconds.
    #[must_use]
    pub const fn unix_seconds(self) -> i64 {
        self.0
    }

    /// Returns the unix milliseconds, saturating on overflow.
    #[must_use]
    pub const fn unix_millis(self) -> i64 {
        self.0.saturating_mul(1_000)
    }

    /// Returns the timestamp moved back by `seconds`.
    #[must_use]
    pub const fn checked_sub_seconds(self, seconds: i64) -> Option<Self> {
        match self.0.checked_sub(seconds) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Returns the timestamp moved back by whole days.
    #[must_use]
    pub const fn checked_sub_days(self, days: i64) -> Option<Self> {
        match days.checked_mul(SECONDS_PER_DAY) {
            Some(seconds) => self.checked_sub_seconds(seconds),
            None => None,
        }
    }

    /// Formats the timestamp as canonical `YYYY-MM-DD HH:MM:SS` UTC text.
    ///
    /// Out-of-range values render as the unix epoch.
    #[must_use]
    pub fn to_canonical(self) -> String {
        OffsetDateTime::from_unix_timestamp(self.0)
            .ok()
            .and_then(|value| value.format(CANONICAL_FORMAT).ok())
            .unwrap_or_else(|| EPOCH_TEXT.to_string())
    }

    /// Parses canonical, ISO, RFC 3339, or date-only text.
    #[must_use]
    pub fn parse_text(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(value) = PrimitiveDateTime::parse(text, CANONICAL_FORMAT) {
            return Some(Self(value.assume_utc().unix_timestamp()));
        }
        if let Ok(value) = PrimitiveDateTime::parse(text, ISO_LOCAL_FORMAT) {
            return Some(Self(value.assume_utc().unix_timestamp()));
        }
        if let Ok(value) = OffsetDateTime::parse(text, &Rfc3339) {
            return Some(Self(value.unix_timestamp()));
        }
        if let Ok(value) = Date::parse(text, DATE_FORMAT) {
            return Some(Self(value.midnight().assume_utc().unix_timestamp()));
        }
        None
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Normalizes a host date value.
///
/// Accepts epoch seconds as integers, reals, or digit strings, and canonical,
/// ISO, or date-only text. Missing values, zero dates, and anything
/// unparseable become `now`.
#[must_use]
pub fn normalize_datetime(value: Option<&Scalar>, now: Timestamp) -> Timestamp {
    let Some(value) = value else {
        return now;
    };
    match value {
        Scalar::Integer(seconds) if *seconds > 0 => Timestamp(*seconds),
        Scalar::Real(seconds) if seconds.is_finite() && *seconds >= 1.0 => {
            Scalar::Real(seconds.trunc()).as_i64().map_or(now, Timestamp)
        }
        Scalar::Text(text) => normalize_text(text, now),
        _ => now,
    }
}

/// Normalizes a textual date value.
fn normalize_text(text: &str, now: Timestamp) -> Timestamp {
    let text = text.trim();
    if is_zero_date(text) {
        return now;
    }
    if text.bytes().all(|byte| byte.is_ascii_digit()) {
        return match text.parse::<i64>() {
            Ok(seconds) if seconds > 0 => Timestamp(seconds),
            _ => now,
        };
    }
    Timestamp::parse_text(text).unwrap_or(now)
}

/// Returns true for empty and all-zero date text.
fn is_zero_date(text: &str) -> bool {
    text.is_empty() || text.chars().all(|ch| matches!(ch, '0' | '-' | ':' | ' ' | 'T'))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: Timestamp = Timestamp::from_unix_seconds(1_700_000_000);

    #[test]
    fn canonical_text_round_trips() {
        let stamp = Timestamp::from_unix_seconds(1_000_000_000);
        assert_eq!(stamp.to_canonical(), "2001-09-09 01:46:40");
        assert_eq!(Timestamp::parse_text("2001-09-09 01:46:40"), Some(stamp));
    }

    #[test]
    fn normalization_accepts_host_shapes() {
        let epoch = Scalar::Integer(1_000_000_000);
        assert_eq!(normalize_datetime(Some(&epoch), NOW).unix_seconds(), 1_000_000_000);
        let digits = Scalar::text("1000000000");
        assert_eq!(normalize_datetime(Some(&digits), NOW).unix_seconds(), 1_000_000_000);
        let iso = Scalar::text("2001-09-09T01:46:40");
        assert_eq!(normalize_datetime(Some(&iso), NOW).unix_seconds(), 1_000_000_000);
        let date_only = Scalar::text("2001-09-09");
        assert_eq!(normalize_datetime(Some(&date_only), NOW).to_canonical(), "2001-09-09 00:00:00");
    }

    #[test]
    fn zero_and_garbage_fall_back_to_now() {
        for value in [
            Scalar::text(""),
            Scalar::text("0000-00-00 00:00:00"),
            Scalar::text("0"),
            Scalar::Integer(0),
            Scalar::text("yesterday-ish"),
            Scalar::Bool(true),
        ] {
            assert_eq!(normalize_datetime(Some(&value), NOW), NOW, "value {value}");
        }
        assert_eq!(normalize_datetime(None, NOW), NOW);
    }
}
