//! Time utilities for timestamp handling.
//!
//! Every instant that ends up in a challenge message is rendered with
//! millisecond precision, so instants produced here are truncated to whole
//! milliseconds up front.

use chrono::{DateTime, SecondsFormat, SubsecRound, TimeDelta, Utc};
use std::time::Duration;

/// Current UTC time, truncated to milliseconds.
pub(crate) fn current_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Renders an instant as ISO-8601 with milliseconds and a `Z` suffix,
/// e.g. `2021-10-10T12:34:56.000Z`.
pub(crate) fn to_iso8601(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Adds a TTL to an instant, saturating at the latest representable time.
pub(crate) fn add_ttl(instant: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| instant.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
