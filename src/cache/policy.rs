// Cache freshness policy.
// Decides whether a cached feed snapshot is still fresh relative to a reference time.

use chrono::{DateTime, Duration, Utc};

/// Maximum age of a cached feed before it is considered stale.
pub const MAX_CACHE_AGE_DAYS: i64 = 7;

/// The maximum cache age as a fixed duration of 7 x 24h.
pub fn max_cache_age() -> Duration {
    Duration::days(MAX_CACHE_AGE_DAYS)
}

/// Check whether a snapshot taken at `timestamp` is still fresh at `now`.
///
/// Fresh means strictly younger than the maximum age; a snapshot exactly at the
/// boundary is stale.
pub fn is_valid(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match now.checked_sub_signed(max_cache_age()) {
        Some(oldest_allowed) => timestamp > oldest_allowed,
        None => false,
    }
}
