use chrono::{DateTime, Days, Utc};

/// Number of days a cached feed stays usable.
pub const MAX_CACHE_AGE_DAYS: u64 = 7;

/// A cache saved at `timestamp` is valid strictly before it turns seven days old.
pub fn is_valid(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match timestamp.checked_add_days(Days::new(MAX_CACHE_AGE_DAYS)) {
        Some(limit) => now < limit,
        None => false,
    }
}
