use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as milliseconds since the unix epoch
///
/// Generation start times and stop requests are ordered by this clock;
/// millisecond resolution keeps a stop issued right after a prompt from
/// comparing equal to the prompt time.
#[must_use]
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
