//! Clock abstraction and JST timestamp helpers.
//!
//! Room activity tracking reads the time through [`Clock`] so that idle-room
//! eviction can be driven by a [`ManualClock`] in tests.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

const JST_OFFSET_SECS: i32 = 9 * 3600;
const EPOCH_JST_RFC3339: &str = "1970-01-01T09:00:00+09:00";

/// Source of the current time as Unix milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_jst_timestamp()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    /// Move the clock forward by `millis`.
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current Unix timestamp in milliseconds.
pub fn get_jst_timestamp() -> i64 {
    let now_jst: DateTime<FixedOffset> = Utc::now().with_timezone(&jst());
    now_jst.timestamp_millis()
}

/// Convert Unix milliseconds to an RFC 3339 string in JST.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    jst()
        .timestamp_millis_opt(timestamp_millis)
        .single()
        .map_or_else(|| EPOCH_JST_RFC3339.to_string(), |dt| dt.to_rfc3339())
}

/// Milliseconds elapsed from `earlier` to `later`, clamped at zero.
pub fn elapsed_millis(earlier: i64, later: i64) -> i64 {
    (later - earlier).max(0)
}
