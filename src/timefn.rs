// timefn: monotonic timestamps for batch timing reports.
//
// Built on std::time::Instant; only differences between two readings carry
// meaning.

use std::time::Instant;

/// Nanosecond duration.
pub type DurationNs = u64;

/// Opaque point in time.
#[derive(Clone, Copy, Debug)]
pub struct TimeT {
    pub(crate) t: Instant,
}

impl Default for TimeT {
    fn default() -> Self {
        get_time()
    }
}

/// Current timestamp.
pub fn get_time() -> TimeT {
    TimeT { t: Instant::now() }
}

/// Nanoseconds from `start` to `end` (zero if `end` is earlier).
pub fn span_ns(start: TimeT, end: TimeT) -> DurationNs {
    end.t.saturating_duration_since(start.t).as_nanos() as DurationNs
}

/// Nanoseconds elapsed since `start`.
pub fn clock_span_ns(start: TimeT) -> DurationNs {
    start.t.elapsed().as_nanos() as DurationNs
}
