// prefs.rs: batch preferences, notification level, and timing display.
//
// - The notification level is a process-wide AtomicI32 read by every
//   diagnostic; it is set once by the CLI and defaults to silent for
//   library users.
// - `Prefs` is a plain value type owned by the caller and passed by
//   reference into every compression entry point.

use std::sync::atomic::{AtomicI32, Ordering};

use crate::timefn::{clock_span_ns, TimeT};

// ---------------------------------------------------------------------------
// Numeric constants
// ---------------------------------------------------------------------------
pub const KB: usize = 1 << 10;

// ---------------------------------------------------------------------------
// Display / notification level
// ---------------------------------------------------------------------------

/// Global notification level. 0 = silent, 1 = errors only, 2 = results +
/// warnings, 3 = progress and timing, 4+ = verbose.
pub static DISPLAY_LEVEL: AtomicI32 = AtomicI32::new(0);

/// Write `msg` to stderr if the current notification level is ≥ `level`.
/// Flushes stderr at level 4 and above.
#[inline]
pub fn display_level(level: i32, msg: &str) {
    if DISPLAY_LEVEL.load(Ordering::Relaxed) >= level {
        eprint!("{}", msg);
        if DISPLAY_LEVEL.load(Ordering::Relaxed) >= 4 {
            use std::io::Write;
            let _ = std::io::stderr().flush();
        }
    }
}

/// Current notification level.
#[inline]
pub fn notification_level() -> i32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the global notification level. Returns the value stored.
pub fn set_notification_level(level: i32) -> i32 {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
    level
}

/// Conditionally print to stderr when the notification level is at least `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::io::prefs::notification_level() >= $level {
            eprint!($($arg)*);
        }
    };
}

// ---------------------------------------------------------------------------
// CPU-load helper
// ---------------------------------------------------------------------------

#[cfg(unix)]
extern "C" {
    fn clock() -> libc::clock_t;
}

/// Processor time consumed by the process so far, in `clock()` ticks.
/// Always 0 where `clock()` is unavailable.
pub fn cpu_clock() -> libc::clock_t {
    #[cfg(unix)]
    {
        // SAFETY: clock() has no preconditions.
        unsafe { clock() }
    }
    #[cfg(not(unix))]
    {
        0
    }
}

/// Seconds of CPU time consumed since `cpu_start`.
pub fn cpu_load_sec(cpu_start: libc::clock_t) -> f64 {
    // CLOCKS_PER_SEC is 1_000_000 on every POSIX system (XSI requirement).
    const CLOCKS_PER_SEC: f64 = 1_000_000.0;
    (cpu_clock() - cpu_start) as f64 / CLOCKS_PER_SEC
}

/// Prints a "Done in … s ==> … MiB/s (cpu load : …%)" line at notification
/// level 3.
pub fn final_time_display(time_start: TimeT, cpu_start: libc::clock_t, size: u64) {
    let duration_ns = clock_span_ns(time_start);
    let seconds = (duration_ns.max(1)) as f64 / 1_000_000_000.0_f64;
    let cpu_load_s = cpu_load_sec(cpu_start);
    let msg = format!(
        "Done in {:.2} s ==> {:.2} MiB/s  (cpu load : {:.0}%)\n",
        seconds,
        (size as f64) / seconds / 1024.0 / 1024.0,
        (cpu_load_s / seconds) * 100.0,
    );
    display_level(3, &msg);
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// What a batch does after one file fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Report the failure and move on to the next file.
    #[default]
    Continue,
    /// Stop the batch at the first failed file.
    Abort,
}

/// What happens to a destination file whose frame could not be completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PartialOutput {
    /// Delete the truncated destination.
    #[default]
    Remove,
    /// Leave it in place for the caller to inspect.
    Keep,
}

// ---------------------------------------------------------------------------
// Preferences struct
// ---------------------------------------------------------------------------

/// Tunable parameters for a compression batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prefs {
    /// Overwrite existing destination files. Default: false.
    pub overwrite: bool,
    /// Remove each source file after its frame is complete. Default: false.
    pub remove_src_file: bool,
    /// Copy mtime, permissions and ownership from source to destination. Default: true.
    pub preserve_file_stat: bool,
    /// Per-file failure handling. Default: [`FailurePolicy::Continue`].
    pub failure_policy: FailurePolicy,
    /// Treatment of a destination whose frame failed. Default: [`PartialOutput::Remove`].
    pub partial_output: PartialOutput,
    /// Append a content checksum to every frame. Default: false.
    pub content_checksum: bool,
    /// Input buffer capacity override; `None` uses the engine's recommendation.
    pub input_buffer_size: Option<usize>,
}

impl Default for Prefs {
    fn default() -> Self {
        Prefs {
            overwrite: false,
            remove_src_file: false,
            preserve_file_stat: true,
            failure_policy: FailurePolicy::Continue,
            partial_output: PartialOutput::Remove,
            content_checksum: false,
            input_buffer_size: None,
        }
    }
}

impl Prefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables destination overwrite. Returns the new value.
    pub fn set_overwrite(&mut self, yes: bool) -> bool {
        self.overwrite = yes;
        yes
    }

    /// Enables or disables removal of source files after success.
    pub fn set_remove_src_file(&mut self, flag: bool) {
        self.remove_src_file = flag;
    }

    pub fn set_preserve_file_stat(&mut self, flag: bool) {
        self.preserve_file_stat = flag;
    }

    pub fn set_failure_policy(&mut self, policy: FailurePolicy) {
        self.failure_policy = policy;
    }

    pub fn set_partial_output(&mut self, policy: PartialOutput) {
        self.partial_output = policy;
    }

    /// Enables or disables the per-frame content checksum. Returns the new value.
    pub fn set_content_checksum(&mut self, enable: bool) -> bool {
        self.content_checksum = enable;
        enable
    }

    /// Sets the input buffer capacity; `0` restores the engine default.
    /// Returns the value stored.
    pub fn set_input_buffer_size(&mut self, size: usize) -> Option<usize> {
        self.input_buffer_size = if size == 0 { None } else { Some(size) };
        self.input_buffer_size
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
