// config.rs: Compile-time configuration constants.
//
// Defaults here can be overridden at runtime: the compression level by the
// ZBATCH_CLEVEL environment variable or the -# / --level flag, the suffix by
// --suffix.

/// Compression level used when nothing else is requested.
pub const CLEVEL_DEFAULT: i32 = 7;

/// Lowest level accepted on the command line.
pub const CLEVEL_MIN: i32 = 1;

/// Highest level accepted on the command line (libzstd's ultra ceiling).
pub const CLEVEL_MAX: i32 = 22;

/// Environment variable consulted for the default compression level.
pub const ENV_CLEVEL: &str = "ZBATCH_CLEVEL";

/// Suffix appended to each input filename to name its frame.
pub const ZSTD_EXTENSION: &str = ".zst";

/// Program name used in diagnostics.
pub const COMPRESSOR_NAME: &str = "zbatch";

/// Reads the default compression level from [`ENV_CLEVEL`].
pub fn init_c_level() -> i32 {
    init_c_level_from(std::env::var(ENV_CLEVEL).ok().as_deref())
}

/// Testable core of [`init_c_level`]: parse an optional `ZBATCH_CLEVEL` value.
///
/// Values outside `[CLEVEL_MIN, CLEVEL_MAX]` or that are not integers are
/// ignored with a warning and [`CLEVEL_DEFAULT`] is returned.
pub fn init_c_level_from(env_val: Option<&str>) -> i32 {
    if let Some(env) = env_val {
        match env.trim().parse::<i32>() {
            Ok(level) if (CLEVEL_MIN..=CLEVEL_MAX).contains(&level) => return level,
            _ => crate::displaylevel!(
                2,
                "Ignore environment variable setting {}={}: not a valid level \n",
                ENV_CLEVEL,
                env
            ),
        }
    }
    CLEVEL_DEFAULT
}
