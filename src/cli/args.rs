//! Command-line arguments for the `zbatch` binary.
//!
//! Parsing is done by `clap` (derive API).  Two conventions of the classic
//! compressor CLIs are handled before clap sees the arguments:
//! numeric level shortcuts such as `-9` (see [`expand_level_shortcuts`]) and
//! sizes with `K`/`M` suffixes (see [`parse_size`]).

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::config::{init_c_level, CLEVEL_MAX, CLEVEL_MIN, COMPRESSOR_NAME};
use crate::engine::Backend;
use crate::io::prefs::{FailurePolicy, PartialOutput, Prefs};

/// Default notification level of the binary: results and warnings.
pub const DEFAULT_DISPLAY_LEVEL: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "zbatch",
    version,
    about = "Compress each FILE into FILE.zst, reusing one encoder for the whole batch"
)]
pub struct Args {
    /// Files to compress
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Compression level (also: -1 .. -22, or ZBATCH_CLEVEL)
    #[arg(short = 'l', long = "level", value_name = "N",
          value_parser = clap::value_parser!(i32).range(CLEVEL_MIN as i64..=CLEVEL_MAX as i64))]
    pub level: Option<i32>,

    /// Overwrite existing output files
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Remove each source file after successful compression
    #[arg(long = "rm")]
    pub remove_source: bool,

    /// Keep the output of a file whose compression failed
    #[arg(short = 'k', long = "keep-partial")]
    pub keep_partial: bool,

    /// Stop at the first file that fails
    #[arg(long = "abort-on-error")]
    pub abort_on_error: bool,

    /// Compress every file found in directory operands
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Output file suffix (default: the backend's extension, .zst)
    #[arg(long = "suffix", value_name = "EXT")]
    pub suffix: Option<String>,

    /// Append a content checksum to every frame
    #[arg(long = "check")]
    pub check: bool,

    /// Do not copy timestamps and permissions to output files
    #[arg(long = "no-preserve")]
    pub no_preserve: bool,

    /// Input buffer size, e.g. 64K or 1M (default: engine recommendation)
    #[arg(long = "in-buffer", value_name = "BYTES", value_parser = parse_size)]
    pub in_buffer: Option<usize>,

    /// More verbose output (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Less output (repeatable)
    #[arg(short = 'q', long = "quiet", action = clap::ArgAction::Count)]
    pub quiet: u8,
}

/// Everything `main` needs to run a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub files: Vec<PathBuf>,
    pub level: i32,
    /// Explicit `--suffix`; `None` means the backend's extension.
    pub suffix: Option<String>,
    pub recursive: bool,
    pub display_level: i32,
    pub prefs: Prefs,
}

impl Args {
    /// Resolves the arguments into a [`CliConfig`].  `default_level` applies
    /// when no level was given on the command line.
    pub fn into_config(self, default_level: i32) -> Result<CliConfig> {
        if self.suffix.as_deref() == Some("") {
            bail!("--suffix must not be empty");
        }

        let mut prefs = Prefs::default();
        prefs.set_overwrite(self.force);
        prefs.set_remove_src_file(self.remove_source);
        prefs.set_preserve_file_stat(!self.no_preserve);
        prefs.set_content_checksum(self.check);
        if self.keep_partial {
            prefs.set_partial_output(PartialOutput::Keep);
        }
        if self.abort_on_error {
            prefs.set_failure_policy(FailurePolicy::Abort);
        }
        if let Some(size) = self.in_buffer {
            prefs.set_input_buffer_size(size);
        }

        let display_level =
            (DEFAULT_DISPLAY_LEVEL + self.verbose as i32 - self.quiet as i32).max(0);

        Ok(CliConfig {
            files: self.files,
            level: self.level.unwrap_or(default_level),
            suffix: self.suffix,
            recursive: self.recursive,
            display_level,
            prefs,
        })
    }
}

impl CliConfig {
    /// Suffix appended to every input to name its output.
    pub fn output_suffix<B: Backend>(&self, backend: &B) -> &str {
        self.suffix.as_deref().unwrap_or(backend.extension())
    }
}

/// Parses a byte count with an optional `K`, `M` or `G` multiplier, each
/// optionally followed by `i` and/or `B` (`64K`, `64KB`, `64KiB`).
pub fn parse_size(s: &str) -> Result<usize, String> {
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if digits_end == 0 {
        return Err(format!("invalid size '{}'", s));
    }
    let value: usize = s[..digits_end]
        .parse()
        .map_err(|_| format!("size '{}' is too large", s))?;

    let shift = match &s[digits_end..] {
        "" => 0,
        "K" | "KB" | "KiB" => 10,
        "M" | "MB" | "MiB" => 20,
        "G" | "GB" | "GiB" => 30,
        other => return Err(format!("unknown size suffix '{}'", other)),
    };
    value
        .checked_mul(1usize << shift)
        .ok_or_else(|| format!("size '{}' is too large", s))
}

/// Options whose value is the next argument.
const OPTIONS_WITH_VALUE: &[&str] = &["-l", "--level", "--suffix", "--in-buffer"];

/// Rewrites `-N` (N all digits) into `--level=N`.  Arguments after `--`, and
/// values of options listed in [`OPTIONS_WITH_VALUE`], are left alone, so
/// `--suffix -9` and a file named `-9` after `--` keep their meaning.
pub fn expand_level_shortcuts<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out: Vec<OsString> = Vec::new();
    let mut after_separator = false;
    for arg in args {
        let is_option_value = out
            .last()
            .and_then(|prev| prev.to_str())
            .is_some_and(|prev| OPTIONS_WITH_VALUE.contains(&prev));
        if !after_separator && !is_option_value {
            if arg == "--" {
                after_separator = true;
            } else if let Some(digits) = arg.to_str().and_then(|s| s.strip_prefix('-')) {
                if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                    out.push(OsString::from(format!("--level={}", digits)));
                    continue;
                }
            }
        }
        out.push(arg);
    }
    out
}

/// Parses `argv` (including the program name) into a [`CliConfig`].
///
/// Usage errors, `--help` and `--version` come back as a [`clap::Error`]
/// inside the `anyhow::Error`; the caller decides how to exit.
pub fn parse_args<I>(argv: I) -> Result<CliConfig>
where
    I: IntoIterator<Item = OsString>,
{
    let args = Args::try_parse_from(expand_level_shortcuts(argv))?;
    args.into_config(init_c_level())
        .with_context(|| format!("{}: invalid arguments", COMPRESSOR_NAME))
}
