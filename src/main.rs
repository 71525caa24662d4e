//! Binary entry point for the `zbatch` command-line tool.
//!
//! 1. [`parse_args`] turns `argv` into a [`CliConfig`]; usage errors print the
//!    usage text and exit nonzero.
//! 2. Directory operands are expanded when `-r` is given.
//! 3. All files are compressed with one resource pool.
//! 4. The exit code is 0 only if every file produced a frame.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};

use zbatch::cli::args::DEFAULT_DISPLAY_LEVEL;
use zbatch::cli::{parse_args, CliConfig};
use zbatch::config::COMPRESSOR_NAME;
use zbatch::engine::Zstd;
use zbatch::io::{compress_multiple_filenames, set_notification_level};
use zbatch::util::create_file_list;

fn expand_inputs(cfg: &CliConfig, suffix: &str) -> Result<Vec<PathBuf>> {
    if !cfg.recursive {
        return Ok(cfg.files.clone());
    }
    let inputs: Vec<&Path> = cfg.files.iter().map(PathBuf::as_path).collect();
    create_file_list(&inputs, suffix).context("cannot expand directory operands")
}

fn run(cfg: CliConfig) -> Result<bool> {
    set_notification_level(cfg.display_level);

    let backend = Zstd::with_checksum(cfg.prefs.content_checksum);
    let suffix = cfg.output_suffix(&backend);
    let files = expand_inputs(&cfg, suffix)?;
    zbatch::displaylevel!(
        4,
        "*** {} v{}, zstd backend, level {} ***\n",
        COMPRESSOR_NAME,
        env!("CARGO_PKG_VERSION"),
        cfg.level
    );

    let report = compress_multiple_filenames(&backend, &files, suffix, cfg.level, &cfg.prefs)
        .context("cannot set up compression resources")?;

    if report.aborted {
        zbatch::displaylevel!(
            1,
            "{}: stopped after first failure, {} file(s) not processed \n",
            COMPRESSOR_NAME,
            report.skipped
        );
    }
    println!("compressed {} files", report.compressed);
    Ok(report.all_succeeded())
}

fn main() -> ExitCode {
    set_notification_level(DEFAULT_DISPLAY_LEVEL);

    let cfg = match parse_args(std::env::args_os()) {
        Ok(cfg) => cfg,
        Err(e) => {
            if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
                // --help / --version exit 0, usage errors exit 2.
                clap_err.exit();
            }
            eprintln!("{}: {:#}", COMPRESSOR_NAME, e);
            return ExitCode::FAILURE;
        }
    };

    match run(cfg) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}: {:#}", COMPRESSOR_NAME, e);
            ExitCode::FAILURE
        }
    }
}
