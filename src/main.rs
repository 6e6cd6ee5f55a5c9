//! Web UI fetcher CLI entrypoint.
//!
//! This binary downloads the latest web UI release, extracts it into the
//! target directory, and lists the result. It exits with status 1 on any
//! fatal error.

use clap::Parser;
use log::LevelFilter;
use std::io::Write;
use webui_fetcher::cli::Cli;
use webui_fetcher::error::{FetchError, Result};
use webui_fetcher::fetcher::{FetchRequest, fetch};
use webui_fetcher::output::{DryRunInfo, format_listing, success_message, write_stderr_line};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Installs `env_logger` at `level`; `RUST_LOG` takes precedence when set.
fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    let config = cli.effective_config()?;

    if cli.dry_run {
        let info = DryRunInfo {
            config: &config,
            config_file: cli.config.as_deref(),
        };
        write_stderr_line(stderr, info.display_text());
        return Ok(());
    }

    let request = FetchRequest {
        config: &config,
        quiet: cli.quiet,
    };
    let report = fetch(&request, stderr)?;

    if !cli.quiet {
        write_stderr_line(
            stderr,
            success_message(report.extracted.len(), &report.target_dir),
        );
    }
    writeln!(
        stdout,
        "{}",
        format_listing(&report.target_dir, &report.listing)
    )
    .map_err(|e| FetchError::WriteFailed { source: e })?;

    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("Error: {err}"));
            err.exit_code()
        }
    }
}
